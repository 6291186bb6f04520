use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::{
    domain::{FetchParameter, Record},
    error::FetchError,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    derived::{DerivedState, ParameterPolicy, SortDirection, ViewConfig},
    snapshot::Snapshot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("operation requires a ready view (phase is {0:?})")]
    NotReady(Phase),
    #[error("view has been retired")]
    Retired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

/// Identifies one fetch attempt. Only the ticket from the most recent
/// `initialize` can complete the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    parameter: Option<FetchParameter>,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn parameter(&self) -> Option<&FetchParameter> {
        self.parameter.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct ViewState<R: Record> {
    phase: Phase,
    records: Vec<R>,
    error_message: Option<String>,
    derived: DerivedState<R::Key>,
}

impl<R: Record> Default for ViewState<R> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            records: Vec::new(),
            error_message: None,
            derived: DerivedState::default(),
        }
    }
}

impl<R: Record> ViewState<R> {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Records in arrival order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn derived(&self) -> &DerivedState<R::Key> {
        &self.derived
    }

    fn begin_loading(&mut self) {
        self.phase = Phase::Loading;
        self.records.clear();
        self.error_message = None;
    }

    fn fail(&mut self, message: String) {
        self.phase = Phase::Error;
        self.records.clear();
        self.error_message = Some(message);
    }

    fn ready(&mut self, records: Vec<R>) {
        let keys: Vec<R::Key> = records.iter().map(R::key).collect();
        self.derived.recompute_for(&keys);
        self.phase = Phase::Ready;
        self.records = records;
        self.error_message = None;
    }
}

/// Fetch lifecycle and derived presentation for one collection.
///
/// This is the synchronous reducer: `initialize` hands back a
/// [`FetchTicket`] and the caller performs the fetch, then reports the
/// outcome with [`AsyncListView::complete`]. Completions carrying an
/// outdated ticket are discarded.
pub struct AsyncListView<R: Record> {
    config: ViewConfig<R>,
    state: ViewState<R>,
    latest_seq: u64,
    parameter: Option<FetchParameter>,
    retired: bool,
    revision: u64,
    snapshot: Arc<Snapshot<R>>,
}

impl<R: Record> AsyncListView<R> {
    pub fn new(config: ViewConfig<R>) -> Self {
        let state = ViewState::default();
        let snapshot = Arc::new(project(&config, &state, 0));
        Self {
            config,
            state,
            latest_seq: 0,
            parameter: None,
            retired: false,
            revision: 0,
            snapshot,
        }
    }

    pub fn config(&self) -> &ViewConfig<R> {
        &self.config
    }

    pub fn state(&self) -> &ViewState<R> {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_retired(&self) -> bool {
        self.retired
    }

    /// Starts a fetch attempt. Returns `None` when the parameter failed
    /// validation; the view is then already in `Error` and nothing must be
    /// fetched.
    pub fn initialize(
        &mut self,
        raw_parameter: Option<&str>,
    ) -> Result<Option<FetchTicket>, ViewError> {
        if self.retired {
            return Err(ViewError::Retired);
        }

        // Any earlier attempt is superseded, including by an invalid one.
        self.latest_seq += 1;

        let parameter = match self.config.parameter {
            ParameterPolicy::Unused => None,
            ParameterPolicy::Required => match FetchParameter::parse(raw_parameter) {
                Ok(parameter) => Some(parameter),
                Err(err) => {
                    warn!(
                        seq = self.latest_seq,
                        ?raw_parameter,
                        "rejecting fetch parameter"
                    );
                    let message = err.user_message();
                    let unchanged = self.parameter.is_none()
                        && self.state.phase == Phase::Error
                        && self.state.error_message.as_deref() == Some(message.as_str())
                        && self.state.derived == DerivedState::default();
                    if !unchanged {
                        self.parameter = None;
                        self.state.derived = DerivedState::default();
                        self.state.fail(message);
                        self.refresh_snapshot();
                    }
                    return Ok(None);
                }
            },
        };

        let refetch = self.state.phase != Phase::Idle && parameter == self.parameter;
        if !refetch {
            self.state.derived = DerivedState::default();
        }
        self.parameter = parameter.clone();
        self.state.begin_loading();
        self.refresh_snapshot();
        debug!(seq = self.latest_seq, refetch, "view loading");

        Ok(Some(FetchTicket {
            seq: self.latest_seq,
            parameter,
        }))
    }

    pub fn on_fetch_success(&mut self, ticket: &FetchTicket, records: Vec<R>) -> Completion {
        if !self.accepts(ticket) {
            return Completion::Stale;
        }
        debug!(seq = ticket.seq, count = records.len(), "view ready");
        self.state.ready(records);
        self.refresh_snapshot();
        Completion::Applied
    }

    pub fn on_fetch_failure(&mut self, ticket: &FetchTicket, cause: FetchError) -> Completion {
        if !self.accepts(ticket) {
            return Completion::Stale;
        }
        warn!(
            seq = ticket.seq,
            kind = ?cause.kind(),
            error = %cause,
            "view fetch failed"
        );
        self.state.fail(cause.user_message());
        self.refresh_snapshot();
        Completion::Applied
    }

    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<R>, FetchError>,
    ) -> Completion {
        match result {
            Ok(records) => self.on_fetch_success(ticket, records),
            Err(cause) => self.on_fetch_failure(ticket, cause),
        }
    }

    pub fn toggle_sort(&mut self) -> Result<SortDirection, ViewError> {
        self.require_ready()?;
        self.state.derived.sort_direction = self.state.derived.sort_direction.flipped();
        self.refresh_snapshot();
        Ok(self.state.derived.sort_direction)
    }

    /// Returns whether `key` is expanded afterwards. Keys that are not in the
    /// current records are left alone.
    pub fn toggle_expand(&mut self, key: &R::Key) -> Result<bool, ViewError> {
        self.require_ready()?;
        if !self.state.records.iter().any(|record| &record.key() == key) {
            debug!(?key, "ignoring expand toggle for absent record");
            return Ok(false);
        }
        let expanded = self.state.derived.toggle_expanded(key);
        self.refresh_snapshot();
        Ok(expanded)
    }

    pub fn snapshot(&self) -> Arc<Snapshot<R>> {
        Arc::clone(&self.snapshot)
    }

    /// Unmount. Outstanding fetches can no longer touch this view.
    pub fn retire(&mut self) {
        self.retired = true;
        self.latest_seq += 1;
    }

    fn accepts(&self, ticket: &FetchTicket) -> bool {
        let current = !self.retired
            && ticket.seq == self.latest_seq
            && self.state.phase == Phase::Loading;
        if !current {
            debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                retired = self.retired,
                "discarding stale fetch completion"
            );
        }
        current
    }

    fn require_ready(&self) -> Result<(), ViewError> {
        match self.state.phase {
            Phase::Ready => Ok(()),
            phase => Err(ViewError::NotReady(phase)),
        }
    }

    fn refresh_snapshot(&mut self) {
        self.revision += 1;
        self.snapshot = Arc::new(project(&self.config, &self.state, self.revision));
    }
}

fn project<R: Record>(
    config: &ViewConfig<R>,
    state: &ViewState<R>,
    revision: u64,
) -> Snapshot<R> {
    let items = match state.phase {
        Phase::Ready => config.project(&state.records, state.derived.sort_direction),
        _ => Vec::new(),
    };
    Snapshot::new(
        revision,
        state.phase,
        state.error_message.clone(),
        items,
        state.derived.sort_direction,
        state.derived.expanded_keys.clone(),
    )
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
