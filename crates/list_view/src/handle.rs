use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{FetchParameter, Record},
    error::FetchError,
};
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
};
use tracing::debug;

use crate::{
    derived::{SortDirection, ViewConfig},
    snapshot::Snapshot,
    state::{AsyncListView, Completion, ViewError},
};

/// Where a view's records come from. Implementations classify every failure
/// into a [`FetchError`] before returning.
#[async_trait]
pub trait RecordSource: Send + Sync {
    type Record: Record;

    async fn fetch(
        &self,
        parameter: Option<&FetchParameter>,
    ) -> Result<Vec<Self::Record>, FetchError>;
}

/// Drives an [`AsyncListView`] against a [`RecordSource`].
///
/// The view lock is released while the fetch is in flight, so a newer
/// `initialize` can supersede an older one; the older completion is then
/// dropped by the view. Snapshot changes are published on a watch channel.
pub struct ListViewHandle<S: RecordSource> {
    source: Arc<S>,
    view: Mutex<AsyncListView<S::Record>>,
    updates: watch::Sender<Arc<Snapshot<S::Record>>>,
}

impl<S: RecordSource + 'static> ListViewHandle<S> {
    pub fn new(source: Arc<S>, config: ViewConfig<S::Record>) -> Self {
        let view = AsyncListView::new(config);
        let (updates, _) = watch::channel(view.snapshot());
        Self {
            source,
            view: Mutex::new(view),
            updates,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot<S::Record>>> {
        self.updates.subscribe()
    }

    pub async fn snapshot(&self) -> Arc<Snapshot<S::Record>> {
        self.view.lock().await.snapshot()
    }

    /// Runs one fetch attempt to completion and returns the snapshot as it
    /// stands afterwards, which may belong to a newer attempt.
    pub async fn initialize(
        &self,
        parameter: Option<&str>,
    ) -> Result<Arc<Snapshot<S::Record>>, ViewError> {
        let ticket = {
            let mut view = self.view.lock().await;
            let ticket = view.initialize(parameter)?;
            self.publish(&view);
            ticket
        };

        if let Some(ticket) = ticket {
            let result = self.source.fetch(ticket.parameter()).await;
            let mut view = self.view.lock().await;
            match view.complete(&ticket, result) {
                Completion::Applied => self.publish(&view),
                Completion::Stale => debug!(seq = ticket.seq(), "fetch result superseded"),
            }
        }

        Ok(self.snapshot().await)
    }

    pub fn spawn_initialize(
        self: &Arc<Self>,
        parameter: Option<String>,
    ) -> JoinHandle<Result<Arc<Snapshot<S::Record>>, ViewError>> {
        let handle = Arc::clone(self);
        tokio::spawn(async move { handle.initialize(parameter.as_deref()).await })
    }

    pub async fn toggle_sort(&self) -> Result<SortDirection, ViewError> {
        let mut view = self.view.lock().await;
        let direction = view.toggle_sort()?;
        self.publish(&view);
        Ok(direction)
    }

    pub async fn toggle_expand(
        &self,
        key: &<S::Record as Record>::Key,
    ) -> Result<bool, ViewError> {
        let mut view = self.view.lock().await;
        let expanded = view.toggle_expand(key)?;
        self.publish(&view);
        Ok(expanded)
    }

    pub async fn retire(&self) {
        self.view.lock().await.retire();
    }

    fn publish(&self, view: &AsyncListView<S::Record>) {
        let next = view.snapshot();
        self.updates.send_if_modified(|current| {
            if Arc::ptr_eq(current, &next) {
                false
            } else {
                *current = Arc::clone(&next);
                true
            }
        });
    }
}

#[cfg(test)]
#[path = "tests/handle_tests.rs"]
mod tests;
