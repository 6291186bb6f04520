use std::collections::HashSet;

use shared::domain::Record;

use crate::{derived::SortDirection, state::Phase};

/// Render-ready projection of a view. Immutable once built; the view hands
/// out the same `Arc<Snapshot>` until its state changes.
#[derive(Debug, Clone)]
pub struct Snapshot<R: Record> {
    pub revision: u64,
    pub phase: Phase,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub items: Vec<R>,
    pub sort_direction: SortDirection,
    expanded: HashSet<R::Key>,
}

impl<R: Record> Snapshot<R> {
    pub(crate) fn new(
        revision: u64,
        phase: Phase,
        error_message: Option<String>,
        items: Vec<R>,
        sort_direction: SortDirection,
        expanded: HashSet<R::Key>,
    ) -> Self {
        Self {
            revision,
            phase,
            is_loading: phase == Phase::Loading,
            error_message,
            items,
            sort_direction,
            expanded,
        }
    }

    pub fn is_expanded(&self, key: &R::Key) -> bool {
        self.expanded.contains(key)
    }

    /// A successful fetch that returned nothing.
    pub fn has_no_data(&self) -> bool {
        self.phase == Phase::Ready && self.items.is_empty()
    }
}
