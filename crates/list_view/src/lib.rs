//! View state for remotely fetched lists: one fetch per `initialize`, a
//! small lifecycle (idle, loading, ready, error) and a derived presentation
//! (sort direction, expanded rows, optional filter) that never refetches.

pub mod derived;
mod handle;
mod snapshot;
mod state;

pub use derived::{ParameterPolicy, SortDirection, ViewConfig};
pub use handle::{ListViewHandle, RecordSource};
pub use snapshot::Snapshot;
pub use state::{AsyncListView, Completion, FetchTicket, Phase, ViewError, ViewState};
