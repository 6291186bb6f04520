//! Presentation state computed locally from fetched records.

use std::{cmp::Reverse, collections::HashSet, fmt, hash::Hash, sync::Arc};

use serde::{Deserialize, Serialize};

pub type SortField<R> = Arc<dyn Fn(&R) -> i64 + Send + Sync>;
pub type RecordFilter<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedState<K: Eq + Hash> {
    pub sort_direction: SortDirection,
    pub expanded_keys: HashSet<K>,
}

impl<K: Eq + Hash> Default for DerivedState<K> {
    fn default() -> Self {
        Self {
            sort_direction: SortDirection::default(),
            expanded_keys: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> DerivedState<K> {
    /// Flips membership and reports whether `key` is now expanded.
    pub fn toggle_expanded(&mut self, key: &K) -> bool {
        if self.expanded_keys.remove(key) {
            false
        } else {
            self.expanded_keys.insert(key.clone());
            true
        }
    }

    /// Keeps user options, drops expansion for records that went away.
    pub fn recompute_for<'a>(&mut self, live_keys: impl IntoIterator<Item = &'a K>)
    where
        K: 'a,
    {
        let live: HashSet<&K> = live_keys.into_iter().collect();
        self.expanded_keys.retain(|key| live.contains(key));
    }
}

/// How `initialize` treats the fetch parameter it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterPolicy {
    /// The collection is selected by a fetch parameter that must validate.
    Required,
    /// The collection is global; any parameter is ignored.
    Unused,
}

/// How a view derives its presentation from raw records.
pub struct ViewConfig<R> {
    pub parameter: ParameterPolicy,
    sort_field: Option<SortField<R>>,
    filter: Option<RecordFilter<R>>,
}

impl<R> ViewConfig<R> {
    pub fn new(parameter: ParameterPolicy) -> Self {
        Self {
            parameter,
            sort_field: None,
            filter: None,
        }
    }

    pub fn sorted_by(mut self, field: impl Fn(&R) -> i64 + Send + Sync + 'static) -> Self {
        self.sort_field = Some(Arc::new(field));
        self
    }

    pub fn filtered_by(mut self, filter: impl Fn(&R) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }
}

impl<R: Clone> ViewConfig<R> {
    pub(crate) fn project(&self, records: &[R], direction: SortDirection) -> Vec<R> {
        let mut items: Vec<R> = match &self.filter {
            Some(keep) => records.iter().filter(|&record| keep(record)).cloned().collect(),
            None => records.to_vec(),
        };
        if let Some(field) = &self.sort_field {
            sort_stable(&mut items, field.as_ref(), direction);
        }
        items
    }
}

impl<R> Clone for ViewConfig<R> {
    fn clone(&self) -> Self {
        Self {
            parameter: self.parameter,
            sort_field: self.sort_field.clone(),
            filter: self.filter.clone(),
        }
    }
}

impl<R> fmt::Debug for ViewConfig<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewConfig")
            .field("parameter", &self.parameter)
            .field("sortable", &self.sort_field.is_some())
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

/// Ties keep arrival order in both directions.
pub fn sort_stable<R>(
    items: &mut [R],
    field: &(dyn Fn(&R) -> i64 + Send + Sync),
    direction: SortDirection,
) {
    match direction {
        SortDirection::Ascending => items.sort_by_key(|item| field(item)),
        SortDirection::Descending => items.sort_by_key(|item| Reverse(field(item))),
    }
}
