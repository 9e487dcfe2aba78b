//! Structured filter criteria and the store that applies edits to them.
//!
//! A [`FilterSet`] only ever holds non-empty values, so "absent" and "empty"
//! are the same state in storage, comparison and encoding.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The closed set of criteria a browse session can filter on.
///
/// Declaration order is the canonical encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    Search,
    Category,
    SkillLevel,
    AvailabilityType,
    Location,
}

impl FilterKey {
    pub const ALL: [Self; 5] = [
        Self::Search,
        Self::Category,
        Self::SkillLevel,
        Self::AvailabilityType,
        Self::Location,
    ];

    /// Query-string parameter name for this key.
    #[must_use]
    pub const fn param(self) -> &'static str {
        match self {
            Self::Search => "q",
            Self::Category => "category",
            Self::SkillLevel => "level",
            Self::AvailabilityType => "type",
            Self::Location => "location",
        }
    }

    #[must_use]
    pub fn from_param(param: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.param() == param)
    }

    /// Free text is matched by substring; every other key is structured.
    #[must_use]
    pub const fn is_free_text(self) -> bool {
        matches!(self, Self::Search)
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}

/// Immutable snapshot of all structured search criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<FilterKey, String>",
    from = "BTreeMap<FilterKey, String>"
)]
pub struct FilterSet {
    values: BTreeMap<FilterKey, String>,
}

impl FilterSet {
    /// The canonical empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `key` set to `value`. Blank values remove the key.
    #[must_use]
    pub fn with(&self, key: FilterKey, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.set_in_place(key, value.into());
        next
    }

    /// Returns a copy without `key`.
    #[must_use]
    pub fn without(&self, key: FilterKey) -> Self {
        let mut next = self.clone();
        next.values.remove(&key);
        next
    }

    pub(crate) fn set_in_place(&mut self, key: FilterKey, value: String) {
        if value.trim().is_empty() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value);
        }
    }

    /// The value for `key`, or `None` when the dimension is unconstrained.
    #[must_use]
    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Same as [`get`](Self::get) but with the empty string standing in for "unset".
    #[must_use]
    pub fn value(&self, key: FilterKey) -> &str {
        self.get(key).unwrap_or("")
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of constrained dimensions, for the filter-panel badge.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.values.len()
    }

    /// Constrained dimensions in canonical key order.
    pub fn iter(&self) -> impl Iterator<Item = (FilterKey, &str)> {
        self.values.iter().map(|(key, value)| (*key, value.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(FilterKey, S)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (FilterKey, S)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.set_in_place(key, value.into());
        }
        set
    }
}

impl From<BTreeMap<FilterKey, String>> for FilterSet {
    fn from(values: BTreeMap<FilterKey, String>) -> Self {
        values.into_iter().collect()
    }
}

impl From<FilterSet> for BTreeMap<FilterKey, String> {
    fn from(set: FilterSet) -> Self {
        set.values
    }
}

/// Result of applying an edit: the new snapshot and whether it differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChange {
    pub filters: FilterSet,
    pub changed: bool,
}

/// Holds the current [`FilterSet`] and page and applies partial updates.
///
/// The store never fetches anything. A `changed` edit always moves the page
/// back to 1; the caller reacts to the signal.
#[derive(Debug, Clone)]
pub struct FilterStore {
    filters: FilterSet,
    page: u32,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: FilterSet::new(),
            page: 1,
        }
    }

    /// Store hydrated from an existing snapshot, e.g. a decoded address.
    #[must_use]
    pub fn hydrated(filters: FilterSet, page: u32) -> Self {
        Self {
            filters,
            page: page.max(1),
        }
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterSet {
        &self.filters
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    pub fn set_filter(&mut self, key: FilterKey, value: impl Into<String>) -> FilterChange {
        let next = self.filters.with(key, value);
        self.replace(next)
    }

    pub fn clear_all(&mut self) -> FilterChange {
        self.replace(FilterSet::new())
    }

    /// Swap in a whole new snapshot, e.g. after committing a suggestion.
    pub fn replace(&mut self, next: FilterSet) -> FilterChange {
        let changed = next != self.filters;
        if changed {
            debug!(active = next.active_count(), "filters changed");
            self.filters = next;
            self.page = 1;
        }
        FilterChange {
            filters: self.filters.clone(),
            changed,
        }
    }

    /// Move to `page` without touching filters. Zero is corrected to 1.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        let changed = page != self.page;
        self.page = page;
        changed
    }

    /// Re-derive state from an externally supplied snapshot.
    pub fn sync(&mut self, filters: FilterSet, page: u32) -> bool {
        let filters_changed = filters != self.filters;
        self.filters = filters;
        let page_changed = self.set_page(page);
        filters_changed || page_changed
    }
}
