//! Two-way codec between browse state and the navigation address.
//!
//! The address is the only persisted piece of browse state. [`NavigationContext`]
//! is its single write choke point; readers decode it on every read instead of
//! keeping their own copy, so back/forward and pasted links are always honoured.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::filters::{FilterKey, FilterSet};

const PAGE_PARAM: &str = "page";

/// Decoded form of a navigation address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseState {
    pub filters: FilterSet,
    pub page: u32,
}

impl BrowseState {
    #[must_use]
    pub fn new(filters: FilterSet, page: u32) -> Self {
        Self {
            filters,
            page: page.max(1),
        }
    }
}

/// Canonical query string (without the leading `?`) for `filters` at `page`.
///
/// Unset keys and page 1 are omitted; keys always appear in [`FilterKey::ALL`]
/// order, so equal states produce byte-identical strings.
#[must_use]
pub fn encode(filters: &FilterSet, page: u32) -> String {
    let mut pairs: Vec<String> = filters
        .iter()
        .map(|(key, value)| format!("{}={}", key.param(), urlencoding::encode(value)))
        .collect();
    if page > 1 {
        pairs.push(format!("{PAGE_PARAM}={page}"));
    }
    pairs.join("&")
}

/// Parse a query string, with or without the leading `?`.
///
/// Unknown keys are ignored. A missing, zero, negative or non-numeric page
/// becomes 1. When a key repeats, the last occurrence wins.
#[must_use]
pub fn decode(query: &str) -> BrowseState {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut filters = FilterSet::new();
    let mut page = 1;

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (name, raw) = pair.split_once('=').unwrap_or((pair, ""));
        let value = decode_component(raw);

        if name == PAGE_PARAM {
            page = parse_page(&value);
        } else if let Some(key) = FilterKey::from_param(name) {
            filters.set_in_place(key, value);
        } else {
            trace!(param = name, "ignoring unknown navigation parameter");
        }
    }

    BrowseState { filters, page }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).map_or(spaced.clone(), std::borrow::Cow::into_owned)
}

fn parse_page(value: &str) -> u32 {
    match value.trim().parse::<u32>() {
        Ok(page) if page >= 1 => page,
        _ => 1,
    }
}

/// Holder of the shared navigation address.
#[derive(Debug, Clone, Default)]
pub struct NavigationContext {
    query: String,
    history: Vec<String>,
}

impl NavigationContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context starting at an existing address, re-encoded canonically.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let state = decode(query);
        Self {
            query: encode(&state.filters, state.page),
            history: Vec::new(),
        }
    }

    /// Current canonical query string without the leading `?`.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Address as it would appear after the path, e.g. `?q=react&page=2`.
    #[must_use]
    pub fn href(&self) -> String {
        if self.query.is_empty() {
            String::new()
        } else {
            format!("?{}", self.query)
        }
    }

    /// Decode the current address.
    #[must_use]
    pub fn state(&self) -> BrowseState {
        decode(&self.query)
    }

    /// Write a new state. Returns whether the address actually changed.
    pub fn commit(&mut self, filters: &FilterSet, page: u32) -> bool {
        let next = encode(filters, page);
        if next == self.query {
            return false;
        }
        let previous = std::mem::replace(&mut self.query, next);
        self.history.push(previous);
        true
    }

    /// Rewrite the current address in place without adding a history entry.
    /// Returns whether the address changed.
    pub fn replace(&mut self, filters: &FilterSet, page: u32) -> bool {
        let next = encode(filters, page);
        if next == self.query {
            return false;
        }
        self.query = next;
        true
    }

    /// Jump to an address supplied from outside (back/forward, pasted link).
    pub fn navigate(&mut self, query: &str) -> BrowseState {
        let state = decode(query);
        self.commit(&state.filters, state.page);
        state
    }

    /// Step back to the previous address, if any.
    pub fn back(&mut self) -> Option<BrowseState> {
        let previous = self.history.pop()?;
        self.query = previous;
        Some(self.state())
    }
}
