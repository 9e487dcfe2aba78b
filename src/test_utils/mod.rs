//! Shared test utilities for skill-browse.

pub mod fixtures;

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::catalog::{CatalogClient, LocalCatalog, SkillListing};
use crate::error::{BrowseError, Result};
use crate::search::{FilterSet, ResultPage};
use crate::suggestions::Suggestion;

/// Table-driven test case structure.
#[derive(Debug, Clone)]
pub struct TestCase<I, E> {
    pub name: &'static str,
    pub input: I,
    pub expected: E,
}

/// Run every case, reporting all mismatches at once.
pub fn run_table_tests<I, E, F>(cases: Vec<TestCase<I, E>>, test_fn: F) -> std::result::Result<(), String>
where
    I: std::fmt::Debug,
    E: std::fmt::Debug + PartialEq,
    F: Fn(I) -> E,
{
    let mut failures = Vec::new();
    for case in cases {
        println!("[TEST] {}: {:?}", case.name, case.input);
        let actual = test_fn(case.input);
        if actual != case.expected {
            failures.push(format!(
                "'{}': expected {:?}, got {:?}",
                case.name, case.expected, actual
            ));
        }
    }
    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures.join("\n"))
    }
}

/// Catalog double with per-request latency, forced failures and a call log.
///
/// Delays go through `tokio::time::sleep`, so tests running with a paused
/// clock can resolve requests in any order deterministically.
#[derive(Debug, Default)]
pub struct ScriptedCatalog {
    inner: LocalCatalog,
    fail: bool,
    search_delays: Vec<(FilterSet, Duration)>,
    suggest_delays: Vec<(String, Duration)>,
    search_calls: Mutex<Vec<(FilterSet, u32)>>,
    suggest_calls: Mutex<Vec<String>>,
}

impl ScriptedCatalog {
    #[must_use]
    pub fn new(listings: Vec<SkillListing>) -> Self {
        Self {
            inner: LocalCatalog::new(listings),
            ..Self::default()
        }
    }

    /// A catalog whose every call fails with a network error.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_search_delay(mut self, filters: FilterSet, delay: Duration) -> Self {
        self.search_delays.push((filters, delay));
        self
    }

    #[must_use]
    pub fn with_suggest_delay(mut self, query: &str, delay: Duration) -> Self {
        self.suggest_delays.push((query.to_string(), delay));
        self
    }

    #[must_use]
    pub fn search_calls(&self) -> Vec<(FilterSet, u32)> {
        self.search_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn suggest_calls(&self) -> Vec<String> {
        self.suggest_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CatalogClient for ScriptedCatalog {
    async fn search(&self, filters: &FilterSet, page: u32, page_size: u32) -> Result<ResultPage> {
        self.search_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((filters.clone(), page));
        if let Some((_, delay)) = self.search_delays.iter().find(|(f, _)| f == filters) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail {
            return Err(BrowseError::Network("scripted outage".to_string()));
        }
        Ok(self.inner.search_local(filters, page, page_size))
    }

    async fn suggest(&self, query: &str, max_results: usize) -> Result<Vec<Suggestion>> {
        self.suggest_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_string());
        if let Some((_, delay)) = self.suggest_delays.iter().find(|(q, _)| q == query) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail {
            return Err(BrowseError::Network("scripted outage".to_string()));
        }
        Ok(self.inner.suggest_local(query, max_results))
    }
}
