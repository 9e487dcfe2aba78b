//! Debounced, race-safe autocomplete.
//!
//! Text updates restart a single trailing-edge timer. When it fires the engine
//! hands out a [`LookupRequest`] tagged with a fresh sequence number; only the
//! response carrying the latest tag is ever applied, whatever order responses
//! arrive in.

use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::catalog::CatalogClient;
use crate::error::BrowseError;

use super::cursor::{Direction, SuggestionCursor};
use super::debounce::DebounceTimer;
use super::Suggestion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionConfig {
    /// Shorter input clears suggestions and schedules nothing.
    pub min_query_len: usize,
    pub debounce: Duration,
    pub max_results: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            debounce: Duration::from_millis(300),
            max_results: 8,
        }
    }
}

/// A lookup that is due to be sent to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub seq: u64,
    pub query: String,
    pub max_results: usize,
}

#[derive(Debug)]
pub struct LookupResponse {
    pub seq: u64,
    pub result: Result<Vec<Suggestion>, BrowseError>,
}

/// What pressing Enter in the search box amounts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    /// A highlighted suggestion was chosen.
    Suggestion(Suggestion),
    /// Nothing highlighted: the raw text is submitted as a plain search.
    Search(String),
}

#[derive(Debug)]
pub struct SuggestionEngine {
    config: SuggestionConfig,
    text: String,
    timer: DebounceTimer<String>,
    /// Tag of the most recently issued lookup; bumped on clear as well so
    /// that outstanding lookups can no longer match.
    latest_seq: u64,
    suggestions: Vec<Suggestion>,
    cursor: SuggestionCursor,
}

impl SuggestionEngine {
    #[must_use]
    pub const fn new(config: SuggestionConfig) -> Self {
        Self {
            config,
            text: String::new(),
            timer: DebounceTimer::new(config.debounce),
            latest_seq: 0,
            suggestions: Vec::new(),
            cursor: SuggestionCursor::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SuggestionConfig {
        &self.config
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    #[must_use]
    pub const fn cursor(&self) -> SuggestionCursor {
        self.cursor
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Suggestion> {
        self.cursor.selected().and_then(|i| self.suggestions.get(i))
    }

    /// When the pending lookup is due, for the caller's sleep.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// Record new input text at time `now`.
    pub fn on_input(&mut self, text: impl Into<String>, now: Instant) {
        self.text = text.into();
        self.cursor.reset();

        if self.text.trim().chars().count() < self.config.min_query_len {
            self.clear();
            return;
        }
        self.timer.schedule(now, self.text.trim().to_string());
    }

    /// Issue the pending lookup if the debounce window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<LookupRequest> {
        let query = self.timer.fire(now)?;
        self.latest_seq += 1;
        debug!(seq = self.latest_seq, query = %query, "issuing suggestion lookup");
        Some(LookupRequest {
            seq: self.latest_seq,
            query,
            max_results: self.config.max_results,
        })
    }

    /// Run `request` against the catalog without touching engine state, so
    /// several lookups may be outstanding at once.
    pub async fn lookup<C: CatalogClient>(client: &C, request: LookupRequest) -> LookupResponse {
        let result = client.suggest(&request.query, request.max_results).await;
        LookupResponse {
            seq: request.seq,
            result,
        }
    }

    /// Apply a finished lookup if it is the latest one issued.
    /// Returns whether the suggestion list was replaced.
    pub fn apply(&mut self, response: LookupResponse) -> bool {
        if response.seq != self.latest_seq {
            trace!(seq = response.seq, latest = self.latest_seq, "discarding stale suggestions");
            return false;
        }
        match response.result {
            Ok(mut suggestions) => {
                suggestions.truncate(self.config.max_results);
                self.suggestions = suggestions;
                self.cursor.clamp(self.suggestions.len());
            }
            Err(err) => {
                warn!(error = %err, "suggestion lookup failed");
                self.suggestions.clear();
                self.cursor.reset();
            }
        }
        true
    }

    pub fn move_selection(&mut self, direction: Direction) {
        self.cursor.step(direction, self.suggestions.len());
    }

    /// Enter pressed. Clears the list either way.
    pub fn commit(&mut self) -> Commit {
        let commit = self.selected().cloned().map_or_else(
            || Commit::Search(self.text.trim().to_string()),
            Commit::Suggestion,
        );
        if let Commit::Suggestion(suggestion) = &commit {
            self.text.clone_from(&suggestion.label);
        }
        self.clear();
        commit
    }

    /// Escape pressed or input cleared: drop the list, the pending timer and
    /// any outstanding lookups.
    pub fn clear(&mut self) {
        if self.timer.cancel() {
            trace!("pending suggestion lookup cancelled");
        }
        self.latest_seq += 1;
        self.suggestions.clear();
        self.cursor.reset();
    }
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new(SuggestionConfig::default())
    }
}
