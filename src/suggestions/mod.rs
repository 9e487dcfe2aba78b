//! Autocomplete while typing: debounced lookups, stale-response discard and
//! keyboard selection.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod cursor;
pub mod debounce;
pub mod engine;

pub use cursor::{Direction, SuggestionCursor};
pub use debounce::DebounceTimer;
pub use engine::{Commit, LookupRequest, LookupResponse, SuggestionConfig, SuggestionEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Skill,
    Category,
    Teacher,
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Skill => "skill",
            Self::Category => "category",
            Self::Teacher => "teacher",
        })
    }
}

/// One autocomplete entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub kind: SuggestionKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<String>,
    /// Relevance metric supplied by the catalog. Higher is better.
    #[serde(default)]
    pub score: f64,
}
