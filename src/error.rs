//! Error types for skill-browse.
//!
//! Malformed page numbers and filter values are not errors here: the codec
//! and the filter store correct them to defaults without surfacing anything.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowseError>;

#[derive(Debug, Error)]
pub enum BrowseError {
    /// The catalog data source failed. Always retryable.
    #[error("catalog unavailable: {0}")]
    Network(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BrowseError {
    /// Whether a retry affordance should be offered for this failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Stable machine-readable code for robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::InvalidInput(_) => "invalid_input",
            Self::Io(_) => "io",
        }
    }
}

impl From<serde_json::Error> for BrowseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
