//! skill-browse - search and discovery control layer for a skill marketplace.
//!
//! Free-text queries, structured filters, live suggestions and paging, with
//! the whole browse state mirrored in a shareable query string.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod search;
pub mod suggestions;
pub mod test_utils;

pub use error::{BrowseError, Result};
