//! Catalog data source boundary.
//!
//! The browse core only decides when a catalog is queried and with which
//! parameters. Ranking and matching on the real backend are its own business.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::{BrowseError, Result};
use crate::search::{FilterSet, ResultPage};
use crate::suggestions::Suggestion;

pub mod local;

pub use local::LocalCatalog;

/// A skill offering as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillListing {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub skill_level: String,
    pub availability_type: String,
    #[serde(default)]
    pub location: String,
    pub teacher: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub rating: f64,
}

impl SkillListing {
    /// Fields that free-text search looks at.
    pub fn searchable_text(&self) -> impl Iterator<Item = &str> {
        [
            self.title.as_str(),
            self.description.as_str(),
            self.category.as_str(),
            self.teacher.as_str(),
        ]
        .into_iter()
        .chain(self.specialties.iter().map(String::as_str))
    }
}

/// The data source the orchestrator and suggestion engine talk to.
///
/// Implementations need not support cancellation; late responses are
/// tolerated and discarded by the callers.
pub trait CatalogClient {
    /// Fetch one page of listings satisfying `filters`.
    fn search(
        &self,
        filters: &FilterSet,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<ResultPage>>;

    /// Ranked suggestions for partially typed `query`, best first.
    fn suggest(&self, query: &str, max_results: usize) -> impl Future<Output = Result<Vec<Suggestion>>>;
}

/// A data source that is down. Every call fails with a network error.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableCatalog;

impl CatalogClient for UnavailableCatalog {
    async fn search(&self, _filters: &FilterSet, _page: u32, _page_size: u32) -> Result<ResultPage> {
        Err(BrowseError::Network("catalog is offline".to_string()))
    }

    async fn suggest(&self, _query: &str, _max_results: usize) -> Result<Vec<Suggestion>> {
        Err(BrowseError::Network("catalog is offline".to_string()))
    }
}
