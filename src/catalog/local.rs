//! In-memory catalog.
//!
//! Serves as the bundled demo data source and as the bounded sample the
//! orchestrator falls back to. Filtering goes through the shared predicate.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{BrowseError, Result};
use crate::search::predicate::matches;
use crate::search::{FilterSet, ResultPage};
use crate::suggestions::{Suggestion, SuggestionKind};

use super::{CatalogClient, SkillListing};

const BUNDLED_CATALOG: &str = include_str!("../../data/sample_catalog.json");

#[derive(Debug, Clone, Default)]
pub struct LocalCatalog {
    listings: Vec<SkillListing>,
}

impl LocalCatalog {
    #[must_use]
    pub const fn new(listings: Vec<SkillListing>) -> Self {
        Self { listings }
    }

    /// The sample dataset shipped with the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let listings: Vec<SkillListing> = serde_json::from_str(raw)
            .map_err(|err| BrowseError::Serialization(format!("catalog parse: {err}")))?;
        Ok(Self::new(listings))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// A copy holding at most `limit` listings.
    #[must_use]
    pub fn bounded(&self, limit: usize) -> Self {
        Self::new(self.listings.iter().take(limit).cloned().collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    #[must_use]
    pub fn listings(&self) -> &[SkillListing] {
        &self.listings
    }

    /// Synchronous search, in catalog order.
    #[must_use]
    pub fn search_local(&self, filters: &FilterSet, page: u32, page_size: u32) -> ResultPage {
        let hits: Vec<SkillListing> = self
            .listings
            .iter()
            .filter(|listing| matches(listing, filters))
            .cloned()
            .collect();
        ResultPage::from_matches(&hits, page, page_size)
    }

    /// Case-insensitive substring suggestions over titles, categories,
    /// teachers and specialties. Prefix hits rank first, then rating.
    #[must_use]
    pub fn suggest_local(&self, query: &str, max_results: usize) -> Vec<Suggestion> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || max_results == 0 {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut scored: Vec<(bool, Suggestion)> = Vec::new();
        let mut push = |hit: bool,
                        kind: SuggestionKind,
                        label: &str,
                        secondary: Option<&str>,
                        listing: &SkillListing,
                        id: String| {
            let lowered = label.to_lowercase();
            if !hit || !seen.insert((kind, lowered.clone())) {
                return;
            }
            scored.push((
                lowered.starts_with(&needle),
                Suggestion {
                    id,
                    kind,
                    label: label.to_string(),
                    secondary_text: secondary.map(str::to_string),
                    score: listing.rating,
                },
            ));
        };

        for listing in &self.listings {
            push(
                listing.title.to_lowercase().contains(&needle),
                SuggestionKind::Skill,
                &listing.title,
                Some(&listing.teacher),
                listing,
                listing.id.clone(),
            );
            push(
                listing.category.to_lowercase().contains(&needle),
                SuggestionKind::Category,
                &listing.category,
                None,
                listing,
                format!("category:{}", listing.category.to_lowercase()),
            );
            let specialty = listing
                .specialties
                .iter()
                .find(|s| s.to_lowercase().contains(&needle));
            push(
                listing.teacher.to_lowercase().contains(&needle) || specialty.is_some(),
                SuggestionKind::Teacher,
                &listing.teacher,
                Some(specialty.map_or(listing.category.as_str(), String::as_str)),
                listing,
                format!("teacher:{}", listing.teacher.to_lowercase()),
            );
        }

        scored.sort_by(|(a_prefix, a), (b_prefix, b)| {
            b_prefix
                .cmp(a_prefix)
                .then_with(|| b.score.total_cmp(&a.score))
                .then_with(|| a.label.cmp(&b.label))
        });
        scored
            .into_iter()
            .map(|(_, suggestion)| suggestion)
            .take(max_results)
            .collect()
    }
}

impl CatalogClient for LocalCatalog {
    async fn search(&self, filters: &FilterSet, page: u32, page_size: u32) -> Result<ResultPage> {
        Ok(self.search_local(filters, page, page_size))
    }

    async fn suggest(&self, query: &str, max_results: usize) -> Result<Vec<Suggestion>> {
        Ok(self.suggest_local(query, max_results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::FilterKey;
    use crate::test_utils::fixtures::sample_listings;

    #[test]
    fn bundled_catalog_parses() {
        let catalog = LocalCatalog::bundled().expect("bundled catalog");
        assert!(catalog.len() >= 20);
    }

    #[test]
    fn bounded_truncates() {
        let catalog = LocalCatalog::new(sample_listings());
        assert_eq!(catalog.bounded(3).len(), 3);
        assert_eq!(catalog.bounded(1000).len(), catalog.len());
    }

    #[test]
    fn search_filters_and_pages() {
        let catalog = LocalCatalog::new(sample_listings());
        let filters = FilterSet::new().with(FilterKey::Category, "music");
        let page = catalog.search_local(&filters, 1, 2);
        assert_eq!(page.items.len(), 2);
        assert!(page.total_count >= 3);
        assert!(page.items.iter().all(|l| l.category == "Music"));
    }

    #[test]
    fn suggestions_are_bounded_and_deduplicated() {
        let catalog = LocalCatalog::new(sample_listings());
        let suggestions = catalog.suggest_local("m", 3);
        assert!(suggestions.len() <= 3);

        let all = catalog.suggest_local("music", 50);
        let categories = all
            .iter()
            .filter(|s| s.kind == SuggestionKind::Category)
            .count();
        assert_eq!(categories, 1);
    }

    #[test]
    fn prefix_matches_rank_first() {
        let catalog = LocalCatalog::new(sample_listings());
        let suggestions = catalog.suggest_local("gui", 10);
        assert!(!suggestions.is_empty());
        assert!(suggestions[0].label.to_lowercase().starts_with("gui"));
    }

    #[test]
    fn teacher_suggestion_found_by_specialty() {
        let catalog = LocalCatalog::new(sample_listings());
        let suggestions = catalog.suggest_local("sourdough", 10);
        assert!(suggestions.iter().any(|s| s.kind == SuggestionKind::Teacher));
    }

    #[test]
    fn blank_query_suggests_nothing() {
        let catalog = LocalCatalog::new(sample_listings());
        assert!(catalog.suggest_local("  ", 8).is_empty());
    }
}
