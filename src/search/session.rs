//! One browse session: wires the filter store, the navigation address, the
//! result orchestrator and the suggestion engine together.
//!
//! Every user action first re-derives the working state from the address,
//! then applies the edit, commits the new address and issues at most one
//! fetch ticket. Outbound UI events are queued for presentation code.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{CatalogClient, LocalCatalog};
use crate::config::Config;
use crate::suggestions::{Commit, Suggestion, SuggestionConfig, SuggestionEngine, SuggestionKind};

use super::filters::{FilterKey, FilterSet, FilterStore};
use super::navigation::NavigationContext;
use super::pagination::{Window, page_window};
use super::results::{
    Completion, FetchOutcome, FetchTicket, Phase, ResultOrchestrator, ResultView,
};

/// Events consumed by out-of-scope presentation code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BrowseEvent {
    FilterChange { filters: FilterSet },
    PageChange { page: u32 },
    SuggestionSelect { suggestion: Suggestion },
    SearchSubmit { text: String },
}

#[derive(Debug)]
pub struct BrowseSession {
    nav: NavigationContext,
    store: FilterStore,
    results: ResultOrchestrator,
    suggestions: SuggestionEngine,
    max_visible_pages: u32,
    events: Vec<BrowseEvent>,
}

impl BrowseSession {
    #[must_use]
    pub fn new(page_size: u32, suggestion_config: SuggestionConfig, max_visible_pages: u32) -> Self {
        Self {
            nav: NavigationContext::new(),
            store: FilterStore::new(),
            results: ResultOrchestrator::new(page_size),
            suggestions: SuggestionEngine::new(suggestion_config),
            max_visible_pages,
            events: Vec::new(),
        }
    }

    /// Session configured from `config`, with `fallback` bounded to the
    /// configured sample size when fallback is enabled.
    #[must_use]
    pub fn from_config(config: &Config, fallback: Option<&LocalCatalog>) -> Self {
        let session = Self::new(
            config.results.page_size,
            config.suggestions.to_engine_config(),
            config.results.max_visible_pages,
        );
        match fallback {
            Some(sample) if config.fallback.enabled => {
                session.with_fallback(sample.bounded(config.fallback.sample_size))
            }
            _ => session,
        }
    }

    /// Use `sample` as the degraded-mode data source.
    #[must_use]
    pub fn with_fallback(mut self, sample: LocalCatalog) -> Self {
        let page_size = self.results.page_size();
        self.results = ResultOrchestrator::new(page_size).with_fallback(sample);
        self
    }

    /// Start from an existing address and fetch the page it names.
    pub fn hydrate(&mut self, query: &str) -> FetchTicket {
        let state = self.nav.navigate(query);
        self.store.sync(state.filters.clone(), state.page);
        self.results.begin_jump(state.filters, state.page)
    }

    #[must_use]
    pub const fn navigation(&self) -> &NavigationContext {
        &self.nav
    }

    #[must_use]
    pub fn filters(&self) -> &FilterSet {
        self.store.filters()
    }

    #[must_use]
    pub const fn results(&self) -> &ResultOrchestrator {
        &self.results
    }

    #[must_use]
    pub const fn view(&self) -> &ResultView {
        self.results.view()
    }

    #[must_use]
    pub const fn suggestions(&self) -> &SuggestionEngine {
        &self.suggestions
    }

    pub const fn suggestions_mut(&mut self) -> &mut SuggestionEngine {
        &mut self.suggestions
    }

    /// Drain queued UI events.
    pub fn take_events(&mut self) -> Vec<BrowseEvent> {
        std::mem::take(&mut self.events)
    }

    /// Page tokens for the pagination control.
    #[must_use]
    pub fn window(&self) -> Window {
        let page = &self.view().page;
        page_window(page.page, page.total_pages, self.max_visible_pages)
    }

    fn resync(&mut self) {
        let state = self.nav.state();
        if self.store.sync(state.filters, state.page) {
            debug!(query = self.nav.query(), "re-derived browse state from address");
        }
    }

    fn apply_filters(&mut self, next: FilterSet) -> Option<FetchTicket> {
        self.resync();
        let change = self.store.replace(next);
        if !change.changed {
            return None;
        }
        self.nav.commit(&change.filters, self.store.page());
        self.events.push(BrowseEvent::FilterChange {
            filters: change.filters.clone(),
        });
        Some(self.results.begin_reset(change.filters))
    }

    /// Set one criterion. Returns a reset ticket when filters actually changed.
    pub fn set_filter(&mut self, key: FilterKey, value: impl Into<String>) -> Option<FetchTicket> {
        self.resync();
        let next = self.store.filters().with(key, value);
        self.apply_filters(next)
    }

    pub fn clear_filters(&mut self) -> Option<FetchTicket> {
        self.apply_filters(FilterSet::new())
    }

    /// Pagination control: replace-fetch `page`.
    pub fn go_to_page(&mut self, page: u32) -> Option<FetchTicket> {
        self.resync();
        let last = self.view().page.total_pages.max(1);
        let page = page.clamp(1, last);
        if !self.store.set_page(page) && self.view().page.page == page {
            return None;
        }
        self.nav.commit(self.store.filters(), page);
        self.events.push(BrowseEvent::PageChange { page });
        Some(self.results.begin_jump(self.store.filters().clone(), page))
    }

    /// Append the next page. `None` when not allowed right now.
    pub fn load_more(&mut self) -> Option<FetchTicket> {
        self.resync();
        if self.results.filters() != self.store.filters() {
            return None;
        }
        let ticket = self.results.begin_load_more()?;
        self.store.set_page(ticket.page);
        self.nav.commit(self.store.filters(), ticket.page);
        self.events.push(BrowseEvent::PageChange { page: ticket.page });
        Some(ticket)
    }

    pub fn retry(&mut self) -> FetchTicket {
        self.resync();
        self.results.begin_reset(self.store.filters().clone())
    }

    /// Back/forward or a pasted link: honour the address as given.
    pub fn navigate_to(&mut self, query: &str) -> Option<FetchTicket> {
        let before = self.nav.query().to_string();
        let state = self.nav.navigate(query);
        if self.nav.query() == before {
            return None;
        }
        self.store.sync(state.filters.clone(), state.page);
        Some(self.results.begin_jump(state.filters, state.page))
    }

    /// Browser back button.
    pub fn back(&mut self) -> Option<FetchTicket> {
        let state = self.nav.back()?;
        self.store.sync(state.filters.clone(), state.page);
        Some(self.results.begin_jump(state.filters, state.page))
    }

    /// Enter in the search box. A plain search sets the free-text filter; a
    /// category suggestion sets the category filter; other suggestions search
    /// by their label.
    pub fn submit_search(&mut self) -> Option<FetchTicket> {
        self.resync();
        match self.suggestions.commit() {
            Commit::Search(text) => {
                self.events.push(BrowseEvent::SearchSubmit { text: text.clone() });
                self.apply_filters(self.store.filters().with(FilterKey::Search, text))
            }
            Commit::Suggestion(suggestion) => {
                let next = match suggestion.kind {
                    SuggestionKind::Category => self
                        .store
                        .filters()
                        .without(FilterKey::Search)
                        .with(FilterKey::Category, suggestion.label.clone()),
                    SuggestionKind::Skill | SuggestionKind::Teacher => self
                        .store
                        .filters()
                        .with(FilterKey::Search, suggestion.label.clone()),
                };
                self.events.push(BrowseEvent::SuggestionSelect { suggestion });
                self.apply_filters(next)
            }
        }
    }

    /// Run one ticket to completion against `client`.
    pub async fn run<C: CatalogClient>(&mut self, client: &C, ticket: FetchTicket) -> Completion {
        let outcome = ResultOrchestrator::execute(client, ticket).await;
        self.complete(outcome)
    }

    /// Apply an outcome from [`ResultOrchestrator::execute`]. Outcomes may be
    /// fed in any order; superseded ones come back as [`Completion::Stale`].
    pub fn complete(&mut self, outcome: FetchOutcome) -> Completion {
        let completion = self.results.complete(outcome);
        if completion != Completion::Stale {
            self.settle_page();
        }
        completion
    }

    /// Keep the address's page in line with the page actually shown, e.g.
    /// when a jump past the last page was clamped by the catalog.
    ///
    /// Does nothing while a fetch is in flight or after a failed one: the
    /// page still on screen then belongs to the previous address. The
    /// correction replaces the current history entry.
    pub fn settle_page(&mut self) {
        if self.results.in_flight().is_some() || self.view().phase == Phase::Error {
            return;
        }
        let shown = self.view().page.page;
        if self.store.set_page(shown) {
            self.nav.replace(self.store.filters(), shown);
        }
    }
}

impl Default for BrowseSession {
    fn default() -> Self {
        Self::new(
            super::results::DEFAULT_PAGE_SIZE,
            SuggestionConfig::default(),
            super::pagination::DEFAULT_MAX_VISIBLE,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::search::results::FetchKind;
    use crate::test_utils::fixtures::sample_listings;

    fn session() -> (BrowseSession, LocalCatalog) {
        (
            BrowseSession::new(3, SuggestionConfig::default(), 7),
            LocalCatalog::new(sample_listings()),
        )
    }

    #[tokio::test]
    async fn filter_edit_resets_page_and_writes_address() {
        let (mut s, catalog) = session();
        let t = s.retry();
        s.run(&catalog, t).await;
        let t = s.go_to_page(2).expect("jump");
        s.run(&catalog, t).await;
        assert_eq!(s.navigation().query(), "page=2");

        let t = s.set_filter(FilterKey::Category, "Music").expect("changed");
        assert_eq!(t.kind, FetchKind::Reset);
        assert_eq!(t.page, 1);
        s.run(&catalog, t).await;
        assert_eq!(s.navigation().query(), "category=Music");
        assert_eq!(s.view().page.page, 1);
    }

    #[tokio::test]
    async fn load_more_appends_and_records_page() {
        let (mut s, catalog) = session();
        let t = s.retry();
        s.run(&catalog, t).await;
        let first = s.view().page.items.clone();

        let t = s.load_more().expect("more pages");
        s.run(&catalog, t).await;
        let items = &s.view().page.items;
        assert_eq!(items.len(), 6);
        assert_eq!(&items[..3], &first[..]);
        assert_eq!(s.navigation().query(), "page=2");
    }

    #[test]
    fn unchanged_filter_issues_nothing() {
        let (mut s, _) = session();
        assert!(s.set_filter(FilterKey::Location, "").is_none());
        assert!(s.take_events().is_empty());
    }

    #[tokio::test]
    async fn external_navigation_is_honoured() {
        let (mut s, catalog) = session();
        s.set_filter(FilterKey::Search, "guitar");
        let t = s.navigate_to("?category=Cooking&page=1").expect("address changed");
        s.run(&catalog, t).await;
        assert_eq!(s.filters(), &FilterSet::new().with(FilterKey::Category, "Cooking"));
        assert!(s.view().page.items.iter().all(|l| l.category == "Cooking"));

        let t = s.back().expect("history");
        assert_eq!(t.filters.get(FilterKey::Search), Some("guitar"));
    }

    #[test]
    fn plain_submit_sets_search_filter() {
        let (mut s, _) = session();
        s.suggestions_mut().on_input("knitting", Instant::now());
        let t = s.submit_search().expect("changed");
        assert_eq!(t.filters.get(FilterKey::Search), Some("knitting"));
        let events = s.take_events();
        assert_eq!(
            events[0],
            BrowseEvent::SearchSubmit {
                text: "knitting".into()
            }
        );
        assert!(matches!(events[1], BrowseEvent::FilterChange { .. }));
    }

    #[tokio::test]
    async fn category_suggestion_sets_category_filter() {
        let (mut s, catalog) = session();
        let start = Instant::now();
        s.suggestions_mut().on_input("cook", start);
        let req = s
            .suggestions_mut()
            .poll(start + Duration::from_millis(300))
            .expect("due");
        let resp = SuggestionEngine::lookup(&catalog, req).await;
        s.suggestions_mut().apply(resp);
        let idx = s
            .suggestions()
            .suggestions()
            .iter()
            .position(|sug| sug.kind == SuggestionKind::Category)
            .expect("category suggestion");
        for _ in 0..=idx {
            s.suggestions_mut()
                .move_selection(crate::suggestions::Direction::Down);
        }

        let t = s.submit_search().expect("changed");
        assert_eq!(t.filters.get(FilterKey::Category), Some("Cooking"));
        assert_eq!(t.filters.get(FilterKey::Search), None);
    }

    #[tokio::test]
    async fn offline_reset_falls_back_and_keeps_retry() {
        use crate::test_utils::ScriptedCatalog;

        let mut s = BrowseSession::new(3, SuggestionConfig::default(), 7)
            .with_fallback(LocalCatalog::new(sample_listings()));
        let offline = ScriptedCatalog::failing();
        let t = s.set_filter(FilterKey::Category, "Music").expect("changed");
        s.run(&offline, t).await;

        assert_eq!(s.view().phase, Phase::Ready);
        assert!(s.view().error.is_some());
        assert!(s.view().page.items.iter().all(|l| l.category == "Music"));
    }

    #[tokio::test]
    async fn jump_past_last_page_settles_address() {
        let (mut s, catalog) = session();
        let t = s.hydrate("?category=Music&page=40");
        s.run(&catalog, t).await;
        let shown = s.view().page.page;
        assert_eq!(shown, s.view().page.total_pages);
        assert!(shown > 1);
        assert_eq!(
            s.navigation().query(),
            crate::search::navigation::encode(s.filters(), shown)
        );
    }

    #[tokio::test]
    async fn clamped_page_does_not_leave_a_history_entry() {
        let (mut s, catalog) = session();
        let t = s.navigate_to("?category=Music&page=40").expect("address changed");
        s.run(&catalog, t).await;
        assert_eq!(s.navigation().query(), "category=Music&page=2");

        let t = s.back().expect("history");
        assert!(t.filters.is_empty());
        assert_eq!(t.page, 1);
        assert!(s.navigation().query().is_empty());
    }

    #[tokio::test]
    async fn failed_load_more_returns_address_to_shown_page() {
        use crate::test_utils::ScriptedCatalog;

        let (mut s, catalog) = session();
        let t = s.retry();
        s.run(&catalog, t).await;
        let t = s.load_more().expect("more pages");
        assert_eq!(s.navigation().query(), "page=2");

        assert_eq!(s.run(&ScriptedCatalog::failing(), t).await, Completion::Failed);
        assert_eq!(s.view().phase, Phase::Ready);
        assert_eq!(s.view().page.page, 1);
        assert_eq!(s.navigation().query(), "");
    }
}
