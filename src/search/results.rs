//! Result paging and the fetch lifecycle state machine.
//!
//! Every fetch is issued as a [`FetchTicket`] carrying a sequence number. A
//! completion is applied only when its ticket is the most recently issued
//! one; anything else is dropped. In-flight calls are never aborted, their
//! results are just ignored.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::catalog::{CatalogClient, LocalCatalog, SkillListing};
use crate::error::BrowseError;

use super::filters::FilterSet;

pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// One fetched page of results plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub items: Vec<SkillListing>,
    /// 1-based, always within `[1, max(total_pages, 1)]`.
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
}

impl ResultPage {
    /// Build a page, deriving `total_pages` and clamping `page`.
    #[must_use]
    pub fn new(items: Vec<SkillListing>, page: u32, page_size: u32, total_count: u64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_pages(total_count, page_size);
        Self {
            items,
            page: page.clamp(1, total_pages.max(1)),
            page_size,
            total_count,
            total_pages,
        }
    }

    #[must_use]
    pub fn empty(page_size: u32) -> Self {
        Self::new(Vec::new(), 1, page_size, 0)
    }

    /// Slice `page` out of an already filtered, ordered record list.
    #[must_use]
    pub fn from_matches(matches: &[SkillListing], page: u32, page_size: u32) -> Self {
        let size = page_size.max(1) as usize;
        let total = matches.len() as u64;
        let mut result = Self::new(Vec::new(), page, page_size, total);
        let offset = (result.page as usize - 1) * size;
        result.items = matches.iter().skip(offset).take(size).cloned().collect();
        result
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Whether a load-more action has anything left to fetch.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-based index range of the items currently held, as `(first, last)`.
    ///
    /// After load-more the range starts at 1 since earlier pages stay held.
    #[must_use]
    pub fn range(&self) -> Option<(u64, u64)> {
        if self.items.is_empty() {
            return None;
        }
        let held = self.items.len() as u64;
        let last = (u64::from(self.page) * u64::from(self.page_size)).min(self.total_count);
        let first = last.saturating_sub(held) + 1;
        Some((first, last))
    }

    /// Append a following page, taking over its pagination metadata.
    pub fn extend(&mut self, next: Self) {
        self.items.extend(next.items);
        self.page = next.page;
        self.page_size = next.page_size;
        self.total_count = next.total_count;
        self.total_pages = next.total_pages;
    }
}

/// `ceil(total_count / page_size)`, zero when there is nothing to show.
#[must_use]
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    let pages = total_count.div_ceil(u64::from(page_size.max(1)));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// What a fetch is for, which decides how its result is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    /// Filters changed or retry: page 1, replace items.
    Reset,
    /// Pagination control jump or external navigation: replace items.
    Jump,
    /// Append the next page to what is already shown.
    LoadMore,
}

/// An issued request. Hand it to [`ResultOrchestrator::execute`] and feed the
/// outcome back through [`ResultOrchestrator::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub kind: FetchKind,
    pub filters: FilterSet,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<ResultPage, BrowseError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    LoadingMore,
    Ready,
    Error,
}

/// Where the currently shown items came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Live,
    Fallback,
}

/// Renderable snapshot. There is always a page to draw, even after errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultView {
    pub phase: Phase,
    pub page: ResultPage,
    pub source: DataSource,
    /// Message for the retry banner.
    pub error: Option<String>,
}

impl ResultView {
    /// Ready with nothing to show while filters are active: offer to clear them.
    #[must_use]
    pub fn is_empty_state(&self, filters: &FilterSet) -> bool {
        self.phase == Phase::Ready && self.page.is_empty() && !filters.is_empty()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading | Phase::LoadingMore)
    }
}

/// Whether a completion changed what is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// Applied from the local sample after the data source failed.
    AppliedFallback,
    /// Data source failed; the last good page is kept and an error shown.
    Failed,
    /// Superseded by a newer request.
    Stale,
}

#[derive(Debug)]
pub struct ResultOrchestrator {
    page_size: u32,
    fallback: Option<LocalCatalog>,
    view: ResultView,
    filters: FilterSet,
    next_seq: u64,
    in_flight: Option<FetchTicket>,
}

impl ResultOrchestrator {
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            fallback: None,
            view: ResultView {
                phase: Phase::Idle,
                page: ResultPage::empty(page_size),
                source: DataSource::Live,
                error: None,
            },
            filters: FilterSet::new(),
            next_seq: 0,
            in_flight: None,
        }
    }

    /// Serve from `sample` when the primary data source fails.
    #[must_use]
    pub fn with_fallback(mut self, sample: LocalCatalog) -> Self {
        self.fallback = Some(sample);
        self
    }

    #[must_use]
    pub const fn view(&self) -> &ResultView {
        &self.view
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.view.phase
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterSet {
        &self.filters
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Ticket of the request whose result would currently be applied.
    #[must_use]
    pub const fn in_flight(&self) -> Option<&FetchTicket> {
        self.in_flight.as_ref()
    }

    /// Filters changed: start over at page 1. Supersedes anything in flight.
    pub fn begin_reset(&mut self, filters: FilterSet) -> FetchTicket {
        self.begin_replace(FetchKind::Reset, filters, 1)
    }

    /// Replace-fetch of an arbitrary page with the given filters.
    pub fn begin_jump(&mut self, filters: FilterSet, page: u32) -> FetchTicket {
        self.begin_replace(FetchKind::Jump, filters, page.max(1))
    }

    /// Re-run the last filters from page 1.
    pub fn retry(&mut self) -> FetchTicket {
        let filters = self.filters.clone();
        self.begin_reset(filters)
    }

    /// Fetch the following page, if there is one and nothing is in flight.
    /// Pages served from the fallback sample are never extended; a retry
    /// replaces them with live data first.
    pub fn begin_load_more(&mut self) -> Option<FetchTicket> {
        if self.in_flight.is_some() {
            trace!("load-more ignored: fetch already in flight");
            return None;
        }
        if !matches!(self.view.phase, Phase::Ready) || !self.view.page.has_more() {
            return None;
        }
        if self.view.source == DataSource::Fallback {
            trace!("load-more ignored: showing fallback sample, retry to go live");
            return None;
        }
        self.view.phase = Phase::LoadingMore;
        let page = self.view.page.page + 1;
        Some(self.issue(FetchKind::LoadMore, self.filters.clone(), page))
    }

    fn begin_replace(&mut self, kind: FetchKind, filters: FilterSet, page: u32) -> FetchTicket {
        self.filters = filters.clone();
        self.view.phase = Phase::Loading;
        self.issue(kind, filters, page)
    }

    fn issue(&mut self, kind: FetchKind, filters: FilterSet, page: u32) -> FetchTicket {
        self.next_seq += 1;
        let ticket = FetchTicket {
            seq: self.next_seq,
            kind,
            filters,
            page,
            page_size: self.page_size,
        };
        debug!(seq = ticket.seq, ?kind, page, "issuing catalog fetch");
        self.in_flight = Some(ticket.clone());
        ticket
    }

    /// Run the catalog call for `ticket`. Does not touch orchestrator state,
    /// so several tickets may be outstanding at once.
    pub async fn execute<C: CatalogClient>(client: &C, ticket: FetchTicket) -> FetchOutcome {
        let result = client
            .search(&ticket.filters, ticket.page, ticket.page_size)
            .await;
        FetchOutcome { ticket, result }
    }

    /// Apply a finished fetch if it is still the most recently issued one.
    pub fn complete(&mut self, outcome: FetchOutcome) -> Completion {
        let FetchOutcome { ticket, result } = outcome;
        let current = self.in_flight.as_ref().map(|t| t.seq);
        if current != Some(ticket.seq) {
            trace!(seq = ticket.seq, ?current, "discarding stale fetch result");
            return Completion::Stale;
        }
        self.in_flight = None;

        match (ticket.kind, result) {
            (FetchKind::LoadMore, Ok(next)) => {
                self.view.page.extend(next);
                self.view.phase = Phase::Ready;
                self.view.error = None;
                Completion::Applied
            }
            (FetchKind::LoadMore, Err(err)) => {
                warn!(error = %err, page = ticket.page, "load-more failed, keeping shown items");
                self.view.phase = Phase::Ready;
                self.view.error = Some(err.to_string());
                Completion::Failed
            }
            (_, Ok(page)) => {
                self.view = ResultView {
                    phase: Phase::Ready,
                    page,
                    source: DataSource::Live,
                    error: None,
                };
                Completion::Applied
            }
            (_, Err(err)) => self.recover(&ticket, &err),
        }
    }

    fn recover(&mut self, ticket: &FetchTicket, err: &BrowseError) -> Completion {
        if let Some(sample) = &self.fallback {
            warn!(error = %err, "catalog failed, serving local sample");
            let page = sample.search_local(&ticket.filters, ticket.page, ticket.page_size);
            self.view = ResultView {
                phase: Phase::Ready,
                page,
                source: DataSource::Fallback,
                error: Some(err.to_string()),
            };
            return Completion::AppliedFallback;
        }
        warn!(error = %err, "catalog failed, keeping last good page");
        self.view.phase = Phase::Error;
        self.view.error = Some(err.to_string());
        Completion::Failed
    }

    /// Issue, execute and complete a single fetch.
    pub async fn run<C: CatalogClient>(&mut self, client: &C, ticket: FetchTicket) -> Completion {
        let outcome = Self::execute(client, ticket).await;
        self.complete(outcome)
    }
}
