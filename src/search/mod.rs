//! Browse state: structured filters, the navigation address codec, page
//! windows and the fetch lifecycle.

pub mod filters;
pub mod navigation;
pub mod pagination;
pub mod predicate;
pub mod results;
pub mod session;

pub use filters::{FilterChange, FilterKey, FilterSet, FilterStore};
pub use navigation::{BrowseState, NavigationContext, decode, encode};
pub use pagination::{PageToken, Window, page_window};
pub use results::{
    Completion, DataSource, FetchKind, FetchOutcome, FetchTicket, Phase, ResultOrchestrator,
    ResultPage, ResultView,
};
pub use session::{BrowseEvent, BrowseSession};
