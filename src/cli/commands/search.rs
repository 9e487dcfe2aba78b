//! skb search - Run a browse session against a catalog

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::warn;

use super::FilterArgs;
use crate::app::AppContext;
use crate::catalog::{LocalCatalog, UnavailableCatalog};
use crate::cli::output::{HumanLayout, emit_human, emit_robot, render_window, robot_ok};
use crate::error::{BrowseError, Result};
use crate::search::results::{Completion, DataSource, FetchTicket, Phase};
use crate::search::{BrowseSession, FilterSet, ResultView, Window, encode};

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Page to open
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Start from a browse address (e.g. "?q=guitar&page=2") instead of filter flags
    #[arg(long)]
    pub address: Option<String>,

    /// Load this many further pages after the first, appending results
    #[arg(long, default_value_t = 0)]
    pub more: u32,

    /// JSON catalog file (defaults to the bundled sample)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Treat the catalog as unreachable to exercise the fallback path
    #[arg(long)]
    pub offline: bool,
}

#[derive(Debug, Serialize)]
struct SearchReport<'a> {
    address: String,
    filters: &'a FilterSet,
    active_filters: usize,
    view: &'a ResultView,
    window: Window,
    range: Option<(u64, u64)>,
    empty_state: bool,
}

pub async fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let catalog = ctx.catalog(args.catalog.as_deref())?;
    let mut session = BrowseSession::from_config(&ctx.config, Some(&catalog));

    let address = args
        .address
        .clone()
        .unwrap_or_else(|| encode(&args.filters.to_filters(), args.page));
    let ticket = session.hydrate(&address);
    drive(&mut session, &catalog, args.offline, ticket).await;

    for _ in 0..args.more {
        let Some(ticket) = session.load_more() else {
            break;
        };
        if drive(&mut session, &catalog, args.offline, ticket).await == Completion::Failed {
            break;
        }
    }

    let view = session.view();
    if view.phase == Phase::Error {
        let message = view.error.clone().unwrap_or_default();
        return Err(BrowseError::Network(message));
    }

    let report = SearchReport {
        address: session.navigation().href(),
        filters: session.filters(),
        active_filters: session.filters().active_count(),
        view,
        window: session.window(),
        range: view.page.range(),
        empty_state: view.is_empty_state(session.filters()),
    };

    if ctx.robot() {
        let mut response = robot_ok(&report);
        if let Some(error) = &view.error {
            response = response.with_warning(error.clone());
        }
        return emit_robot(&response, ctx.config.robot.pretty);
    }

    emit_human(human_layout(&report));
    Ok(())
}

async fn drive(
    session: &mut BrowseSession,
    catalog: &LocalCatalog,
    offline: bool,
    ticket: FetchTicket,
) -> Completion {
    let completion = if offline {
        session.run(&UnavailableCatalog, ticket).await
    } else {
        session.run(catalog, ticket).await
    };
    if completion == Completion::AppliedFallback {
        warn!("catalog unavailable, showing cached sample");
    }
    completion
}

fn human_layout(report: &SearchReport<'_>) -> HumanLayout {
    let page = &report.view.page;
    let mut layout = HumanLayout::new();
    layout.title("Skills");

    let address = if report.address.is_empty() {
        "(none)"
    } else {
        report.address.as_str()
    };
    layout.kv("address", address);
    if report.active_filters > 0 {
        let filters = report
            .filters
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(", ");
        layout.kv("filters", &filters);
    }
    let summary = report.range.map_or_else(
        || "0 results".to_string(),
        |(first, last)| format!("{first}-{last} of {}", page.total_count),
    );
    layout.kv("results", &summary);
    if report.view.source == DataSource::Fallback {
        layout.kv("source", "offline sample");
    }
    if let Some(error) = &report.view.error {
        layout.kv("error", error);
    }
    layout.blank();

    if report.empty_state {
        layout.push_line("No skills match these filters. Run `skb search` without filters to clear them.");
    }
    for listing in &page.items {
        layout.bullet(&format!(
            "{} ({}, {}, {}) by {}",
            listing.title,
            listing.category,
            listing.skill_level,
            listing.availability_type,
            listing.teacher
        ));
    }

    if !report.window.is_empty() {
        layout.blank();
        layout.kv("pages", &render_window(&report.window, page.page));
    }
    layout
}
