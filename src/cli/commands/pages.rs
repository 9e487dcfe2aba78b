//! skb pages - Compute the pagination window

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{emit_robot, render_window, robot_ok};
use crate::error::{BrowseError, Result};
use crate::search::page_window;

#[derive(Args, Debug)]
pub struct PagesArgs {
    /// Current page (1-based)
    #[arg(long)]
    pub current: u32,

    /// Total number of pages
    #[arg(long)]
    pub total: u32,

    /// Page slots to show, counting the first and last page
    #[arg(long)]
    pub max_visible: Option<u32>,
}

pub fn run(ctx: &AppContext, args: &PagesArgs) -> Result<()> {
    if args.current == 0 {
        return Err(BrowseError::InvalidInput("--current must be at least 1".to_string()));
    }
    let max_visible = args
        .max_visible
        .unwrap_or(ctx.config.results.max_visible_pages);
    let window = page_window(args.current, args.total, max_visible);

    if ctx.robot() {
        return emit_robot(
            &robot_ok(serde_json::json!({
                "current": args.current.min(args.total.max(1)),
                "total_pages": args.total,
                "max_visible": max_visible,
                "window": window,
            })),
            ctx.config.robot.pretty,
        );
    }

    if window.is_empty() {
        println!("(single page)");
    } else {
        println!("{}", render_window(&window, args.current.min(args.total)));
    }
    Ok(())
}
