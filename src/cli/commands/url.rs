//! skb url - Encode or decode a browse address

use clap::{Args, Subcommand};
use console::style;

use super::FilterArgs;
use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::Result;
use crate::search::{BrowseState, decode, encode};

#[derive(Args, Debug)]
pub struct UrlArgs {
    #[command(subcommand)]
    pub command: UrlCommand,
}

#[derive(Subcommand, Debug)]
pub enum UrlCommand {
    /// Build the canonical address for a set of filters
    Encode {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Parse an address back into filters and page
    Decode {
        /// Query string, with or without the leading '?'
        query: String,
    },
}

pub fn run(ctx: &AppContext, args: &UrlArgs) -> Result<()> {
    match &args.command {
        UrlCommand::Encode { filters, page } => {
            let query = encode(&filters.to_filters(), *page);
            if ctx.robot() {
                return emit_robot(
                    &robot_ok(serde_json::json!({ "query": query })),
                    ctx.config.robot.pretty,
                );
            }
            println!("{query}");
            Ok(())
        }
        UrlCommand::Decode { query } => {
            let state = decode(query);
            if ctx.robot() {
                return emit_robot(&robot_ok(&state), ctx.config.robot.pretty);
            }
            emit_human(decoded_layout(&state));
            Ok(())
        }
    }
}

fn decoded_layout(state: &BrowseState) -> HumanLayout {
    let mut layout = HumanLayout::new();
    if state.filters.is_empty() {
        layout.push_line(style("no filters").dim().to_string());
    }
    for (key, value) in state.filters.iter() {
        layout.kv(key.param(), value);
    }
    layout.kv("page", &state.page.to_string());
    layout
}
