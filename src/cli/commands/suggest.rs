//! skb suggest - Autocomplete suggestions for partial input

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::Result;
use crate::suggestions::SuggestionEngine;

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Partially typed search text
    pub text: String,

    /// JSON catalog file (defaults to the bundled sample)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

pub async fn run(ctx: &AppContext, args: &SuggestArgs) -> Result<()> {
    let catalog = ctx.catalog(args.catalog.as_deref())?;
    let mut engine = SuggestionEngine::new(ctx.config.suggestions.to_engine_config());

    // One keystroke, then wait out the debounce window.
    engine.on_input(args.text.as_str(), Instant::now());
    if let Some(deadline) = engine.next_deadline() {
        tokio::time::sleep_until(deadline.into()).await;
        if let Some(request) = engine.poll(deadline) {
            let response = SuggestionEngine::lookup(&catalog, request).await;
            engine.apply(response);
        }
    }

    if ctx.robot() {
        return emit_robot(
            &robot_ok(serde_json::json!({
                "query": engine.text(),
                "suggestions": engine.suggestions(),
            })),
            ctx.config.robot.pretty,
        );
    }

    let mut layout = HumanLayout::new();
    if engine.suggestions().is_empty() {
        layout.push_line(style("no suggestions").dim().to_string());
    }
    for suggestion in engine.suggestions() {
        let line = match &suggestion.secondary_text {
            Some(secondary) => format!(
                "{} {} {}",
                suggestion.label,
                style(format!("[{}]", suggestion.kind)).cyan(),
                style(secondary).dim()
            ),
            None => format!("{} {}", suggestion.label, style(format!("[{}]", suggestion.kind)).cyan()),
        };
        layout.bullet(&line);
    }
    emit_human(layout);
    Ok(())
}
