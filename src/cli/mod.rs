//! Command-line interface for `skb`.

use std::path::PathBuf;

use clap::Parser;

pub mod commands;
pub mod output;

pub use commands::Commands;

#[derive(Parser, Debug)]
#[command(
    name = "skb",
    version,
    about = "Browse a skill catalog: filters, suggestions, pagination and shareable addresses"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit JSON envelopes on stdout and JSON logs on stderr
    #[arg(long, global = true)]
    pub robot: bool,

    /// Config file to use instead of the global one
    #[arg(long, global = true, env = "SKB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging entirely
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    #[must_use]
    pub const fn output_format(&self) -> output::OutputFormat {
        if self.robot {
            output::OutputFormat::Robot
        } else {
            output::OutputFormat::Human
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["skb", "pages", "--current", "2", "--total", "9", "--robot", "-vv"])
            .expect("parse");
        assert!(cli.robot);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Pages(_)));
    }
}
