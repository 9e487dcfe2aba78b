//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Args;
use clap::Subcommand;

pub mod pages;
pub mod search;
pub mod suggest;
pub mod url;

use crate::app::AppContext;
use crate::error::Result;
use crate::search::{FilterKey, FilterSet};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a browse session against a catalog
    Search(search::SearchArgs),

    /// Encode or decode a browse address
    Url(url::UrlArgs),

    /// Compute the pagination window
    Pages(pages::PagesArgs),

    /// Autocomplete suggestions for partial input
    Suggest(suggest::SuggestArgs),
}

/// Dispatch a command to its handler
pub async fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Search(args) => search::run(ctx, args).await,
        Commands::Url(args) => url::run(ctx, args),
        Commands::Pages(args) => pages::run(ctx, args),
        Commands::Suggest(args) => suggest::run(ctx, args).await,
    }
}

/// Filter flags shared by `search` and `url encode`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Free-text query
    #[arg(long)]
    pub q: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Skill level (beginner, intermediate, advanced)
    #[arg(long)]
    pub level: Option<String>,

    /// Availability (online, in-person, both)
    #[arg(long = "type")]
    pub availability: Option<String>,

    #[arg(long)]
    pub location: Option<String>,
}

impl FilterArgs {
    #[must_use]
    pub fn to_filters(&self) -> FilterSet {
        [
            (FilterKey::Search, &self.q),
            (FilterKey::Category, &self.category),
            (FilterKey::SkillLevel, &self.level),
            (FilterKey::AvailabilityType, &self.availability),
            (FilterKey::Location, &self.location),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|value| (key, value)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_args_skip_unset_and_blank() {
        let args = FilterArgs {
            q: Some("guitar".into()),
            location: Some(" ".into()),
            ..FilterArgs::default()
        };
        let filters = args.to_filters();
        assert_eq!(filters.active_count(), 1);
        assert_eq!(filters.get(FilterKey::Search), Some("guitar"));
    }
}
