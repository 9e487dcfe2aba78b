use std::path::Path;

use tracing::debug;

use crate::catalog::LocalCatalog;
use crate::cli::Cli;
use crate::cli::output::OutputFormat;
use crate::config::Config;
use crate::error::Result;

/// Everything a command needs: resolved config and how to print.
#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
    pub output_format: OutputFormat,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        debug!(
            page_size = config.results.page_size,
            fallback = config.fallback.enabled,
            "configuration loaded"
        );
        Ok(Self {
            config,
            output_format: cli.output_format(),
            verbosity: cli.verbose,
        })
    }

    #[must_use]
    pub const fn robot(&self) -> bool {
        matches!(self.output_format, OutputFormat::Robot)
    }

    /// The catalog at `path`, or the bundled sample when none is given.
    pub fn catalog(&self, path: Option<&Path>) -> Result<LocalCatalog> {
        let catalog = match path {
            Some(path) => LocalCatalog::load(path)?,
            None => LocalCatalog::bundled()?,
        };
        debug!(listings = catalog.len(), "catalog ready");
        Ok(catalog)
    }
}
