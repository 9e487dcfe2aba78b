use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BrowseError, Result};
use crate::search::pagination::DEFAULT_MAX_VISIBLE;
use crate::search::results::DEFAULT_PAGE_SIZE;
use crate::suggestions::SuggestionConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub suggestions: SuggestionsConfig,
    #[serde(default)]
    pub results: ResultsConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub robot: RobotConfig,
}

impl Config {
    /// Defaults, then the global file (or the explicit one instead), then
    /// `SKB_*` environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("SKB_CONFIG").ok().map(PathBuf::from));

        let patch = match explicit {
            Some(path) => Self::load_patch(&path)?,
            None => match global_config_path() {
                Some(path) => Self::load_patch(&path)?,
                None => None,
            },
        };
        if let Some(patch) = patch {
            config.merge_patch(patch);
        }

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse a full or partial config document on top of the defaults.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let patch: ConfigPatch =
            toml::from_str(raw).map_err(|err| BrowseError::Config(format!("parse config: {err}")))?;
        let mut config = Self::default();
        config.merge_patch(patch);
        config.sanitize();
        Ok(config)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| BrowseError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| BrowseError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.suggestions {
            self.suggestions.merge(patch);
        }
        if let Some(patch) = patch.results {
            self.results.merge(patch);
        }
        if let Some(patch) = patch.fallback {
            self.fallback.merge(patch);
        }
        if let Some(patch) = patch.robot {
            self.robot.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `SKB_*` overrides read through `lookup`, then re-sanitise.
    /// Values that do not parse are a config error.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvSource(lookup);

        if let Some(value) = env.parse::<usize>("SKB_SUGGEST_MIN_QUERY_LEN")? {
            self.suggestions.min_query_len = value;
        }
        if let Some(value) = env.parse::<u64>("SKB_SUGGEST_DEBOUNCE_MS")? {
            self.suggestions.debounce_ms = value;
        }
        if let Some(value) = env.parse::<usize>("SKB_SUGGEST_MAX_RESULTS")? {
            self.suggestions.max_results = value;
        }

        if let Some(value) = env.parse::<u32>("SKB_PAGE_SIZE")? {
            self.results.page_size = value;
        }
        if let Some(value) = env.parse::<u32>("SKB_MAX_VISIBLE_PAGES")? {
            self.results.max_visible_pages = value;
        }

        if let Some(value) = env.flag("SKB_FALLBACK_ENABLED")? {
            self.fallback.enabled = value;
        }
        if let Some(value) = env.parse::<usize>("SKB_FALLBACK_SAMPLE_SIZE")? {
            self.fallback.sample_size = value;
        }

        if let Some(value) = env.flag("SKB_ROBOT_PRETTY")? {
            self.robot.pretty = value;
        }

        self.sanitize();
        Ok(())
    }

    fn sanitize(&mut self) {
        self.results.page_size = self.results.page_size.max(1);
        self.results.max_visible_pages = self.results.max_visible_pages.max(3);
        self.suggestions.max_results = self.suggestions.max_results.max(1);
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("skill-browse/config.toml"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionsConfig {
    pub min_query_len: usize,
    pub debounce_ms: u64,
    pub max_results: usize,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            debounce_ms: 300,
            max_results: 8,
        }
    }
}

impl SuggestionsConfig {
    fn merge(&mut self, patch: SuggestionsPatch) {
        if let Some(value) = patch.min_query_len {
            self.min_query_len = value;
        }
        if let Some(value) = patch.debounce_ms {
            self.debounce_ms = value;
        }
        if let Some(value) = patch.max_results {
            self.max_results = value;
        }
    }

    #[must_use]
    pub const fn to_engine_config(&self) -> SuggestionConfig {
        SuggestionConfig {
            min_query_len: self.min_query_len,
            debounce: Duration::from_millis(self.debounce_ms),
            max_results: self.max_results,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    pub page_size: u32,
    pub max_visible_pages: u32,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_visible_pages: DEFAULT_MAX_VISIBLE,
        }
    }
}

impl ResultsConfig {
    fn merge(&mut self, patch: ResultsPatch) {
        if let Some(value) = patch.page_size {
            self.page_size = value;
        }
        if let Some(value) = patch.max_visible_pages {
            self.max_visible_pages = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub enabled: bool,
    pub sample_size: usize,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sample_size: 50,
        }
    }
}

impl FallbackConfig {
    fn merge(&mut self, patch: FallbackPatch) {
        if let Some(value) = patch.enabled {
            self.enabled = value;
        }
        if let Some(value) = patch.sample_size {
            self.sample_size = value;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub pretty: bool,
}

impl RobotConfig {
    fn merge(&mut self, patch: RobotPatch) {
        if let Some(value) = patch.pretty {
            self.pretty = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub suggestions: Option<SuggestionsPatch>,
    pub results: Option<ResultsPatch>,
    pub fallback: Option<FallbackPatch>,
    pub robot: Option<RobotPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SuggestionsPatch {
    pub min_query_len: Option<usize>,
    pub debounce_ms: Option<u64>,
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ResultsPatch {
    pub page_size: Option<u32>,
    pub max_visible_pages: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FallbackPatch {
    pub enabled: Option<bool>,
    pub sample_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RobotPatch {
    pub pretty: Option<bool>,
}

struct EnvSource<F>(F);

impl<F: Fn(&str) -> Option<String>> EnvSource<F> {
    fn flag(&self, key: &str) -> Result<Option<bool>> {
        match (self.0)(key) {
            Some(value) => parse_bool(&value).map(Some).ok_or_else(|| {
                BrowseError::Config(format!("invalid {key} value {value}: expected true or false"))
            }),
            None => Ok(None),
        }
    }

    fn parse<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match (self.0)(key) {
            Some(value) => value.trim().parse::<T>().map(Some).map_err(|err| {
                BrowseError::Config(format!("invalid {key} value {value}: {err}"))
            }),
            None => Ok(None),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
