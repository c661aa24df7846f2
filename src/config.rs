use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use lazy_pager::Indicators;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    List,
    Grid,
}

/// Simulated backend: fixed-size pages, a page count, and the attempts that fail.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub initial_page: u32,
    pub page_size: usize,
    pub total_pages: u32,
    pub latency_ms: u64,
    /// 1-based fetch attempts that fail, counted across all pages.
    pub fail_on_attempts: Vec<u32>,
    /// First attempt succeeds without latency.
    pub fast: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            initial_page: 1,
            page_size: 10,
            total_pages: 3,
            latency_ms: 1200,
            fail_on_attempts: vec![1, 3],
            fast: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub layout: LayoutKind,
    pub columns: u16,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            layout: LayoutKind::List,
            columns: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub first_page_progress: Option<String>,
    pub first_page_error: Option<String>,
    pub new_page_progress: Option<String>,
    pub new_page_error: Option<String>,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            first_page_progress: Some("Loading first page...".to_string()),
            first_page_error: Some("First page failed".to_string()),
            new_page_progress: Some("Loading more...".to_string()),
            new_page_error: Some("Page failed".to_string()),
        }
    }
}

impl From<IndicatorConfig> for Indicators<String> {
    fn from(config: IndicatorConfig) -> Self {
        Indicators {
            first_page_progress: config.first_page_progress,
            first_page_error: config.first_page_error,
            new_page_progress: config.new_page_progress,
            new_page_error: config.new_page_error,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub indicators: IndicatorConfig,
}

/// Command line overrides; anything left out comes from the config file.
#[derive(Debug, Default, Parser)]
#[command(name = "lazy-pager", version, about = "Scroll through a lazily paged list")]
pub struct Args {
    /// Config file (default: <config dir>/lazy-pager/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Page to start from
    #[arg(long)]
    pub initial_page: Option<u32>,

    #[arg(long, value_enum)]
    pub layout: Option<LayoutKind>,

    /// Columns in grid layout
    #[arg(long)]
    pub columns: Option<u16>,

    /// Load the first page instantly and without failure
    #[arg(long)]
    pub fast: bool,
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("lazy-pager").join("config.toml"))
}

impl Config {
    /// Default location; a missing or broken file means defaults.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match toml::from_str::<Config>(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring invalid config");
                Config::default()
            }
        }
    }

    /// An explicitly named file must exist and parse.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Config::from_path(path)?,
            None => Config::load(),
        };
        config.apply(args);
        Ok(config)
    }

    pub fn apply(&mut self, args: &Args) {
        if let Some(page) = args.initial_page {
            self.source.initial_page = page;
        }
        if let Some(layout) = args.layout {
            self.view.layout = layout;
        }
        if let Some(columns) = args.columns {
            self.view.columns = columns;
        }
        if args.fast {
            self.source.fast = true;
        }
        self.view.columns = self.view.columns.max(1);
    }
}
