//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::matching::{DEFAULT_AUTHOR_THRESHOLD, DEFAULT_TITLE_THRESHOLD};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Base delay between requests in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Random jitter added to delay (0 to this value)
    #[serde(default = "default_delay_jitter_ms")]
    pub delay_jitter_ms: u64,

    /// Single bounded wait for each request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Lowest accepted listing price (inclusive)
    #[serde(default)]
    pub min_price: f64,

    /// Highest accepted listing price (inclusive), also sent to the search
    #[serde(default = "default_max_price")]
    pub max_price: f64,

    /// Minimum title similarity ratio
    #[serde(default = "default_title_threshold")]
    pub title_threshold: f64,

    /// Minimum author similarity ratio
    #[serde(default = "default_author_threshold")]
    pub author_threshold: f64,

    /// Number of shelf books searched at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Upper bound on shelf pages fetched
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Where the shelf is saved and read back from
    #[serde(default = "default_books_csv")]
    pub books_csv: PathBuf,

    /// Where matching listings are appended
    #[serde(default = "default_results_csv")]
    pub results_csv: PathBuf,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_delay_ms() -> u64 {
    1500
}

fn default_delay_jitter_ms() -> u64 {
    50
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_max_price() -> f64 {
    20.0
}

fn default_title_threshold() -> f64 {
    DEFAULT_TITLE_THRESHOLD
}

fn default_author_threshold() -> f64 {
    DEFAULT_AUTHOR_THRESHOLD
}

fn default_concurrency() -> usize {
    10
}

fn default_max_pages() -> u32 {
    100
}

fn default_books_csv() -> PathBuf {
    PathBuf::from("output_data/books.csv")
}

fn default_results_csv() -> PathBuf {
    PathBuf::from("output_data/skupszop_prices.csv")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proxy: None,
            delay_ms: default_delay_ms(),
            delay_jitter_ms: default_delay_jitter_ms(),
            timeout_secs: default_timeout_secs(),
            min_price: 0.0,
            max_price: default_max_price(),
            title_threshold: default_title_threshold(),
            author_threshold: default_author_threshold(),
            concurrency: default_concurrency(),
            max_pages: default_max_pages(),
            books_csv: default_books_csv(),
            results_csv: default_results_csv(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("shelf-hunter").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(proxy) = std::env::var("SHELF_HUNTER_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(delay) = std::env::var("SHELF_HUNTER_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        if let Ok(max_price) = std::env::var("SHELF_HUNTER_MAX_PRICE") {
            if let Ok(p) = max_price.parse() {
                self.max_price = p;
            }
        }

        if let Ok(concurrency) = std::env::var("SHELF_HUNTER_CONCURRENCY") {
            if let Ok(c) = concurrency.parse() {
                self.concurrency = c;
            }
        }

        self
    }

    /// Checks settings that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.min_price > self.max_price {
            anyhow::bail!(
                "Minimum price {:.2} is above maximum price {:.2}",
                self.min_price,
                self.max_price
            );
        }
        for (name, value) in
            [("title_threshold", self.title_threshold), ("author_threshold", self.author_threshold)]
        {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("{} must be between 0 and 1, got {}", name, value);
            }
        }
        if self.concurrency == 0 {
            anyhow::bail!("concurrency must be at least 1");
        }
        Ok(())
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
