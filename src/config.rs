//! Configuration loading from TOML files.
//!
//! Values outside documented bounds are handled here and in
//! [`RefreshPlan::new`], at configuration time - never at use time. The
//! display host owns the file; this crate only parses and validates it.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::{Symbol, SymbolKind};
use crate::error::{ConfigError, Error, Result};
use crate::feed::{default_fetch_concurrency, FeedOptions};
use crate::refresh::RefreshPlan;
use crate::render::RenderOptions;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub stocks: SymbolListConfig,
    #[serde(default)]
    pub crypto: SymbolListConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub display: RenderOptions,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// One watch list of tickers, toggleable as a block.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolListConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub symbols: Vec<String>,
}

impl Default for SymbolListConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            symbols: Vec::new(),
        }
    }
}

/// Refresh scheduling knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// How often the background worker runs a refresh cycle.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Wall-time bound on a single fetch attempt.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Additional attempts after a failed fetch.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Scheduling priority passed through to the host's arbiter.
    #[serde(default)]
    pub priority: u8,
    /// Maximum age at which cached data still shows as current.
    #[serde(default = "default_staleness_threshold_secs")]
    pub staleness_threshold_secs: u64,
    /// Cap on concurrent fetches across symbols.
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            priority: 0,
            staleness_threshold_secs: default_staleness_threshold_secs(),
            fetch_concurrency: default_fetch_concurrency(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    600
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_staleness_threshold_secs() -> u64 {
    900
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::Config(ConfigError::ReadFile(e)))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| Error::Config(ConfigError::Parse(e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.refresh.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "refresh.timeout_secs",
                reason: "timeout must be greater than zero".into(),
            }
            .into());
        }
        if self.refresh.staleness_threshold_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "refresh.staleness_threshold_secs",
                reason: "staleness threshold must be greater than zero".into(),
            }
            .into());
        }

        // Surfaces invalid tickers now rather than at plan time.
        self.watched_symbols()?;

        Ok(())
    }

    /// All enabled symbols, stocks first, crypto normalized.
    ///
    /// Crypto tickers may carry the quote-currency suffix some data
    /// backends expect (`BTC-USD`); the display symbol drops it.
    pub fn watched_symbols(&self) -> Result<Vec<Symbol>> {
        let mut symbols = Vec::new();

        if self.stocks.enabled {
            for ticker in &self.stocks.symbols {
                let symbol = Symbol::try_new(ticker, SymbolKind::Stock).map_err(|e| {
                    ConfigError::InvalidValue {
                        field: "stocks.symbols",
                        reason: e.to_string(),
                    }
                })?;
                symbols.push(symbol);
            }
        }

        if self.crypto.enabled {
            for ticker in &self.crypto.symbols {
                let normalized = ticker.trim().to_uppercase();
                let bare = normalized.strip_suffix("-USD").unwrap_or(&normalized);
                let symbol = Symbol::try_new(bare, SymbolKind::Crypto).map_err(|e| {
                    ConfigError::InvalidValue {
                        field: "crypto.symbols",
                        reason: e.to_string(),
                    }
                })?;
                symbols.push(symbol);
            }
        }

        Ok(symbols)
    }

    /// Build the refresh plan this configuration describes.
    pub fn refresh_plan(&self) -> Result<RefreshPlan> {
        Ok(RefreshPlan::new(
            self.watched_symbols()?,
            Duration::from_secs(self.refresh.interval_secs),
            Duration::from_secs(self.refresh.timeout_secs),
            self.refresh.max_retries,
            self.refresh.priority,
        )?)
    }

    /// Cache and worker settings outside the plan.
    #[must_use]
    pub fn feed_options(&self) -> FeedOptions {
        FeedOptions {
            staleness_threshold: Duration::from_secs(self.refresh.staleness_threshold_secs),
            fetch_concurrency: self.refresh.fetch_concurrency,
            ..FeedOptions::default()
        }
    }

    /// Display toggles for the render collaborator.
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        self.display
    }
}
