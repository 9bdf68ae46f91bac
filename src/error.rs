use std::time::Duration;

use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors produced while fetching quotes from a data source.
///
/// These are recovered locally by the refresh loop (retried, then tolerated);
/// consumers of the cache only ever observe `Fresh | Stale | Unknown`.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    #[error("fetch timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("partial result: {failed} of {requested} symbols failed")]
    Partial { requested: usize, failed: usize },

    #[error("source returned no data for {symbol}")]
    NoData { symbol: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
