//! Refresh observability counters.
//!
//! Purely observational: nothing here feeds back into scheduling. The host's
//! status page polls [`RefreshStats::snapshot`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::domain::Symbol;
use crate::error::FetchError;

/// The last recorded fetch failure for a symbol.
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    /// When the retry budget was exhausted.
    pub at: DateTime<Utc>,
    /// Rendered error message of the final attempt.
    pub error: String,
}

/// Counters accumulated by the refresh worker.
#[derive(Debug, Default)]
pub struct RefreshStats {
    cycles: AtomicU64,
    fetches_ok: AtomicU64,
    fetches_failed: AtomicU64,
    timeouts: AtomicU64,
    retries: AtomicU64,
    last_failures: RwLock<HashMap<Symbol, FailureRecord>>,
}

impl RefreshStats {
    /// Create zeroed stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_cycle(&self) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a committed fetch and clear the symbol's failure record.
    pub(crate) fn record_success(&self, symbol: &Symbol) {
        self.fetches_ok.fetch_add(1, Ordering::Relaxed);
        self.last_failures.write().remove(symbol);
    }

    /// Record a fetch that exhausted its retry budget.
    pub(crate) fn record_failure(&self, symbol: &Symbol, error: &FetchError, at: DateTime<Utc>) {
        self.fetches_failed.fetch_add(1, Ordering::Relaxed);
        self.last_failures.write().insert(
            symbol.clone(),
            FailureRecord {
                at,
                error: error.to_string(),
            },
        );
    }

    /// Take a point-in-time copy of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            fetches_ok: self.fetches_ok.load(Ordering::Relaxed),
            fetches_failed: self.fetches_failed.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            last_failures: self
                .last_failures
                .read()
                .iter()
                .map(|(symbol, record)| (symbol.to_string(), record.clone()))
                .collect(),
        }
    }
}

/// Point-in-time copy of the refresh counters.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub cycles: u64,
    pub fetches_ok: u64,
    pub fetches_failed: u64,
    pub timeouts: u64,
    pub retries: u64,
    /// Last failure per symbol, keyed by ticker.
    pub last_failures: HashMap<String, FailureRecord>,
}

impl StatsSnapshot {
    /// Render the snapshot as pretty JSON for a status endpoint.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
