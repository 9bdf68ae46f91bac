//! Thread-safe quote cache with staleness classification.
//!
//! Reads never touch the network: [`QuoteCache::get`] holds the lock only
//! long enough to clone one entry and classifies it against the staleness
//! threshold. The background refresh worker is the only writer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::warn;

use crate::clock::Clock;
use crate::domain::{Quote, QuoteState, Symbol};

/// Notification sent when a symbol's quote is replaced.
///
/// The display loop uses this to invalidate its rendered scroll image.
#[derive(Debug, Clone)]
pub struct QuoteUpdate {
    /// The symbol that was updated.
    pub symbol: Symbol,
}

/// Thread-safe cache of the latest quote per symbol.
pub struct QuoteCache {
    entries: RwLock<HashMap<Symbol, Quote>>,
    staleness_threshold: Duration,
    clock: Arc<dyn Clock>,
    /// Broadcast sender for update notifications.
    /// Wrapped in Option to allow construction without notifications.
    tx: Option<broadcast::Sender<QuoteUpdate>>,
}

impl QuoteCache {
    /// Create a new cache without notifications.
    #[must_use]
    pub fn new(staleness_threshold: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            staleness_threshold,
            clock,
            tx: None,
        }
    }

    /// Create a new cache with broadcast notifications.
    ///
    /// Returns the cache and a receiver for subscribing to updates.
    /// Additional receivers can be created via `subscribe()`.
    #[must_use]
    pub fn with_notifications(
        staleness_threshold: Duration,
        clock: Arc<dyn Clock>,
        capacity: usize,
    ) -> (Self, broadcast::Receiver<QuoteUpdate>) {
        let (tx, rx) = broadcast::channel(capacity);
        let cache = Self {
            entries: RwLock::new(HashMap::new()),
            staleness_threshold,
            clock,
            tx: Some(tx),
        };
        (cache, rx)
    }

    /// Subscribe to quote update notifications.
    ///
    /// Returns `None` if the cache was created without notifications.
    #[must_use]
    pub fn subscribe(&self) -> Option<broadcast::Receiver<QuoteUpdate>> {
        self.tx.as_ref().map(|tx| tx.subscribe())
    }

    /// Get the configured staleness threshold.
    #[must_use]
    pub const fn staleness_threshold(&self) -> Duration {
        self.staleness_threshold
    }

    /// Commit a freshly fetched quote, replacing the previous entry.
    ///
    /// Enforces the per-symbol invariant that `fetched_at` never moves
    /// backwards: a quote older than the stored entry is rejected and the
    /// entry left untouched. Returns whether the quote was accepted.
    pub fn commit(&self, quote: Quote) -> bool {
        let symbol = quote.symbol().clone();

        {
            let mut entries = self.entries.write();
            if let Some(existing) = entries.get(&symbol) {
                if quote.fetched_at() < existing.fetched_at() {
                    warn!(
                        %symbol,
                        incoming = %quote.fetched_at(),
                        stored = %existing.fetched_at(),
                        "Rejecting quote older than cached entry"
                    );
                    return false;
                }
            }
            entries.insert(symbol.clone(), quote);
        }

        // Notify subscribers (ignore send errors - no receivers is fine)
        if let Some(ref tx) = self.tx {
            let _ = tx.send(QuoteUpdate { symbol });
        }
        true
    }

    /// Get the cached quote for a symbol, classified by age.
    ///
    /// Never blocks on I/O. A symbol that was never fetched is `Unknown`;
    /// one whose quote has outlived the staleness threshold is `Stale` but
    /// still carries the last known quote.
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> QuoteState {
        let quote = match self.entries.read().get(symbol) {
            Some(quote) => quote.clone(),
            None => return QuoteState::Unknown,
        };

        // An entry stamped ahead of the clock has zero age, hence Fresh.
        let age = (self.clock.now() - quote.fetched_at())
            .to_std()
            .unwrap_or_default();

        if age <= self.staleness_threshold {
            QuoteState::Fresh { quote, age }
        } else {
            QuoteState::Stale { quote, age }
        }
    }

    /// Get a snapshot of every cached quote.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Quote> {
        self.entries.read().values().cloned().collect()
    }

    /// Number of symbols with a cached quote.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
