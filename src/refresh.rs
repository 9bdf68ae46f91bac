//! Refresh plans and the background refresh worker.
//!
//! The worker ticks every plan interval and fans one bounded fetch task out
//! per configured symbol. Two invariants hold throughout:
//!
//! - at most one fetch is in flight per symbol, across cycles
//! - a failed fetch never disturbs the cached entry for its symbol

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::cache::QuoteCache;
use crate::clock::Clock;
use crate::domain::Symbol;
use crate::error::{ConfigError, FetchError};
use crate::source::QuoteSource;
use crate::stats::RefreshStats;

/// Shortest accepted refresh interval; anything lower is clamped.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Largest accepted retry budget; anything higher is clamped.
pub const MAX_RETRIES: u32 = 10;

/// The active refresh plan: which symbols to keep current, and how hard
/// to try.
///
/// Created at configuration time and replaced wholesale by
/// `QuoteFeed::configure`; the worker picks up a replacement at its next
/// scheduling tick.
#[derive(Debug, Clone)]
pub struct RefreshPlan {
    symbols: Vec<Symbol>,
    interval: Duration,
    timeout: Duration,
    max_retries: u32,
    priority: u8,
    revision: u64,
}

impl RefreshPlan {
    /// Create a validated refresh plan.
    ///
    /// Out-of-range values are handled at configuration time, never at use
    /// time: an interval below [`MIN_INTERVAL`] and a retry budget above
    /// [`MAX_RETRIES`] are clamped with a warning; a zero timeout is
    /// rejected. Duplicate symbols are dropped, keeping first occurrence
    /// order.
    pub fn new(
        symbols: Vec<Symbol>,
        interval: Duration,
        timeout: Duration,
        max_retries: u32,
        priority: u8,
    ) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "timeout",
                reason: "timeout must be greater than zero".into(),
            });
        }

        let interval = if interval < MIN_INTERVAL {
            warn!(
                requested_ms = interval.as_millis() as u64,
                clamped_secs = MIN_INTERVAL.as_secs(),
                "Refresh interval below minimum, clamping"
            );
            MIN_INTERVAL
        } else {
            interval
        };

        let max_retries = if max_retries > MAX_RETRIES {
            warn!(
                requested = max_retries,
                clamped = MAX_RETRIES,
                "Retry budget above maximum, clamping"
            );
            MAX_RETRIES
        } else {
            max_retries
        };

        let mut seen = HashSet::new();
        let symbols: Vec<Symbol> = symbols
            .into_iter()
            .filter(|s| seen.insert(s.clone()))
            .collect();

        Ok(Self {
            symbols,
            interval,
            timeout,
            max_retries,
            priority,
            revision: 0,
        })
    }

    /// Symbols covered by this plan.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// How often a refresh cycle runs.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Wall-time bound on a single fetch attempt.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Additional attempts after a failed fetch.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Scheduling priority, passed through to a host-side arbiter.
    ///
    /// The worker applies no priority logic of its own.
    #[must_use]
    pub const fn priority(&self) -> u8 {
        self.priority
    }

    /// Monotonically increasing identifier of the installed plan.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn at_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }
}

/// The background refresh task.
///
/// Owned by the feed; runs until the shutdown flag flips, then drains its
/// in-flight fetches so no commit is ever abandoned partway.
pub(crate) struct RefreshWorker {
    cache: Arc<QuoteCache>,
    source: Arc<dyn QuoteSource>,
    clock: Arc<dyn Clock>,
    stats: Arc<RefreshStats>,
    plan_rx: watch::Receiver<RefreshPlan>,
    shutdown_rx: watch::Receiver<bool>,
    in_flight: Arc<Mutex<HashSet<Symbol>>>,
    limiter: Arc<Semaphore>,
}

impl RefreshWorker {
    pub(crate) fn new(
        cache: Arc<QuoteCache>,
        source: Arc<dyn QuoteSource>,
        clock: Arc<dyn Clock>,
        stats: Arc<RefreshStats>,
        plan_rx: watch::Receiver<RefreshPlan>,
        shutdown_rx: watch::Receiver<bool>,
        fetch_concurrency: usize,
    ) -> Self {
        Self {
            cache,
            source,
            clock,
            stats,
            plan_rx,
            shutdown_rx,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            limiter: Arc::new(Semaphore::new(fetch_concurrency.max(1))),
        }
    }

    pub(crate) async fn run(mut self) {
        debug!(source = self.source.source_name(), "Refresh worker started");

        let mut tasks: JoinSet<()> = JoinSet::new();
        loop {
            let interval = self.plan_rx.borrow().interval();

            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    // Reap finished fetches so the set doesn't grow unbounded.
                    while tasks.try_join_next().is_some() {}
                    self.run_cycle(&mut tasks);
                }
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        debug!(pending = tasks.len(), "Refresh worker draining in-flight fetches");
        while tasks.join_next().await.is_some() {}
        debug!("Refresh worker stopped");
    }

    /// Spawn one fetch per planned symbol that isn't already mid-fetch.
    fn run_cycle(&self, tasks: &mut JoinSet<()>) {
        let plan = self.plan_rx.borrow().clone();
        self.stats.record_cycle();

        debug!(
            revision = plan.revision(),
            priority = plan.priority(),
            symbols = plan.symbols().len(),
            "Refresh cycle"
        );

        for symbol in plan.symbols().iter().cloned() {
            if !self.in_flight.lock().insert(symbol.clone()) {
                debug!(%symbol, "Fetch still in flight, skipping");
                continue;
            }

            let task = FetchTask {
                cache: self.cache.clone(),
                source: self.source.clone(),
                clock: self.clock.clone(),
                stats: self.stats.clone(),
                shutdown_rx: self.shutdown_rx.clone(),
                timeout: plan.timeout(),
                max_retries: plan.max_retries(),
            };
            let limiter = self.limiter.clone();
            let in_flight = self.in_flight.clone();

            tasks.spawn(async move {
                if let Ok(_permit) = limiter.acquire_owned().await {
                    task.run(&symbol).await;
                }
                in_flight.lock().remove(&symbol);
            });
        }
    }
}

/// One symbol's bounded fetch: timeout per attempt, retry budget across
/// attempts, commit on success.
struct FetchTask {
    cache: Arc<QuoteCache>,
    source: Arc<dyn QuoteSource>,
    clock: Arc<dyn Clock>,
    stats: Arc<RefreshStats>,
    shutdown_rx: watch::Receiver<bool>,
    timeout: Duration,
    max_retries: u32,
}

impl FetchTask {
    async fn run(self, symbol: &Symbol) {
        let mut attempt: u32 = 0;

        // Backoff between attempts is the source's concern; this loop only
        // bounds attempts and wall time.
        loop {
            attempt += 1;

            let fetch = self.source.fetch(std::slice::from_ref(symbol));
            let error = match tokio::time::timeout(self.timeout, fetch).await {
                Err(_) => {
                    self.stats.record_timeout();
                    FetchError::Timeout {
                        elapsed: self.timeout,
                    }
                }
                Ok(Err(error)) => error,
                Ok(Ok(mut outcome)) => match outcome.take_quote(symbol) {
                    Some(quote) => {
                        if self.cache.commit(quote) {
                            self.stats.record_success(symbol);
                        }
                        return;
                    }
                    None => outcome
                        .failure_for(symbol)
                        .cloned()
                        .unwrap_or_else(|| FetchError::NoData {
                            symbol: symbol.to_string(),
                        }),
                },
            };

            if attempt > self.max_retries {
                warn!(%symbol, error = %error, attempts = attempt, "Fetch failed, keeping cached entry");
                self.stats.record_failure(symbol, &error, self.clock.now());
                return;
            }

            if *self.shutdown_rx.borrow() {
                debug!(%symbol, "Shutdown requested, abandoning retries");
                return;
            }

            self.stats.record_retry();
            debug!(%symbol, error = %error, attempt, "Fetch attempt failed, retrying");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(tickers: &[&str]) -> Vec<Symbol> {
        tickers.iter().map(|t| Symbol::stock(*t)).collect()
    }

    #[test]
    fn plan_clamps_sub_second_interval() {
        let plan = RefreshPlan::new(
            symbols(&["AAPL"]),
            Duration::from_millis(100),
            Duration::from_secs(10),
            3,
            0,
        )
        .unwrap();
        assert_eq!(plan.interval(), MIN_INTERVAL);
    }

    #[test]
    fn plan_clamps_oversized_retry_budget() {
        let plan = RefreshPlan::new(
            symbols(&["AAPL"]),
            Duration::from_secs(60),
            Duration::from_secs(10),
            99,
            0,
        )
        .unwrap();
        assert_eq!(plan.max_retries(), MAX_RETRIES);
    }

    #[test]
    fn plan_rejects_zero_timeout() {
        let result = RefreshPlan::new(
            symbols(&["AAPL"]),
            Duration::from_secs(60),
            Duration::ZERO,
            3,
            0,
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "timeout", .. })
        ));
    }

    #[test]
    fn plan_deduplicates_symbols_keeping_order() {
        let plan = RefreshPlan::new(
            symbols(&["NVDA", "AAPL", "NVDA", "T"]),
            Duration::from_secs(60),
            Duration::from_secs(10),
            3,
            0,
        )
        .unwrap();
        assert_eq!(plan.symbols(), symbols(&["NVDA", "AAPL", "T"]).as_slice());
    }

    #[test]
    fn plan_keeps_same_ticker_across_kinds() {
        let stock = Symbol::stock("BTC");
        let crypto = Symbol::crypto("BTC");
        let plan = RefreshPlan::new(
            vec![stock.clone(), crypto.clone()],
            Duration::from_secs(60),
            Duration::from_secs(10),
            3,
            0,
        )
        .unwrap();
        assert_eq!(plan.symbols(), &[stock, crypto]);
    }
}
