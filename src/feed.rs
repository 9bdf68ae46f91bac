//! The owned quote feed facade.
//!
//! A [`QuoteFeed`] ties one cache, one stats block, and one background
//! refresh worker together. It is an explicit owned object handed to both
//! the display loop and the plugin lifecycle - there is no process-wide
//! singleton; dropping (or shutting down) the feed tears the worker down
//! with it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{QuoteCache, QuoteUpdate};
use crate::clock::Clock;
use crate::config::Config;
use crate::domain::{QuoteState, Symbol};
use crate::error::{ConfigError, FetchError};
use crate::refresh::{RefreshPlan, RefreshWorker};
use crate::source::QuoteSource;
use crate::stats::{RefreshStats, StatsSnapshot};

/// Extra wait beyond one fetch timeout before shutdown gives up.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Default cap on concurrent fetches across symbols.
#[must_use]
pub fn default_fetch_concurrency() -> usize {
    num_cpus::get().clamp(1, 4)
}

/// Cache and worker settings that live outside the refresh plan.
#[derive(Debug, Clone)]
pub struct FeedOptions {
    /// Maximum age at which cached data still classifies as `Fresh`.
    ///
    /// Independent of the refresh interval: the interval is how often we
    /// try, the threshold how old data is tolerable to show.
    pub staleness_threshold: Duration,
    /// Cap on concurrent fetches across symbols.
    pub fetch_concurrency: usize,
    /// Buffer size of the update notification channel.
    pub notification_capacity: usize,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            staleness_threshold: Duration::from_secs(900),
            fetch_concurrency: default_fetch_concurrency(),
            notification_capacity: 64,
        }
    }
}

/// How a feed shutdown concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// The worker confirmed it stopped; all in-flight fetches drained.
    Clean,
    /// The worker missed the deadline and was left to finish detached.
    /// Any still-running fetch commits atomically or not at all.
    TimedOut,
}

/// A quote cache with its background refresh worker.
pub struct QuoteFeed {
    cache: Arc<QuoteCache>,
    source: Arc<dyn QuoteSource>,
    stats: Arc<RefreshStats>,
    plan_tx: watch::Sender<RefreshPlan>,
    shutdown_tx: watch::Sender<bool>,
    updates: broadcast::Receiver<QuoteUpdate>,
    worker: JoinHandle<()>,
    next_revision: AtomicU64,
}

impl QuoteFeed {
    /// Spawn a feed with an explicit plan and options.
    #[must_use]
    pub fn spawn(
        plan: RefreshPlan,
        options: FeedOptions,
        source: Arc<dyn QuoteSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let plan = plan.at_revision(1);

        let (cache, updates) = QuoteCache::with_notifications(
            options.staleness_threshold,
            clock.clone(),
            options.notification_capacity,
        );
        let cache = Arc::new(cache);
        let stats = Arc::new(RefreshStats::new());

        let (plan_tx, plan_rx) = watch::channel(plan);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let worker = RefreshWorker::new(
            cache.clone(),
            source.clone(),
            clock,
            stats.clone(),
            plan_rx,
            shutdown_rx,
            options.fetch_concurrency,
        );

        info!(
            source = source.source_name(),
            symbols = plan_tx.borrow().symbols().len(),
            interval_secs = plan_tx.borrow().interval().as_secs(),
            "Quote feed started"
        );

        Self {
            cache,
            source,
            stats,
            plan_tx,
            shutdown_tx,
            updates,
            worker: tokio::spawn(worker.run()),
            next_revision: AtomicU64::new(2),
        }
    }

    /// Spawn a feed from a loaded configuration.
    pub fn from_config(
        config: &Config,
        source: Arc<dyn QuoteSource>,
        clock: Arc<dyn Clock>,
    ) -> crate::error::Result<Self> {
        Ok(Self::spawn(
            config.refresh_plan()?,
            config.feed_options(),
            source,
            clock,
        ))
    }

    /// Get the cached quote for a symbol, classified by age.
    ///
    /// Never waits on the network; absence of data is `Unknown`.
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> QuoteState {
        self.cache.get(symbol)
    }

    /// Get a copy of the active refresh plan.
    #[must_use]
    pub fn plan(&self) -> RefreshPlan {
        self.plan_tx.borrow().clone()
    }

    /// Replace the active refresh plan.
    ///
    /// Validation happens here, synchronously; the worker adopts the new
    /// plan at its next scheduling tick.
    pub fn configure(
        &self,
        symbols: Vec<Symbol>,
        interval: Duration,
        timeout: Duration,
        max_retries: u32,
        priority: u8,
    ) -> Result<(), ConfigError> {
        let revision = self.next_revision.fetch_add(1, Ordering::Relaxed);
        let plan =
            RefreshPlan::new(symbols, interval, timeout, max_retries, priority)?.at_revision(revision);

        info!(
            revision,
            symbols = plan.symbols().len(),
            interval_secs = plan.interval().as_secs(),
            "Installing refresh plan"
        );

        if self.plan_tx.send(plan).is_err() {
            warn!("Refresh worker is gone, plan not installed");
        }
        Ok(())
    }

    /// Populate the cache with one immediate batched fetch.
    ///
    /// Bounded by the plan timeout. Partial failures are tolerated: the
    /// succeeded symbols are committed and the rest stay `Unknown` until
    /// the worker gets to them. Returns the number of quotes committed.
    pub async fn prime(&self) -> Result<usize, FetchError> {
        let plan = self.plan();
        if plan.symbols().is_empty() {
            return Ok(0);
        }

        let fetch = self.source.fetch(plan.symbols());
        let outcome = match tokio::time::timeout(plan.timeout(), fetch).await {
            Err(_) => {
                return Err(FetchError::Timeout {
                    elapsed: plan.timeout(),
                })
            }
            Ok(Err(error)) => return Err(error),
            Ok(Ok(outcome)) => outcome,
        };

        let requested = plan.symbols().len();
        let (quotes, failures) = outcome.into_parts();

        let mut committed = 0usize;
        for quote in quotes {
            if self.cache.commit(quote) {
                committed += 1;
            }
        }

        if !failures.is_empty() {
            let error = FetchError::Partial {
                requested,
                failed: failures.len(),
            };
            warn!(%error, "Initial fetch returned partial results");
            for (symbol, cause) in &failures {
                debug!(%symbol, error = %cause, "Symbol missing from initial fetch");
            }
        }

        info!(committed, requested, "Cache primed");
        Ok(committed)
    }

    /// Subscribe to quote update notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<QuoteUpdate> {
        self.updates.resubscribe()
    }

    /// Take a point-in-time copy of the refresh counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Stop the background worker and wait for confirmation.
    ///
    /// The worker stops scheduling new fetches and drains what is in
    /// flight; the wait is bounded by one plan timeout plus a grace
    /// period. A timed-out worker is detached, never aborted, so an
    /// in-flight commit still lands atomically.
    pub async fn shutdown(self) -> ShutdownOutcome {
        let timeout = self.plan_tx.borrow().timeout();

        info!("Shutting down quote feed");
        let _ = self.shutdown_tx.send(true);

        match tokio::time::timeout(timeout + SHUTDOWN_GRACE, self.worker).await {
            Ok(_) => {
                info!("Quote feed stopped");
                ShutdownOutcome::Clean
            }
            Err(_) => {
                warn!("Refresh worker missed the shutdown deadline, detaching");
                ShutdownOutcome::TimedOut
            }
        }
    }
}
