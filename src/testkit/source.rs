//! Deterministic test double for quote fetching.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal_macros::dec;

use crate::clock::Clock;
use crate::domain::{Quote, Symbol};
use crate::error::FetchError;
use crate::source::{FetchOutcome, QuoteSource};

/// One scripted reply for a fetch call.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Return this outcome.
    Outcome(FetchOutcome),
    /// Fail the whole call.
    Error(FetchError),
    /// Park long enough that the caller's timeout always wins.
    Hang,
}

/// A [`QuoteSource`] that replays scripted responses and records calls.
///
/// Responses are consumed front-to-back; once the script runs dry, every
/// requested symbol succeeds with a synthetic quote stamped by the injected
/// clock. The source also watches for overlapping fetches of the same
/// symbol, which the refresh worker promises never to issue.
pub struct ScriptedQuoteSource {
    clock: Arc<dyn Clock>,
    responses: Mutex<VecDeque<ScriptedResponse>>,
    calls: Mutex<Vec<Vec<Symbol>>>,
    delay: Mutex<Option<Duration>>,
    active: Mutex<HashSet<Symbol>>,
    current: AtomicUsize,
    max_concurrent: AtomicUsize,
    overlap: AtomicBool,
}

impl ScriptedQuoteSource {
    /// Create a source whose synthetic quotes are stamped by `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            delay: Mutex::new(None),
            active: Mutex::new(HashSet::new()),
            current: AtomicUsize::new(0),
            max_concurrent: AtomicUsize::new(0),
            overlap: AtomicBool::new(false),
        }
    }

    /// Queue an outcome for the next fetch call.
    pub fn push_outcome(&self, outcome: FetchOutcome) {
        self.responses
            .lock()
            .push_back(ScriptedResponse::Outcome(outcome));
    }

    /// Queue a fully successful outcome.
    pub fn push_quotes(&self, quotes: Vec<Quote>) {
        self.push_outcome(FetchOutcome::success(quotes));
    }

    /// Queue a whole-call failure.
    pub fn push_error(&self, error: FetchError) {
        self.responses
            .lock()
            .push_back(ScriptedResponse::Error(error));
    }

    /// Queue `n` whole-call failures.
    pub fn push_errors(&self, error: FetchError, n: usize) {
        for _ in 0..n {
            self.push_error(error.clone());
        }
    }

    /// Queue a call that sleeps until the caller's timeout fires.
    pub fn push_hang(&self) {
        self.responses.lock().push_back(ScriptedResponse::Hang);
    }

    /// Make every call sleep this long before replying.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// All recorded fetch calls, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<Symbol>> {
        self.calls.lock().clone()
    }

    /// Number of fetch calls seen so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Whether two fetches for the same symbol ever ran concurrently.
    #[must_use]
    pub fn overlap_detected(&self) -> bool {
        self.overlap.load(Ordering::SeqCst)
    }

    /// Peak number of concurrently running fetch calls.
    #[must_use]
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent.load(Ordering::SeqCst)
    }

    fn default_outcome(&self, symbols: &[Symbol]) -> FetchOutcome {
        let now = self.clock.now();
        FetchOutcome::success(
            symbols
                .iter()
                .map(|s| Quote::new(s.clone(), dec!(100), dec!(0), dec!(0), now))
                .collect(),
        )
    }

    fn track<'a>(&'a self, symbols: &[Symbol]) -> InFlightGuard<'a> {
        {
            let mut active = self.active.lock();
            for symbol in symbols {
                if !active.insert(symbol.clone()) {
                    self.overlap.store(true, Ordering::SeqCst);
                }
            }
        }
        let running = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_concurrent.fetch_max(running, Ordering::SeqCst);

        InFlightGuard {
            source: self,
            symbols: symbols.to_vec(),
        }
    }
}

/// Clears in-flight tracking even when the caller's timeout cancels the
/// fetch future mid-sleep.
struct InFlightGuard<'a> {
    source: &'a ScriptedQuoteSource,
    symbols: Vec<Symbol>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut active = self.source.active.lock();
        for symbol in &self.symbols {
            active.remove(symbol);
        }
        drop(active);
        self.source.current.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl QuoteSource for ScriptedQuoteSource {
    async fn fetch(&self, symbols: &[Symbol]) -> Result<FetchOutcome, FetchError> {
        self.calls.lock().push(symbols.to_vec());
        let _guard = self.track(symbols);

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.responses.lock().pop_front();
        match response {
            Some(ScriptedResponse::Outcome(outcome)) => Ok(outcome),
            Some(ScriptedResponse::Error(error)) => Err(error),
            Some(ScriptedResponse::Hang) => {
                tokio::time::sleep(Duration::from_secs(86_400)).await;
                Err(FetchError::Transport("scripted hang elapsed".into()))
            }
            None => Ok(self.default_outcome(symbols)),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}
