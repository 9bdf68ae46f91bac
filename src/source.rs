//! Quote source trait definitions.
//!
//! A [`QuoteSource`] is the injected collaborator that actually talks to a
//! market-data backend. The refresh worker bounds each call with a timeout
//! and a retry budget; any backoff between attempts is the source's own
//! concern.

use async_trait::async_trait;

use crate::domain::{Quote, Symbol};
use crate::error::FetchError;

/// The result of one fetch call, partial failures included.
///
/// A source asked for several symbols may succeed on some and fail on
/// others; that is a normal outcome, not an error. Callers commit the
/// successes and handle each failure per the retry/staleness policy.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    quotes: Vec<Quote>,
    failures: Vec<(Symbol, FetchError)>,
}

impl FetchOutcome {
    /// Create an outcome from fetched quotes and per-symbol failures.
    #[must_use]
    pub fn new(quotes: Vec<Quote>, failures: Vec<(Symbol, FetchError)>) -> Self {
        Self { quotes, failures }
    }

    /// Create a fully successful outcome.
    #[must_use]
    pub fn success(quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            failures: Vec::new(),
        }
    }

    /// Get the successfully fetched quotes.
    #[must_use]
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Get the symbols that failed, with their errors.
    #[must_use]
    pub fn failures(&self) -> &[(Symbol, FetchError)] {
        &self.failures
    }

    /// Check if every requested symbol came back with a quote.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Take the quote for a symbol out of the outcome, if present.
    #[must_use]
    pub fn take_quote(&mut self, symbol: &Symbol) -> Option<Quote> {
        let index = self.quotes.iter().position(|q| q.symbol() == symbol)?;
        Some(self.quotes.swap_remove(index))
    }

    /// Get the recorded failure for a symbol, if present.
    #[must_use]
    pub fn failure_for(&self, symbol: &Symbol) -> Option<&FetchError> {
        self.failures
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, e)| e)
    }

    /// Consume the outcome into its quotes and failures.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Quote>, Vec<(Symbol, FetchError)>) {
        (self.quotes, self.failures)
    }
}

/// Source of quote data for a set of symbols.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the latest quotes for the given symbols.
    ///
    /// Returns `Err` only when the call as a whole failed (transport down,
    /// malformed response). Per-symbol misses belong in the outcome's
    /// failure list.
    async fn fetch(&self, symbols: &[Symbol]) -> Result<FetchOutcome, FetchError>;

    /// Get the source name for logging/debugging.
    fn source_name(&self) -> &'static str;
}
