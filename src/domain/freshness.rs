//! Freshness classification of cached quotes.

use std::time::Duration;

use super::quote::Quote;

/// What the cache knows about a symbol, classified by age.
///
/// Absence of data is a normal result, not an error: a symbol that has never
/// been fetched is `Unknown`, and one whose quote has outlived the staleness
/// threshold is `Stale` but still carries the last known quote.
#[derive(Debug, Clone)]
pub enum QuoteState {
    /// The cached quote is within the staleness threshold.
    Fresh { quote: Quote, age: Duration },
    /// The cached quote has outlived the staleness threshold.
    Stale { quote: Quote, age: Duration },
    /// No quote has ever been cached for this symbol.
    Unknown,
}

impl QuoteState {
    /// Get the cached quote, fresh or stale.
    #[must_use]
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            QuoteState::Fresh { quote, .. } | QuoteState::Stale { quote, .. } => Some(quote),
            QuoteState::Unknown => None,
        }
    }

    /// Get the quote's age at classification time.
    #[must_use]
    pub fn age(&self) -> Option<Duration> {
        match self {
            QuoteState::Fresh { age, .. } | QuoteState::Stale { age, .. } => Some(*age),
            QuoteState::Unknown => None,
        }
    }

    /// Check if the state is `Fresh`.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        matches!(self, QuoteState::Fresh { .. })
    }

    /// Check if the state is `Stale`.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self, QuoteState::Stale { .. })
    }

    /// Check if the state is `Unknown`.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, QuoteState::Unknown)
    }
}
