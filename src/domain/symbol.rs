//! Ticker symbols and their market kind.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Whether a symbol trades on a stock exchange or a crypto market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Stock,
    Crypto,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Stock => write!(f, "stock"),
            SymbolKind::Crypto => write!(f, "crypto"),
        }
    }
}

/// An uppercase ticker symbol plus its market kind.
///
/// The (ticker, kind) pair is the cache key. Constructors normalize the
/// ticker to uppercase so `"aapl"` and `"AAPL"` name the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    ticker: String,
    kind: SymbolKind,
}

impl Symbol {
    /// Create a stock symbol, normalizing the ticker to uppercase.
    pub fn stock(ticker: impl Into<String>) -> Self {
        Self::new(ticker, SymbolKind::Stock)
    }

    /// Create a crypto symbol, normalizing the ticker to uppercase.
    pub fn crypto(ticker: impl Into<String>) -> Self {
        Self::new(ticker, SymbolKind::Crypto)
    }

    /// Create a symbol of the given kind, normalizing to uppercase.
    pub fn new(ticker: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            ticker: ticker.into().trim().to_uppercase(),
            kind,
        }
    }

    /// Create a symbol with ticker validation.
    ///
    /// # Domain Invariants
    ///
    /// - the ticker must not be empty after trimming
    /// - the ticker may only contain ASCII alphanumerics, `.` and `-`
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if any invariant is violated.
    pub fn try_new(ticker: impl Into<String>, kind: SymbolKind) -> Result<Self, DomainError> {
        let ticker = ticker.into().trim().to_uppercase();

        if ticker.is_empty() {
            return Err(DomainError::EmptyTicker);
        }

        if !ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Err(DomainError::InvalidTicker { ticker });
        }

        Ok(Self { ticker, kind })
    }

    /// Get the ticker as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.ticker
    }

    /// Get the market kind.
    #[must_use]
    pub const fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Check if this is a crypto symbol.
    #[must_use]
    pub const fn is_crypto(&self) -> bool {
        matches!(self.kind, SymbolKind::Crypto)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_normalizes_to_uppercase() {
        let symbol = Symbol::stock("aapl");
        assert_eq!(symbol.as_str(), "AAPL");
        assert_eq!(symbol.kind(), SymbolKind::Stock);
    }

    #[test]
    fn crypto_trims_whitespace() {
        let symbol = Symbol::crypto(" btc ");
        assert_eq!(symbol.as_str(), "BTC");
        assert!(symbol.is_crypto());
    }

    #[test]
    fn same_ticker_same_kind_is_same_key() {
        assert_eq!(Symbol::stock("NVDA"), Symbol::stock("nvda"));
    }

    #[test]
    fn same_ticker_different_kind_is_different_key() {
        assert_ne!(Symbol::stock("BTC"), Symbol::crypto("BTC"));
    }

    #[test]
    fn try_new_rejects_empty_ticker() {
        let result = Symbol::try_new("   ", SymbolKind::Stock);
        assert!(matches!(result, Err(DomainError::EmptyTicker)));
    }

    #[test]
    fn try_new_rejects_garbage_ticker() {
        let result = Symbol::try_new("A APL$", SymbolKind::Stock);
        assert!(matches!(result, Err(DomainError::InvalidTicker { .. })));
    }

    #[test]
    fn try_new_accepts_dotted_and_dashed_tickers() {
        assert!(Symbol::try_new("BRK.B", SymbolKind::Stock).is_ok());
        assert!(Symbol::try_new("BTC-USD", SymbolKind::Crypto).is_ok());
    }

    #[test]
    fn display_is_the_ticker() {
        assert_eq!(format!("{}", Symbol::stock("VOO")), "VOO");
    }
}
