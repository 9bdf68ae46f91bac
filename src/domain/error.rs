//! Domain validation errors.
//!
//! Returned by `try_new` constructors that validate domain invariants.

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    /// Tickers must be non-empty after trimming.
    #[error("ticker cannot be empty")]
    EmptyTicker,

    /// Tickers may only contain ASCII alphanumerics, `.` and `-`.
    #[error("invalid ticker: {ticker:?}")]
    InvalidTicker {
        /// The offending ticker, after normalization.
        ticker: String,
    },
}
