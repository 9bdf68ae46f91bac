//! Builders for domain primitives used across tests.
//!
//! Concise factory functions for [`Symbol`] and [`Quote`] so tests focus on
//! assertions rather than construction boilerplate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{Quote, Symbol};

/// Create a stock [`Symbol`].
#[must_use]
pub fn stock(ticker: &str) -> Symbol {
    Symbol::stock(ticker)
}

/// Create a crypto [`Symbol`].
#[must_use]
pub fn crypto(ticker: &str) -> Symbol {
    Symbol::crypto(ticker)
}

/// Create a quote with the given price and timestamp, zero change.
#[must_use]
pub fn quote_at(symbol: &Symbol, price: Decimal, fetched_at: DateTime<Utc>) -> Quote {
    Quote::new(
        symbol.clone(),
        price,
        Decimal::ZERO,
        Decimal::ZERO,
        fetched_at,
    )
}

/// Create a quote with explicit change fields.
#[must_use]
pub fn quote_with_change(
    symbol: &Symbol,
    price: Decimal,
    change_abs: Decimal,
    change_pct: Decimal,
    fetched_at: DateTime<Utc>,
) -> Quote {
    Quote::new(symbol.clone(), price, change_abs, change_pct, fetched_at)
}
