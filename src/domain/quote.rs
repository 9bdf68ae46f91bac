//! Priced snapshots of a symbol at a point in time.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::symbol::Symbol;

/// Direction of a quote's change since the previous close.
///
/// This is the hook the display host keys its positive/negative coloring
/// off; the crate itself does no color work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

/// A single priced snapshot of a symbol.
///
/// Quotes are immutable: a new fetch produces a new `Quote` that replaces
/// the old one for its symbol in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    symbol: Symbol,
    price: Decimal,
    change_abs: Decimal,
    change_pct: Decimal,
    volume: Option<u64>,
    market_cap: Option<u64>,
    fetched_at: DateTime<Utc>,
}

impl Quote {
    /// Create a new quote.
    pub fn new(
        symbol: Symbol,
        price: Decimal,
        change_abs: Decimal,
        change_pct: Decimal,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol,
            price,
            change_abs,
            change_pct,
            volume: None,
            market_cap: None,
            fetched_at,
        }
    }

    /// Attach a traded volume.
    #[must_use]
    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Attach a market capitalization.
    #[must_use]
    pub fn with_market_cap(mut self, market_cap: u64) -> Self {
        self.market_cap = Some(market_cap);
        self
    }

    /// Get the symbol this quote prices.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Get the last traded price.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// Get the absolute change since the previous close.
    #[must_use]
    pub const fn change_abs(&self) -> Decimal {
        self.change_abs
    }

    /// Get the percentage change since the previous close.
    #[must_use]
    pub const fn change_pct(&self) -> Decimal {
        self.change_pct
    }

    /// Get the traded volume, if the source reported one.
    #[must_use]
    pub const fn volume(&self) -> Option<u64> {
        self.volume
    }

    /// Get the market capitalization, if the source reported one.
    #[must_use]
    pub const fn market_cap(&self) -> Option<u64> {
        self.market_cap
    }

    /// Get the time this quote was fetched.
    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Direction of the change since the previous close.
    #[must_use]
    pub fn trend(&self) -> Trend {
        if self.change_abs.is_sign_negative() && !self.change_abs.is_zero() {
            Trend::Down
        } else if self.change_abs.is_zero() {
            Trend::Flat
        } else {
            Trend::Up
        }
    }
}
