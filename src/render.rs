//! Ticker line formatting for the display renderer.
//!
//! The crate's render collaborator draws pixels; this module only produces
//! the text it scrolls. Fresh and stale quotes format identically - showing
//! an old price beats showing nothing - while a symbol with no data at all
//! gets a distinguishable placeholder.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{Quote, QuoteState, Symbol};

/// Placeholder shown for a symbol with no data.
const NO_DATA: &str = "----";

/// Which optional parts of a ticker line to include.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RenderOptions {
    /// Include the absolute change after the price.
    #[serde(default = "default_true")]
    pub show_change: bool,
    /// Include the percentage change in parentheses.
    #[serde(default = "default_true")]
    pub show_percentage: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_change: true,
            show_percentage: true,
        }
    }
}

/// Format one symbol's cache state as a scrolling ticker line.
///
/// `AAPL: $150.25 +2.50 (+1.7%)` for priced symbols, `AAPL: ----` when
/// nothing has ever been fetched.
#[must_use]
pub fn ticker_line(symbol: &Symbol, state: &QuoteState, options: &RenderOptions) -> String {
    match state.quote() {
        Some(quote) => format_quote(quote, options),
        None => format!("{symbol}: {NO_DATA}"),
    }
}

/// Format a quote as a ticker line.
#[must_use]
pub fn format_quote(quote: &Quote, options: &RenderOptions) -> String {
    let mut line = format!("{}: ${}", quote.symbol(), quote.price());

    if options.show_change {
        line.push(' ');
        line.push_str(&signed(quote.change_abs()));
    }

    if options.show_percentage {
        line.push_str(&format!(" ({}%)", signed(quote.change_pct())));
    }

    line
}

/// Render a decimal with an explicit sign, `+` included for zero.
fn signed(value: Decimal) -> String {
    if value.is_sign_negative() && !value.is_zero() {
        value.to_string()
    } else {
        // abs() so a negative zero still prints as "+0".
        format!("+{}", value.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn aapl_quote() -> Quote {
        Quote::new(
            Symbol::stock("AAPL"),
            dec!(150.25),
            dec!(2.50),
            dec!(1.7),
            Utc::now(),
        )
    }

    #[test]
    fn formats_price_change_and_percentage() {
        let line = format_quote(&aapl_quote(), &RenderOptions::default());
        assert_eq!(line, "AAPL: $150.25 +2.50 (+1.7%)");
    }

    #[test]
    fn formats_negative_change_with_sign() {
        let quote = Quote::new(
            Symbol::crypto("BTC"),
            dec!(64123.10),
            dec!(-950.40),
            dec!(-1.46),
            Utc::now(),
        );
        let line = format_quote(&quote, &RenderOptions::default());
        assert_eq!(line, "BTC: $64123.10 -950.40 (-1.46%)");
    }

    #[test]
    fn honors_display_toggles() {
        let options = RenderOptions {
            show_change: false,
            show_percentage: false,
        };
        assert_eq!(format_quote(&aapl_quote(), &options), "AAPL: $150.25");

        let options = RenderOptions {
            show_change: false,
            show_percentage: true,
        };
        assert_eq!(
            format_quote(&aapl_quote(), &options),
            "AAPL: $150.25 (+1.7%)"
        );
    }

    #[test]
    fn unknown_state_gets_placeholder() {
        let symbol = Symbol::stock("SMCI");
        let line = ticker_line(&symbol, &QuoteState::Unknown, &RenderOptions::default());
        assert_eq!(line, "SMCI: ----");
    }

    #[test]
    fn stale_state_formats_like_fresh() {
        let quote = aapl_quote();
        let fresh = QuoteState::Fresh {
            quote: quote.clone(),
            age: std::time::Duration::ZERO,
        };
        let stale = QuoteState::Stale {
            quote,
            age: std::time::Duration::from_secs(3600),
        };
        let options = RenderOptions::default();
        let symbol = Symbol::stock("AAPL");

        assert_eq!(
            ticker_line(&symbol, &fresh, &options),
            ticker_line(&symbol, &stale, &options)
        );
    }
}
