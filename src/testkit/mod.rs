//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via the `testkit` feature; the crate's own tests pull it in
//! through a dev-dependency on itself.
//!
//! # Modules
//!
//! - [`clock`] — [`ManualClock`], a hand-advanced [`Clock`](crate::clock::Clock).
//! - [`source`] — [`ScriptedQuoteSource`], a scripted [`QuoteSource`](crate::source::QuoteSource)
//!   that records calls and detects overlapping fetches.
//! - [`domain`] — Builders for domain primitives: symbols and quotes.

pub mod clock;
pub mod domain;
pub mod source;

pub use clock::ManualClock;
pub use source::{ScriptedQuoteSource, ScriptedResponse};
