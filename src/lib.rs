//! Marquee - Bounded-staleness quote cache for LED-matrix ticker displays.
//!
//! This crate is the data layer of a stock/crypto ticker plugin: it polls a
//! quote source in the background, caches the latest quote per symbol, and
//! hands the display loop something it can read without ever waiting on the
//! network.
//!
//! # Architecture
//!
//! Two roles share one [`feed::QuoteFeed`]:
//!
//! - The **display loop** calls [`feed::QuoteFeed::get`], which classifies the
//!   cached quote as `Fresh`, `Stale`, or `Unknown` and never touches the
//!   network. Stale data is still returned - an old price beats a blank panel.
//! - A **background worker** ticks every plan interval and refreshes each
//!   configured symbol through a pluggable [`source::QuoteSource`], bounded by
//!   a timeout and a retry budget. Failures leave the cached entry untouched.
//!
//! # Modules
//!
//! - [`config`] - TOML configuration loading with validation and clamping
//! - [`domain`] - Symbols, quotes, and freshness classification
//! - [`cache`] - The quote store with staleness classification
//! - [`source`] - The data source trait and partial-failure outcome type
//! - [`refresh`] - Refresh plans and the background refresh worker
//! - [`feed`] - The owned facade wiring cache, worker, and source together
//! - [`render`] - Ticker line formatting for the display renderer
//! - [`stats`] - Refresh observability counters
//! - [`clock`] - Injectable clock for deterministic staleness tests
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `testkit` - Deterministic test doubles (manual clock, scripted source)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use marquee::clock::SystemClock;
//! use marquee::config::Config;
//! use marquee::feed::QuoteFeed;
//! use marquee::render::ticker_line;
//! # use marquee::source::QuoteSource;
//! # fn quote_source() -> Arc<dyn QuoteSource> { unimplemented!() }
//!
//! # async fn run() -> marquee::error::Result<()> {
//! let config = Config::load("marquee.toml")?;
//! config.logging.init();
//!
//! let feed = QuoteFeed::from_config(&config, quote_source(), Arc::new(SystemClock))?;
//! feed.prime().await.ok();
//!
//! let plan = feed.plan();
//! for symbol in plan.symbols() {
//!     println!("{}", ticker_line(symbol, &feed.get(symbol), &config.render_options()));
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod refresh;
pub mod render;
pub mod source;
pub mod stats;

#[cfg(feature = "testkit")]
pub mod testkit;
