//! A hand-advanced clock for deterministic staleness tests.

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

use crate::clock::Clock;

/// A [`Clock`] that only moves when told to.
///
/// Tests advance it explicitly instead of sleeping, so staleness
/// classification is exact and instant.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock starting at the given instant.
    #[must_use]
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: std::time::Duration) {
        let by = chrono::Duration::from_std(by).expect("advance duration out of range");
        *self.now.lock() += by;
    }

    /// Set the clock to an absolute instant.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }

    /// Current reading without going through the trait.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

impl Default for ManualClock {
    /// Starts at a fixed, arbitrary date so tests are reproducible.
    fn default() -> Self {
        Self::starting_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
