//! Injectable wall-clock abstraction.
//!
//! Staleness classification compares quote timestamps against "now". Routing
//! "now" through a trait lets tests advance time explicitly instead of
//! sleeping; production code uses [`SystemClock`].

use chrono::{DateTime, Utc};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Current time in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
