use std::time::Duration;

use marquee::domain::Symbol;
use marquee::refresh::RefreshPlan;

/// A plan that ticks every second with a generous timeout and no retries.
pub fn fast_plan(symbols: Vec<Symbol>) -> RefreshPlan {
    plan_with(symbols, Duration::from_secs(1), Duration::from_secs(10), 0)
}

pub fn plan_with(
    symbols: Vec<Symbol>,
    interval: Duration,
    timeout: Duration,
    max_retries: u32,
) -> RefreshPlan {
    RefreshPlan::new(symbols, interval, timeout, max_retries, 0).expect("valid test plan")
}
