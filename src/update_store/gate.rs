//! Staleness gate shared by the version and usage checks

use chrono::Utc;

/// Source of the current time in epoch milliseconds
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall clock (UTC)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// True when `force` is set or more than `min_interval_ms` has passed
pub fn should_refresh(last_attempt: i64, min_interval_ms: i64, now: i64, force: bool) -> bool {
    force || now.saturating_sub(last_attempt) > min_interval_ms
}

/// Check the gate and, if open, stamp the attempt in the same step
///
/// Callers hold the state lock across this call, so a second caller in the
/// same window sees the fresh stamp. Stamps never move backwards.
pub fn claim(last_attempt: &mut i64, min_interval_ms: i64, now: i64, force: bool) -> bool {
    if !should_refresh(*last_attempt, min_interval_ms, now, force) {
        return false;
    }
    *last_attempt = (*last_attempt).max(now);
    true
}
