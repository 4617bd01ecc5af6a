// src/engine/core.rs

//! Pure cadence arithmetic.
//!
//! Everything here is synchronous and free of Tokio types so it can be
//! tested (and property-tested) without a runtime or a clock.

use std::time::Duration;

/// Cooldown between an intercepted fault and the restart of a worker loop.
pub const DEFAULT_CRASH_COOLDOWN: Duration = Duration::from_secs(10);

/// Longest accepted collection interval (one day). Larger values are
/// rejected by config validation and clamped here.
pub const MAX_COLLECT_INTERVAL_SEC: u64 = 86_400;

/// Time between the starts of two successive cycles.
pub fn collect_interval(collect_interval_sec: u64) -> Duration {
    Duration::from_secs(collect_interval_sec.min(MAX_COLLECT_INTERVAL_SEC))
}

/// Deadline for one script execution, measured from cycle start.
///
/// One second shorter than the collection interval, so a timed-out run still
/// leaves room to keep the cadence.
pub fn max_execution_time(collect_interval_sec: u64) -> Duration {
    Duration::from_secs(
        collect_interval_sec
            .min(MAX_COLLECT_INTERVAL_SEC)
            .saturating_sub(1),
    )
}

/// How long to sleep after a cycle that took `elapsed`.
///
/// `None` means the cycle overran its interval: the next cycle starts right
/// away and no sleep debt is carried over.
pub fn remaining_sleep(elapsed: Duration, interval: Duration) -> Option<Duration> {
    interval.checked_sub(elapsed).filter(|d| !d.is_zero())
}
