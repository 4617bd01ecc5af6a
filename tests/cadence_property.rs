// tests/cadence_property.rs

use std::time::Duration;

use proptest::prelude::*;
use scriptcollect::engine::core::{
    collect_interval, max_execution_time, remaining_sleep, MAX_COLLECT_INTERVAL_SEC,
};

#[test]
fn deadline_is_one_second_before_next_cycle() {
    assert_eq!(max_execution_time(10), Duration::from_secs(9));
    assert_eq!(max_execution_time(2), Duration::from_secs(1));
    assert_eq!(max_execution_time(0), Duration::ZERO);
}

#[test]
fn oversized_intervals_are_clamped_to_one_day() {
    assert_eq!(collect_interval(u64::MAX), Duration::from_secs(MAX_COLLECT_INTERVAL_SEC));
    assert_eq!(
        max_execution_time(u64::MAX),
        Duration::from_secs(MAX_COLLECT_INTERVAL_SEC - 1)
    );
}

#[test]
fn overrun_skips_sleep() {
    let interval = collect_interval(10);
    assert_eq!(remaining_sleep(Duration::from_secs(10), interval), None);
    assert_eq!(remaining_sleep(Duration::from_secs(12), interval), None);
    assert_eq!(
        remaining_sleep(Duration::from_millis(9_250), interval),
        Some(Duration::from_millis(750))
    );
}

proptest! {
    #[test]
    fn cycle_start_never_drifts(interval_sec in 2u64..3600, elapsed_ms in 0u64..7_200_000) {
        let interval = collect_interval(interval_sec);
        let elapsed = Duration::from_millis(elapsed_ms);

        match remaining_sleep(elapsed, interval) {
            // Sleeping tops the cycle up to exactly one interval.
            Some(sleep) => {
                prop_assert!(elapsed < interval);
                prop_assert_eq!(elapsed + sleep, interval);
            }
            // An overrun starts the next cycle immediately; no debt carried.
            None => prop_assert!(elapsed >= interval),
        }
    }

    #[test]
    fn deadline_always_precedes_next_start(interval_sec in 2u64..86_400) {
        let deadline = max_execution_time(interval_sec);
        let interval = collect_interval(interval_sec);
        prop_assert!(deadline > Duration::ZERO);
        prop_assert_eq!(interval - deadline, Duration::from_secs(1));
    }
}
