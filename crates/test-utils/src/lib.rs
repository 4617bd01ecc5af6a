//! Shared fixtures for the integration tests: a scripted query engine, a
//! recording exporter, a minimal gauge adapter and config builders.

pub mod builders;
pub mod fake_engine;
pub mod recording_exporter;
pub mod test_adapter;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use scriptcollect::logging::{filter_from_env, LOG_ENV_VAR};
use tracing_subscriber::{fmt, EnvFilter};

/// Wall-clock budget for tests that talk to real processes or sockets.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Route `tracing` output into the test harness's captured output.
///
/// Reads `SCRIPTCOLLECT_LOG` like the binary does (falling back to
/// `RUST_LOG`), so `SCRIPTCOLLECT_LOG=scriptcollect=debug cargo test -- --nocapture`
/// shows the supervisor's cycle-level logs.
pub fn init_tracing() {
    INIT.call_once(|| {
        let raw = std::env::var(LOG_ENV_VAR)
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok();
        let filter = filter_from_env(raw.as_deref()).unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Fail the test if `f` has not finished within [`TEST_TIMEOUT`].
///
/// Not meant for paused-clock tests, where time auto-advances.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(out) => out,
        Err(_) => panic!("test did not finish within {TEST_TIMEOUT:?}"),
    }
}
