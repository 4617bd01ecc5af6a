#![allow(dead_code)]

pub use scriptcollect_test_utils::builders;
pub use scriptcollect_test_utils::fake_engine::{FakeQueryEngine, RunScript};
pub use scriptcollect_test_utils::recording_exporter::RecordingExporter;
pub use scriptcollect_test_utils::test_adapter::{GaugeAdapter, PANIC_COLUMN};
pub use scriptcollect_test_utils::{init_tracing, with_timeout};

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use scriptcollect::engine::{Supervisor, SupervisorOptions};

/// Supervisor for a `GaugeAdapter` over a fake engine and recording exporter.
pub fn gauge_supervisor(
    id: &str,
    interval_sec: u64,
    engine: &FakeQueryEngine,
    exporter: &RecordingExporter,
    max_cycles: Option<u64>,
) -> Supervisor<GaugeAdapter> {
    Supervisor::new(
        Arc::new(GaugeAdapter::new(id, interval_sec)),
        builders::fake_context(engine, exporter),
        CancellationToken::new(),
        SupervisorOptions {
            cooldown: Duration::from_secs(10),
            max_cycles,
        },
    )
}
