use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::time::Instant;

use scriptcollect::errors::CollectorError;
use scriptcollect::export::{ExportFuture, Exporter};
use scriptcollect::telemetry::{ResourceMetrics, ResourceSpans};

/// An exporter that keeps every batch it was handed, with the instant it
/// arrived. Can be switched into a failing mode.
#[derive(Clone, Default)]
pub struct RecordingExporter {
    metrics: Arc<Mutex<Vec<(Instant, Vec<ResourceMetrics>)>>>,
    spans: Arc<Mutex<Vec<(Instant, Vec<ResourceSpans>)>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn metrics_batches(&self) -> Vec<Vec<ResourceMetrics>> {
        self.metrics.lock().unwrap().iter().map(|(_, b)| b.clone()).collect()
    }

    pub fn metrics_instants(&self) -> Vec<Instant> {
        self.metrics.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    pub fn spans_batches(&self) -> Vec<Vec<ResourceSpans>> {
        self.spans.lock().unwrap().iter().map(|(_, b)| b.clone()).collect()
    }

    fn check(&self) -> scriptcollect::errors::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CollectorError::Export("recording exporter set to fail".to_string()));
        }
        Ok(())
    }
}

impl Exporter for RecordingExporter {
    fn name(&self) -> &str {
        "recording"
    }

    fn send_metrics(&self, batch: Vec<ResourceMetrics>) -> ExportFuture<'_> {
        Box::pin(async move {
            self.check()?;
            self.metrics.lock().unwrap().push((Instant::now(), batch));
            Ok(())
        })
    }

    fn send_spans(&self, batch: Vec<ResourceSpans>) -> ExportFuture<'_> {
        Box::pin(async move {
            self.check()?;
            self.spans.lock().unwrap().push((Instant::now(), batch));
            Ok(())
        })
    }
}
