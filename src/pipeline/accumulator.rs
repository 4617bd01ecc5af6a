// src/pipeline/accumulator.rs

//! Per-run telemetry batch.

use crate::errors::Result;
use crate::export::{ExportFuture, Exporter};
use crate::telemetry::{ResourceMetrics, ResourceSpans};
use crate::types::PayloadKind;

/// A top-level telemetry entity and the exporter capability that ships it.
///
/// Implemented for exactly two types, which form the closed set of run kinds:
/// [`MetricsRun`] and [`SpansRun`].
pub trait TelemetryEntity: Send + Sized + 'static {
    const KIND: PayloadKind;

    fn send(exporter: &dyn Exporter, batch: Vec<Self>) -> ExportFuture<'_>;
}

impl TelemetryEntity for ResourceMetrics {
    const KIND: PayloadKind = PayloadKind::Metrics;

    fn send(exporter: &dyn Exporter, batch: Vec<Self>) -> ExportFuture<'_> {
        exporter.send_metrics(batch)
    }
}

impl TelemetryEntity for ResourceSpans {
    const KIND: PayloadKind = PayloadKind::Spans;

    fn send(exporter: &dyn Exporter, batch: Vec<Self>) -> ExportFuture<'_> {
        exporter.send_spans(batch)
    }
}

/// Owns the one batch of a single run.
///
/// Constructed fresh for every cycle. `flush` consumes the accumulator, so a
/// batch can reach the exporter at most once.
#[derive(Debug)]
pub struct Accumulator<T> {
    batch: Vec<T>,
}

pub type MetricsRun = Accumulator<ResourceMetrics>;
pub type SpansRun = Accumulator<ResourceSpans>;

impl<T: TelemetryEntity> Accumulator<T> {
    pub fn new() -> Self {
        Self { batch: Vec::new() }
    }

    pub fn kind(&self) -> PayloadKind {
        T::KIND
    }

    pub fn append(&mut self, entities: impl IntoIterator<Item = T>) {
        self.batch.extend(entities);
    }

    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    /// Hand the whole batch to the exporter and return how many top-level
    /// entities were sent.
    pub async fn flush(self, exporter: &dyn Exporter) -> Result<usize> {
        let count = self.batch.len();
        T::send(exporter, self.batch).await?;
        Ok(count)
    }
}

impl<T: TelemetryEntity> Default for Accumulator<T> {
    fn default() -> Self {
        Self::new()
    }
}
