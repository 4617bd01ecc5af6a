// src/export/mod.rs

//! Outbound side of the pipeline.
//!
//! Workers flush independently and concurrently, so every [`Exporter`] must
//! be safe to call from many tasks at once; the pipeline adds no
//! serialisation of its own.
//!
//! - [`stdout`] writes OTLP JSON documents to standard output.
//! - [`otlp_http`] posts OTLP JSON to a collector endpoint.

pub mod otlp_http;
pub mod stdout;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;

use crate::config::model::ExporterSection;
use crate::errors::Result;
use crate::telemetry::{ResourceMetrics, ResourceSpans};
use crate::types::ExporterKind;

pub use otlp_http::OtlpHttpExporter;
pub use stdout::StdoutExporter;

pub type ExportFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

pub trait Exporter: Send + Sync {
    fn name(&self) -> &str;

    fn send_metrics(&self, batch: Vec<ResourceMetrics>) -> ExportFuture<'_>;

    fn send_spans(&self, batch: Vec<ResourceSpans>) -> ExportFuture<'_>;
}

/// OTLP `ExportMetricsServiceRequest` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRequest {
    pub resource_metrics: Vec<ResourceMetrics>,
}

/// OTLP `ExportTraceServiceRequest` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TracesRequest {
    pub resource_spans: Vec<ResourceSpans>,
}

/// Build the exporter selected by `[exporter].kind`.
pub fn build_exporter(cfg: &ExporterSection) -> Result<Arc<dyn Exporter>> {
    match cfg.kind {
        ExporterKind::Stdout => Ok(Arc::new(StdoutExporter::new())),
        ExporterKind::OtlpHttp => Ok(Arc::new(OtlpHttpExporter::from_config(cfg)?)),
    }
}
