// src/telemetry/mod.rs

//! OpenTelemetry data model for converted rows.
//!
//! These types mirror the OTLP protobuf messages closely enough that they
//! serialise straight into the OTLP/HTTP JSON encoding:
//! - field names are lowerCamelCase,
//! - 64-bit integers (timestamps, int values) are decimal strings,
//! - `oneof` fields are flattened into their variant key.
//!
//! - [`common`] holds attributes, resources and instrumentation scopes.
//! - [`metrics`] holds the `ResourceMetrics` tree (gauges only).
//! - [`trace`] holds the `ResourceSpans` tree.

pub mod common;
pub mod metrics;
pub mod trace;

pub use common::{AnyValue, InstrumentationScope, KeyValue, Resource};
pub use metrics::{Gauge, Metric, MetricData, NumberDataPoint, NumberValue, ResourceMetrics, ScopeMetrics};
pub use trace::{ResourceSpans, ScopeSpans, Span, SpanKind, Status, StatusCode};

/// Scope name stamped on every batch this collector produces.
pub const SCOPE_NAME: &str = "scriptcollect";

pub(crate) fn instrumentation_scope() -> InstrumentationScope {
    InstrumentationScope {
        name: SCOPE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

pub(crate) mod as_string {
    use serde::Serializer;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: std::fmt::Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }
}
