// src/adapter/http_spans.rs

//! HTTP server spans, one span per traced request.

use blake3::Hasher;

use crate::errors::ConversionError;
use crate::row::Row;
use crate::telemetry::{
    instrumentation_scope, KeyValue, ResourceSpans, ScopeSpans, Span, SpanKind, Status,
    StatusCode,
};

use super::{IntegrationDescriptor, ResourceHelper, RowConverter};

pub const ADAPTER_NAME: &str = "http_spans";

const SCRIPT_TEMPLATE: &str = r#"#px:set max_output_rows_per_table=10000

import px

df = px.DataFrame('http_events', start_time='-{interval}s')
df = df[df.trace_role == 2]
df.container = df.ctx['container_name']
df.pod = df.ctx['pod']
df.service = df.ctx['service']
df.namespace = df.ctx['namespace']
df = df[df.service != '']
df = df[['time_', 'latency', 'req_method', 'req_path', 'resp_status',
         'container', 'pod', 'service', 'namespace']]

px.display(df, 'http_spans')
"#;

pub fn script(interval: u64) -> String {
    SCRIPT_TEMPLATE.replace("{interval}", &interval.to_string())
}

#[derive(Debug, Clone)]
pub struct HttpSpansAdapter {
    descriptor: IntegrationDescriptor,
}

impl HttpSpansAdapter {
    pub fn new(descriptor: IntegrationDescriptor) -> Self {
        Self { descriptor }
    }
}

impl RowConverter for HttpSpansAdapter {
    type Entity = ResourceSpans;

    fn descriptor(&self) -> &IntegrationDescriptor {
        &self.descriptor
    }

    fn convert(
        &self,
        resources: &ResourceHelper,
        row: &Row,
    ) -> Result<Vec<ResourceSpans>, ConversionError> {
        let start = row.get_time_ns("time_")?;
        let latency = row.get_i64("latency")?;
        let latency = u64::try_from(latency).map_err(|_| ConversionError::Unusable {
            column: "latency".to_string(),
            reason: format!("negative latency {latency}"),
        })?;
        let method = row.get_str("req_method")?;
        let path = row.get_str("req_path")?;
        let code = row.get_i64("resp_status")?;

        let resource = resources.create_resource(row)?;

        let (trace_id, span_id) = span_ids(start, latency, method, path, code, row.opt_str("pod")?);

        let status = if code >= 500 {
            Status {
                message: format!("HTTP {code}"),
                code: StatusCode::Error,
            }
        } else {
            Status {
                message: String::new(),
                code: StatusCode::Unset,
            }
        };

        let span = Span {
            trace_id,
            span_id,
            parent_span_id: String::new(),
            name: format!("{method} {path}"),
            kind: SpanKind::Server,
            start_time_unix_nano: start,
            end_time_unix_nano: start.saturating_add(latency),
            attributes: vec![
                KeyValue::string("http.method", method),
                KeyValue::string("http.target", path),
                KeyValue::int("http.status_code", code),
            ],
            status,
        };

        Ok(vec![ResourceSpans {
            resource,
            scope_spans: vec![ScopeSpans {
                scope: instrumentation_scope(),
                spans: vec![span],
            }],
        }])
    }
}

/// Trace and span ids derived from the request itself, so re-reading the
/// same row yields the same ids on every build.
fn span_ids(
    start: u64,
    latency: u64,
    method: &str,
    path: &str,
    code: i64,
    pod: Option<&str>,
) -> (String, String) {
    let mut hasher = Hasher::new();
    hasher.update(&start.to_le_bytes());
    hasher.update(&latency.to_le_bytes());
    hasher.update(&code.to_le_bytes());
    for field in [method, path, pod.unwrap_or_default()] {
        hasher.update(&(field.len() as u64).to_le_bytes());
        hasher.update(field.as_bytes());
    }
    let hex = hasher.finalize().to_hex();
    (hex[..32].to_string(), hex[32..48].to_string())
}
