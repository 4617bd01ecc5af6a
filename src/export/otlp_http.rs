// src/export/otlp_http.rs

//! OTLP/HTTP exporter using the JSON encoding.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::Serialize;
use tracing::debug;

use crate::config::model::ExporterSection;
use crate::errors::{CollectorError, Result};
use crate::telemetry::{ResourceMetrics, ResourceSpans};

use super::{ExportFuture, Exporter, MetricsRequest, TracesRequest};

pub const METRICS_PATH: &str = "/v1/metrics";
pub const TRACES_PATH: &str = "/v1/traces";

/// Posts batches to `{endpoint}/v1/metrics` and `{endpoint}/v1/traces`.
///
/// `reqwest::Client` is internally reference counted and safe to share, so
/// concurrent flushes need no extra locking.
#[derive(Debug, Clone)]
pub struct OtlpHttpExporter {
    client: reqwest::Client,
    metrics_url: String,
    traces_url: String,
}

impl OtlpHttpExporter {
    pub fn new(
        endpoint: &str,
        headers: impl IntoIterator<Item = (String, String)>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut header_map = HeaderMap::new();
        header_map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                CollectorError::ConfigError(format!("invalid exporter header name '{name}': {e}"))
            })?;
            let value = HeaderValue::from_str(&value).map_err(|e| {
                CollectorError::ConfigError(format!("invalid value for exporter header '{name}': {e}"))
            })?;
            header_map.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(header_map)
            .timeout(timeout)
            .build()
            .map_err(|e| CollectorError::ConfigError(format!("building HTTP client: {e}")))?;

        let base = endpoint.trim_end_matches('/');
        Ok(Self {
            client,
            metrics_url: format!("{base}{METRICS_PATH}"),
            traces_url: format!("{base}{TRACES_PATH}"),
        })
    }

    pub fn from_config(cfg: &ExporterSection) -> Result<Self> {
        let endpoint = cfg.endpoint.as_deref().ok_or_else(|| {
            CollectorError::ConfigError(
                "[exporter].endpoint is required when kind = \"otlp_http\"".to_string(),
            )
        })?;
        Self::new(
            endpoint,
            cfg.headers.clone(),
            Duration::from_secs(cfg.timeout_sec),
        )
    }

    pub fn metrics_url(&self) -> &str {
        &self.metrics_url
    }

    pub fn traces_url(&self) -> &str {
        &self.traces_url
    }

    async fn post<T: Serialize>(&self, url: &str, body: &T) -> Result<()> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| CollectorError::Export(format!("POST {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CollectorError::Export(format!(
                "POST {url} returned {status}: {text}"
            )));
        }

        debug!(%url, %status, "batch accepted by collector");
        Ok(())
    }
}

impl Exporter for OtlpHttpExporter {
    fn name(&self) -> &str {
        "otlp_http"
    }

    fn send_metrics(&self, batch: Vec<ResourceMetrics>) -> ExportFuture<'_> {
        Box::pin(async move {
            let body = MetricsRequest {
                resource_metrics: batch,
            };
            self.post(&self.metrics_url, &body).await
        })
    }

    fn send_spans(&self, batch: Vec<ResourceSpans>) -> ExportFuture<'_> {
        Box::pin(async move {
            let body = TracesRequest {
                resource_spans: batch,
            };
            self.post(&self.traces_url, &body).await
        })
    }
}
