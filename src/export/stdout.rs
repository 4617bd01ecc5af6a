// src/export/stdout.rs

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::Result;
use crate::telemetry::{ResourceMetrics, ResourceSpans};

use super::{ExportFuture, Exporter, MetricsRequest, TracesRequest};

type LineSink = Box<dyn AsyncWrite + Send + Unpin>;

/// Writes each batch as a single line of OTLP JSON.
///
/// The writer sits behind an async lock so lines from concurrent workers
/// never interleave.
pub struct StdoutExporter {
    out: Mutex<LineSink>,
}

impl StdoutExporter {
    pub fn new() -> Self {
        Self::from_writer(tokio::io::stdout())
    }

    /// Same framing, any async writer.
    pub fn from_writer<W>(writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }

    async fn write_line<T: Serialize>(&self, body: &T) -> Result<()> {
        let mut line = serde_json::to_vec(body)?;
        line.push(b'\n');

        let mut out = self.out.lock().await;
        out.write_all(&line).await?;
        out.flush().await?;
        Ok(())
    }
}

impl Default for StdoutExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for StdoutExporter {
    fn name(&self) -> &str {
        "stdout"
    }

    fn send_metrics(&self, batch: Vec<ResourceMetrics>) -> ExportFuture<'_> {
        Box::pin(async move {
            debug!(entities = batch.len(), "writing metrics batch to stdout");
            self.write_line(&MetricsRequest {
                resource_metrics: batch,
            })
            .await
        })
    }

    fn send_spans(&self, batch: Vec<ResourceSpans>) -> ExportFuture<'_> {
        Box::pin(async move {
            debug!(entities = batch.len(), "writing spans batch to stdout");
            self.write_line(&TracesRequest {
                resource_spans: batch,
            })
            .await
        })
    }
}
