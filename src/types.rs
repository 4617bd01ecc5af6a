use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Which exporter capability a worker flushes through.
///
/// Every integration produces exactly one kind; the fleet runs one worker per
/// (integration, kind) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Metrics,
    Spans,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadKind::Metrics => f.write_str("metrics"),
            PayloadKind::Spans => f.write_str("spans"),
        }
    }
}

impl FromStr for PayloadKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metrics" => Ok(PayloadKind::Metrics),
            "spans" => Ok(PayloadKind::Spans),
            other => Err(format!(
                "invalid payload kind: {other} (expected \"metrics\" or \"spans\")"
            )),
        }
    }
}

/// Where converted batches are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExporterKind {
    /// One OTLP JSON document per line on stdout.
    Stdout,
    /// OTLP/HTTP with JSON bodies.
    OtlpHttp,
}

impl Default for ExporterKind {
    fn default() -> Self {
        ExporterKind::Stdout
    }
}

impl FromStr for ExporterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stdout" => Ok(ExporterKind::Stdout),
            "otlp_http" | "otlp-http" => Ok(ExporterKind::OtlpHttp),
            other => Err(format!(
                "invalid exporter kind: {other} (expected \"stdout\" or \"otlp_http\")"
            )),
        }
    }
}
