// src/adapter/mod.rs

//! Row Converters ("adapters") and the Resource Context they share.
//!
//! An adapter pairs the script an integration runs with the logic that turns
//! one result row into telemetry entities. The associated `Entity` type fixes
//! the payload kind at compile time, so a worker built for a metrics adapter
//! can only ever accumulate and flush metrics.
//!
//! - [`resources`] builds the per-row `Resource`.
//! - [`jvm`] is the built-in JVM GC/heap metrics adapter.
//! - [`http_spans`] is the built-in HTTP server spans adapter.

pub mod http_spans;
pub mod jvm;
pub mod resources;

use std::sync::Arc;

use crate::config::model::{ConfigFile, IntegrationConfig};
use crate::errors::{CollectorError, ConversionError, Result};
use crate::pipeline::TelemetryEntity;
use crate::row::Row;
use crate::telemetry::{ResourceMetrics, ResourceSpans};

pub use http_spans::HttpSpansAdapter;
pub use jvm::JvmAdapter;
pub use resources::ResourceHelper;

/// Immutable identity of one integration: what to run and how often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationDescriptor {
    pub id: String,
    pub collect_interval_sec: u64,
    pub script: String,
}

/// Maps one result row into telemetry entities for a single integration.
pub trait RowConverter: Send + Sync + 'static {
    type Entity: TelemetryEntity;

    fn descriptor(&self) -> &IntegrationDescriptor;

    /// Convert one row. On success the returned vector is non-empty.
    fn convert(
        &self,
        resources: &ResourceHelper,
        row: &Row,
    ) -> std::result::Result<Vec<Self::Entity>, ConversionError>;

    fn id(&self) -> &str {
        &self.descriptor().id
    }

    fn collect_interval_sec(&self) -> u64 {
        self.descriptor().collect_interval_sec
    }

    fn script(&self) -> &str {
        &self.descriptor().script
    }
}

pub type MetricsAdapter = dyn RowConverter<Entity = ResourceMetrics>;
pub type SpansAdapter = dyn RowConverter<Entity = ResourceSpans>;

/// Names accepted in `[integration.<id>].adapter`.
pub const KNOWN_ADAPTERS: [&str; 2] = [jvm::ADAPTER_NAME, http_spans::ADAPTER_NAME];

/// All enabled adapters from config, split by payload kind.
#[derive(Default)]
pub struct AdapterSet {
    pub metrics: Vec<Arc<MetricsAdapter>>,
    pub spans: Vec<Arc<SpansAdapter>>,
}

impl AdapterSet {
    pub fn len(&self) -> usize {
        self.metrics.len() + self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Instantiate the built-in adapter named by each enabled integration.
pub fn build_adapters(cfg: &ConfigFile) -> Result<AdapterSet> {
    let mut set = AdapterSet::default();

    for (id, integration) in cfg.enabled_integrations() {
        match integration.adapter.as_str() {
            jvm::ADAPTER_NAME => {
                let adapter = JvmAdapter::new(descriptor(id, integration, jvm::script));
                set.metrics.push(Arc::new(adapter));
            }
            http_spans::ADAPTER_NAME => {
                let adapter = HttpSpansAdapter::new(descriptor(id, integration, http_spans::script));
                set.spans.push(Arc::new(adapter));
            }
            other => {
                return Err(CollectorError::ConfigError(format!(
                    "integration '{id}' uses unknown adapter '{other}'"
                )));
            }
        }
    }

    Ok(set)
}

fn descriptor(
    id: &str,
    integration: &IntegrationConfig,
    default_script: fn(u64) -> String,
) -> IntegrationDescriptor {
    let interval = integration.collect_interval_sec;
    IntegrationDescriptor {
        id: id.to_string(),
        collect_interval_sec: interval,
        script: integration
            .script
            .clone()
            .unwrap_or_else(|| default_script(interval)),
    }
}
