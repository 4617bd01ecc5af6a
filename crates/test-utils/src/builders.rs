#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use scriptcollect::adapter::ResourceHelper;
use scriptcollect::config::{
    ConfigFile, ConfigSection, EngineSection, ExporterSection, IntegrationConfig, RawConfigFile,
};
use scriptcollect::engine::WorkerContext;
use scriptcollect::row::{Row, Value};

use crate::fake_engine::FakeQueryEngine;
use crate::recording_exporter::RecordingExporter;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection {
                    cluster_name: "test-cluster".to_string(),
                    ..ConfigSection::default()
                },
                engine: EngineSection::default(),
                exporter: ExporterSection::default(),
                integration: BTreeMap::new(),
            },
        }
    }

    pub fn with_integration(mut self, id: &str, integration: IntegrationConfig) -> Self {
        self.config.integration.insert(id.to_string(), integration);
        self
    }

    pub fn with_cluster_id(mut self, id: &str) -> Self {
        self.config.config.cluster_id = Some(id.to_string());
        self
    }

    pub fn with_cooldown_sec(mut self, secs: u64) -> Self {
        self.config.config.cooldown_sec = secs;
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `IntegrationConfig`.
pub struct IntegrationConfigBuilder {
    integration: IntegrationConfig,
}

impl IntegrationConfigBuilder {
    pub fn new(adapter: &str) -> Self {
        Self {
            integration: IntegrationConfig {
                adapter: adapter.to_string(),
                collect_interval_sec: 10,
                enabled: true,
                script: None,
            },
        }
    }

    pub fn interval(mut self, secs: u64) -> Self {
        self.integration.collect_interval_sec = secs;
        self
    }

    pub fn enabled(mut self, val: bool) -> Self {
        self.integration.enabled = val;
        self
    }

    pub fn script(mut self, script: &str) -> Self {
        self.integration.script = Some(script.to_string());
        self
    }

    pub fn build(self) -> IntegrationConfig {
        self.integration
    }
}

/// A `WorkerContext` over a fake engine and a recording exporter.
pub fn fake_context(engine: &FakeQueryEngine, exporter: &RecordingExporter) -> WorkerContext {
    WorkerContext {
        engine: Arc::new(engine.clone()),
        exporter: Arc::new(exporter.clone()),
        resources: Arc::new(ResourceHelper::new("test-cluster", Some("cluster-id".to_string()))),
    }
}

/// Row with a numeric `value` and the usual Kubernetes columns.
pub fn gauge_row(value: f64) -> Row {
    Row::new()
        .with("value", Value::Float64(value))
        .with("pod", Value::String("default/app-0".to_string()))
        .with("namespace", Value::String("default".to_string()))
}

/// A full JVM row as the `jvm` adapter expects it.
pub fn jvm_row(time_ns: i64) -> Row {
    Row::new()
        .with("time_", Value::Time64Ns(time_ns))
        .with("container", Value::String("app".to_string()))
        .with("pod", Value::String("default/app-0".to_string()))
        .with("service", Value::String("default/app".to_string()))
        .with("namespace", Value::String("default".to_string()))
        .with("young_gc_time", Value::Float64(12.5))
        .with("full_gc_time", Value::Float64(0.0))
        .with("used_heap_size", Value::Int64(64 * 1024 * 1024))
        .with("total_heap_size", Value::Int64(128 * 1024 * 1024))
        .with("max_heap_size", Value::Int64(256 * 1024 * 1024))
}
