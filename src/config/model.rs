// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::errors::{CollectorError, Result};
use crate::types::ExporterKind;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// cluster_name = "prod-eu"
/// cooldown_sec = 10
///
/// [engine]
/// cmd = "px"
/// args = ["run", "-o", "json", "-f", "-"]
///
/// [exporter]
/// kind = "otlp_http"
/// endpoint = "https://otlp.example.com:4318"
/// headers = { "api-key" = "..." }
///
/// [integration.jvm]
/// adapter = "jvm"
/// collect_interval_sec = 10
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub engine: EngineSection,

    #[serde(default)]
    pub exporter: ExporterSection,

    /// All integrations from `[integration.<id>]`, keyed by identifier.
    #[serde(default)]
    pub integration: BTreeMap<String, IntegrationConfig>,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub engine: EngineSection,
    pub exporter: ExporterSection,
    pub integration: BTreeMap<String, IntegrationConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            config: raw.config,
            engine: raw.engine,
            exporter: raw.exporter,
            integration: raw.integration,
        }
    }

    pub fn enabled_integrations(&self) -> impl Iterator<Item = (&str, &IntegrationConfig)> {
        self.integration
            .iter()
            .filter(|(_, i)| i.enabled)
            .map(|(id, i)| (id.as_str(), i))
    }

    /// Disable every integration not named in `ids`. An empty list keeps the
    /// config as is.
    ///
    /// Fails on an unknown id, or if nothing enabled is left.
    pub fn restrict_to(&mut self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        if let Some(unknown) = ids.iter().find(|id| !self.integration.contains_key(id.as_str())) {
            return Err(CollectorError::ConfigError(format!(
                "--only names unknown integration '{unknown}'"
            )));
        }

        for (id, integration) in self.integration.iter_mut() {
            if !ids.contains(id) {
                integration.enabled = false;
            }
        }

        if self.enabled_integrations().next().is_none() {
            return Err(CollectorError::ConfigError(format!(
                "every integration selected by --only is disabled: {ids:?}"
            )));
        }
        Ok(())
    }
}

/// `[config]` section: cluster identity and supervisor behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Stamped on every resource as `k8s.cluster.name`.
    #[serde(default)]
    pub cluster_name: String,

    #[serde(default)]
    pub cluster_id: Option<String>,

    /// Seconds to wait before restarting a worker loop after a fault.
    #[serde(default = "default_cooldown_sec")]
    pub cooldown_sec: u64,
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            cluster_name: String::new(),
            cluster_id: None,
            cooldown_sec: default_cooldown_sec(),
        }
    }
}

fn default_cooldown_sec() -> u64 {
    10
}

/// `[engine]` section: the query CLI. The script is piped to its stdin.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
    #[serde(default = "default_engine_cmd")]
    pub cmd: String,

    #[serde(default = "default_engine_args")]
    pub args: Vec<String>,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            cmd: default_engine_cmd(),
            args: default_engine_args(),
        }
    }
}

fn default_engine_cmd() -> String {
    "px".to_string()
}

fn default_engine_args() -> Vec<String> {
    ["run", "-o", "json", "-f", "-"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// `[exporter]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ExporterSection {
    #[serde(default)]
    pub kind: ExporterKind,

    /// Base URL for `otlp_http`; `/v1/metrics` and `/v1/traces` are appended.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Extra request headers, e.g. an API key.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default = "default_exporter_timeout_sec")]
    pub timeout_sec: u64,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            kind: ExporterKind::default(),
            endpoint: None,
            headers: BTreeMap::new(),
            timeout_sec: default_exporter_timeout_sec(),
        }
    }
}

fn default_exporter_timeout_sec() -> u64 {
    10
}

/// `[integration.<id>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct IntegrationConfig {
    /// Built-in adapter name (`"jvm"`, `"http_spans"`).
    pub adapter: String,

    #[serde(default = "default_collect_interval_sec")]
    pub collect_interval_sec: u64,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Replaces the adapter's default script text.
    #[serde(default)]
    pub script: Option<String>,
}

fn default_collect_interval_sec() -> u64 {
    10
}

fn default_enabled() -> bool {
    true
}
