// src/config/validate.rs

use crate::adapter::KNOWN_ADAPTERS;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::engine::core::MAX_COLLECT_INTERVAL_SEC;
use crate::errors::{CollectorError, Result};
use crate::types::ExporterKind;

/// Smallest interval that leaves a positive execution deadline
/// (`interval - 1s`).
pub const MIN_COLLECT_INTERVAL_SEC: u64 = 2;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = CollectorError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_global_config(cfg)?;
    validate_engine(cfg)?;
    validate_exporter(cfg)?;
    ensure_has_integrations(cfg)?;
    validate_integrations(cfg)?;
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.cluster_name.trim().is_empty() {
        return Err(CollectorError::ConfigError(
            "[config].cluster_name must be set".to_string(),
        ));
    }
    if cfg.config.cooldown_sec == 0 {
        return Err(CollectorError::ConfigError(
            "[config].cooldown_sec must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_engine(cfg: &RawConfigFile) -> Result<()> {
    if cfg.engine.cmd.trim().is_empty() {
        return Err(CollectorError::ConfigError(
            "[engine].cmd must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_exporter(cfg: &RawConfigFile) -> Result<()> {
    if cfg.exporter.kind == ExporterKind::OtlpHttp {
        match cfg.exporter.endpoint.as_deref() {
            Some(endpoint) if endpoint.starts_with("http://") || endpoint.starts_with("https://") => {}
            Some(endpoint) => {
                return Err(CollectorError::ConfigError(format!(
                    "[exporter].endpoint must be an http(s) URL (got '{endpoint}')"
                )));
            }
            None => {
                return Err(CollectorError::ConfigError(
                    "[exporter].endpoint is required when kind = \"otlp_http\"".to_string(),
                ));
            }
        }
    }
    if cfg.exporter.timeout_sec == 0 {
        return Err(CollectorError::ConfigError(
            "[exporter].timeout_sec must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn ensure_has_integrations(cfg: &RawConfigFile) -> Result<()> {
    if !cfg.integration.values().any(|i| i.enabled) {
        return Err(CollectorError::ConfigError(
            "config must contain at least one enabled [integration.<id>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_integrations(cfg: &RawConfigFile) -> Result<()> {
    for (id, integration) in cfg.integration.iter() {
        if id.trim().is_empty() {
            return Err(CollectorError::ConfigError(
                "integration identifiers must not be empty".to_string(),
            ));
        }
        if !KNOWN_ADAPTERS.contains(&integration.adapter.as_str()) {
            return Err(CollectorError::ConfigError(format!(
                "integration '{}' uses unknown adapter '{}' (expected one of {:?})",
                id, integration.adapter, KNOWN_ADAPTERS
            )));
        }
        if integration.collect_interval_sec < MIN_COLLECT_INTERVAL_SEC {
            return Err(CollectorError::ConfigError(format!(
                "integration '{}' has collect_interval_sec = {}; must be >= {}",
                id, integration.collect_interval_sec, MIN_COLLECT_INTERVAL_SEC
            )));
        }
        if integration.collect_interval_sec > MAX_COLLECT_INTERVAL_SEC {
            return Err(CollectorError::ConfigError(format!(
                "integration '{}' has collect_interval_sec = {}; must be <= {}",
                id, integration.collect_interval_sec, MAX_COLLECT_INTERVAL_SEC
            )));
        }
        if let Some(ref script) = integration.script {
            if script.trim().is_empty() {
                return Err(CollectorError::ConfigError(format!(
                    "integration '{}' has an empty script override",
                    id
                )));
            }
        }
    }
    Ok(())
}
