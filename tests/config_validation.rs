// tests/config_validation.rs

mod common;
use crate::common::builders::{ConfigFileBuilder, IntegrationConfigBuilder};

use std::io::Write;

use tempfile::NamedTempFile;

use scriptcollect::config::model::ConfigFile;
use scriptcollect::config::{load_and_validate, load_from_str};
use scriptcollect::errors::CollectorError;
use scriptcollect::types::ExporterKind;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn expect_config_error(contents: &str) -> String {
    let file = write_config(contents);
    match load_and_validate(file.path()) {
        Err(CollectorError::ConfigError(msg)) => msg,
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn minimal_config_gets_defaults() {
    let file = write_config(
        r#"
[config]
cluster_name = "prod-eu"

[integration.jvm]
adapter = "jvm"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.config.cluster_name, "prod-eu");
    assert_eq!(cfg.config.cluster_id, None);
    assert_eq!(cfg.config.cooldown_sec, 10);
    assert_eq!(cfg.engine.cmd, "px");
    assert_eq!(cfg.engine.args, vec!["run", "-o", "json", "-f", "-"]);
    assert_eq!(cfg.exporter.kind, ExporterKind::Stdout);
    assert_eq!(cfg.exporter.timeout_sec, 10);

    let jvm = &cfg.integration["jvm"];
    assert_eq!(jvm.collect_interval_sec, 10);
    assert!(jvm.enabled);
    assert!(jvm.script.is_none());
}

#[test]
fn full_config_round_trips_every_section() {
    let file = write_config(
        r#"
[config]
cluster_name = "prod-eu"
cluster_id = "c-123"
cooldown_sec = 30

[engine]
cmd = "/usr/local/bin/px"
args = ["run", "-f", "-"]

[exporter]
kind = "otlp_http"
endpoint = "https://otlp.example.com:4318"
headers = { "api-key" = "secret" }
timeout_sec = 5

[integration.jvm]
adapter = "jvm"
collect_interval_sec = 20

[integration.http]
adapter = "http_spans"
collect_interval_sec = 15
script = "px.display(px.DataFrame('http_events'))"

[integration.old]
adapter = "jvm"
enabled = false
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.config.cluster_id.as_deref(), Some("c-123"));
    assert_eq!(cfg.config.cooldown_sec, 30);
    assert_eq!(cfg.engine.cmd, "/usr/local/bin/px");
    assert_eq!(cfg.exporter.kind, ExporterKind::OtlpHttp);
    assert_eq!(cfg.exporter.headers.get("api-key").map(String::as_str), Some("secret"));

    let enabled: Vec<&str> = cfg.enabled_integrations().map(|(id, _)| id).collect();
    assert_eq!(enabled, vec!["http", "jvm"]);
}

#[test]
fn missing_cluster_name_is_rejected() {
    let msg = expect_config_error(
        r#"
[integration.jvm]
adapter = "jvm"
"#,
    );
    assert!(msg.contains("cluster_name"));
}

#[test]
fn unknown_adapter_is_rejected() {
    let msg = expect_config_error(
        r#"
[config]
cluster_name = "c"

[integration.redis]
adapter = "redis"
"#,
    );
    assert!(msg.contains("redis"));
    assert!(msg.contains("unknown adapter"));
}

#[test]
fn interval_below_two_seconds_is_rejected() {
    let msg = expect_config_error(
        r#"
[config]
cluster_name = "c"

[integration.jvm]
adapter = "jvm"
collect_interval_sec = 1
"#,
    );
    assert!(msg.contains("collect_interval_sec"));
    assert!(msg.contains("jvm"));
}

#[test]
fn interval_above_one_day_is_rejected() {
    let msg = expect_config_error(
        r#"
[config]
cluster_name = "c"

[integration.jvm]
adapter = "jvm"
collect_interval_sec = 86401
"#,
    );
    assert!(msg.contains("collect_interval_sec"));
    assert!(msg.contains("<= 86400"));

    let raw = ConfigFileBuilder::new()
        .with_integration("jvm", IntegrationConfigBuilder::new("jvm").interval(u64::MAX).build())
        .build_raw();
    assert!(matches!(
        ConfigFile::try_from(raw),
        Err(CollectorError::ConfigError(_))
    ));

    let raw = ConfigFileBuilder::new()
        .with_integration("jvm", IntegrationConfigBuilder::new("jvm").interval(86_400).build())
        .build_raw();
    assert!(ConfigFile::try_from(raw).is_ok());
}

#[test]
fn otlp_http_requires_endpoint() {
    let msg = expect_config_error(
        r#"
[config]
cluster_name = "c"

[exporter]
kind = "otlp_http"

[integration.jvm]
adapter = "jvm"
"#,
    );
    assert!(msg.contains("endpoint"));
}

#[test]
fn otlp_http_endpoint_must_be_http_url() {
    let msg = expect_config_error(
        r#"
[config]
cluster_name = "c"

[exporter]
kind = "otlp_http"
endpoint = "otlp.example.com:4318"

[integration.jvm]
adapter = "jvm"
"#,
    );
    assert!(msg.contains("http(s)"));
}

#[test]
fn config_without_enabled_integrations_is_rejected() {
    let msg = expect_config_error(
        r#"
[config]
cluster_name = "c"

[integration.jvm]
adapter = "jvm"
enabled = false
"#,
    );
    assert!(msg.contains("at least one enabled"));
}

#[test]
fn empty_script_override_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_integration("jvm", IntegrationConfigBuilder::new("jvm").script("  ").build())
        .build_raw();
    match ConfigFile::try_from(raw) {
        Err(CollectorError::ConfigError(msg)) => assert!(msg.contains("empty script")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn zero_cooldown_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_cooldown_sec(0)
        .with_integration("jvm", IntegrationConfigBuilder::new("jvm").build())
        .build_raw();
    assert!(matches!(
        ConfigFile::try_from(raw),
        Err(CollectorError::ConfigError(_))
    ));
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let result = load_from_str("[config\ncluster_name = ");
    assert!(matches!(result, Err(CollectorError::TomlError(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_and_validate(dir.path().join("nope.toml"));
    assert!(matches!(result, Err(CollectorError::IoError(_))));
}

#[test]
fn only_flag_disables_everything_else() {
    let mut cfg = ConfigFileBuilder::new()
        .with_integration("jvm", IntegrationConfigBuilder::new("jvm").build())
        .with_integration("http", IntegrationConfigBuilder::new("http_spans").build())
        .build();

    cfg.restrict_to(&["http".to_string()]).unwrap();
    let enabled: Vec<&str> = cfg.enabled_integrations().map(|(id, _)| id).collect();
    assert_eq!(enabled, vec!["http"]);
}

#[test]
fn only_flag_rejects_unknown_or_disabled_selection() {
    let mut cfg = ConfigFileBuilder::new()
        .with_integration("jvm", IntegrationConfigBuilder::new("jvm").build())
        .with_integration("old", IntegrationConfigBuilder::new("jvm").enabled(false).build())
        .build();

    let err = cfg.clone().restrict_to(&["redis".to_string()]).unwrap_err();
    assert!(matches!(err, CollectorError::ConfigError(ref msg) if msg.contains("redis")));

    let err = cfg.restrict_to(&["old".to_string()]).unwrap_err();
    assert!(matches!(err, CollectorError::ConfigError(ref msg) if msg.contains("disabled")));
}

#[test]
fn config_path_precedence() {
    use std::path::PathBuf;
    use scriptcollect::config::resolve_config_path;

    let flag = Some(PathBuf::from("flag.toml"));
    let env = Some(PathBuf::from("env.toml"));

    assert_eq!(resolve_config_path(flag.clone(), env.clone()), PathBuf::from("flag.toml"));
    assert_eq!(resolve_config_path(None, env), PathBuf::from("env.toml"));
    assert_eq!(resolve_config_path(None, Some(PathBuf::new())), PathBuf::from("scriptcollect.toml"));
    assert_eq!(resolve_config_path(None, None), PathBuf::from("scriptcollect.toml"));
}
