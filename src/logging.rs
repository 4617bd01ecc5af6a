// src/logging.rs

//! `tracing` subscriber setup.
//!
//! The filter is resolved in this order:
//! 1. `--log-level` on the command line, applied to every target;
//! 2. `SCRIPTCOLLECT_LOG`, which takes either a bare level (`debug`) or a
//!    full `EnvFilter` directive list (`scriptcollect=debug,reqwest=warn`);
//! 3. `info`.
//!
//! Output goes to stderr: the stdout exporter owns stdout.

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "SCRIPTCOLLECT_LOG";

/// Install the global subscriber. Call once, before the fleet starts.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => EnvFilter::default().add_directive(LevelFilter::from(Level::from(level)).into()),
        None => filter_from_env(std::env::var(LOG_ENV_VAR).ok().as_deref())?,
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))?;

    Ok(())
}

/// Filter for the raw value of `SCRIPTCOLLECT_LOG`; unset or blank means `info`.
pub fn filter_from_env(value: Option<&str>) -> Result<EnvFilter> {
    let Some(raw) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(EnvFilter::new("info"));
    };

    if let Some(level) = parse_level_str(raw) {
        return Ok(EnvFilter::default().add_directive(LevelFilter::from(level).into()));
    }
    EnvFilter::try_new(raw).with_context(|| format!("invalid {LOG_ENV_VAR} value '{raw}'"))
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Accepts `warning` as an alias for `warn`; case-insensitive.
pub fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
