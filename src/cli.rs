// src/cli.rs

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "scriptcollect",
    version,
    about = "Run analytics scripts on a fixed cadence and export the rows as OpenTelemetry metrics and spans.",
    long_about = None
)]
pub struct CliArgs {
    /// Config file (TOML).
    ///
    /// Falls back to `$SCRIPTCOLLECT_CONFIG`, then `scriptcollect.toml` in the
    /// working directory.
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run only these integrations (repeatable). Every other integration is
    /// treated as disabled.
    #[arg(long = "only", value_name = "ID")]
    pub only: Vec<String>,

    /// One cycle per integration, then exit.
    #[arg(long)]
    pub once: bool,

    /// Overrides `SCRIPTCOLLECT_LOG`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate the config and print the integrations without running any
    /// script.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
