// src/lib.rs

pub mod adapter;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod row;
pub mod telemetry;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::adapter::{build_adapters, ResourceHelper};
use crate::cli::CliArgs;
use crate::config::loader::{default_config_path, load_and_validate};
use crate::config::model::ConfigFile;
use crate::engine::{Fleet, SupervisorOptions, WorkerContext};
use crate::exec::CommandQueryEngine;
use crate::export::build_exporter;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - adapters, query engine and exporter
/// - one supervisor per integration
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let mut cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    cfg.restrict_to(&args.only)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let adapters = build_adapters(&cfg)?;
    let ctx = WorkerContext {
        engine: Arc::new(CommandQueryEngine::from_config(&cfg.engine)),
        exporter: build_exporter(&cfg.exporter)?,
        resources: Arc::new(ResourceHelper::new(
            cfg.config.cluster_name.clone(),
            cfg.config.cluster_id.clone(),
        )),
    };
    info!(
        exporter = ctx.exporter.name(),
        cluster = %cfg.config.cluster_name,
        integrations = adapters.len(),
        "starting collector"
    );

    let options = SupervisorOptions {
        cooldown: Duration::from_secs(cfg.config.cooldown_sec),
        max_cycles: args.once.then_some(1),
    };
    let fleet = Fleet::launch(&adapters, ctx, options);

    // Ctrl-C → broadcast shutdown; workers stop between cycles.
    {
        let token = fleet.shutdown_token();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            info!("shutdown requested");
            token.cancel();
        });
    }

    fleet.wait().await;
    info!("collector exiting");
    Ok(())
}

/// Simple dry-run output: print integrations and their settings.
fn print_dry_run(cfg: &ConfigFile) {
    println!("scriptcollect dry-run");
    println!("  config.cluster_name = {}", cfg.config.cluster_name);
    if let Some(ref id) = cfg.config.cluster_id {
        println!("  config.cluster_id = {id}");
    }
    println!("  config.cooldown_sec = {}", cfg.config.cooldown_sec);
    println!("  engine = {} {:?}", cfg.engine.cmd, cfg.engine.args);
    println!("  exporter.kind = {:?}", cfg.exporter.kind);
    if let Some(ref endpoint) = cfg.exporter.endpoint {
        println!("  exporter.endpoint = {endpoint}");
    }
    println!();

    println!("integrations ({}):", cfg.integration.len());
    for (id, integration) in cfg.integration.iter() {
        println!("  - {id}");
        println!("      adapter: {}", integration.adapter);
        println!("      collect_interval_sec: {}", integration.collect_interval_sec);
        if !integration.enabled {
            println!("      enabled: false");
        }
        if integration.script.is_some() {
            println!("      script: (override)");
        }
    }

    debug!("dry-run complete (no execution)");
}
