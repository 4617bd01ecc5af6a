// src/engine/mod.rs

//! Execution scheduler for scriptcollect.
//!
//! This module ties together:
//! - the per-integration supervisor loop (cadence, deadline, crash barrier)
//! - the fleet driver that runs one supervisor per integration and waits
//!   for all of them on shutdown
//!
//! The pure cadence arithmetic lives in [`core`]; the async loop is in
//! [`supervisor`]; [`fleet`] owns the shared shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use crate::adapter::ResourceHelper;
use crate::export::Exporter;
use crate::exec::QueryEngine;

/// Outcome of a single run as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Stream drained and the batch was flushed.
    Exported { entities: usize },
    /// Execution, streaming, conversion or export failed; nothing flushed.
    Failed,
    /// The deadline fired first and the execution was cancelled.
    TimedOut,
}

/// Collaborators shared, read-only, by every worker in the fleet.
#[derive(Clone)]
pub struct WorkerContext {
    pub engine: Arc<dyn QueryEngine>,
    pub exporter: Arc<dyn Exporter>,
    pub resources: Arc<ResourceHelper>,
}

/// Knobs for a supervisor loop.
#[derive(Debug, Clone, Copy)]
pub struct SupervisorOptions {
    /// Pause between an intercepted fault and the loop restart.
    pub cooldown: Duration,
    /// Stop after this many cycles (used for `--once`). `None` runs until
    /// shutdown.
    pub max_cycles: Option<u64>,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            cooldown: self::core::DEFAULT_CRASH_COOLDOWN,
            max_cycles: None,
        }
    }
}

pub mod core;
pub mod fleet;
pub mod supervisor;

pub use fleet::Fleet;
pub use supervisor::Supervisor;
