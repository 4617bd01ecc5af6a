// src/pipeline/mod.rs

//! Streaming result pipeline: rows in, one flushed batch out per run.
//!
//! - [`dispatcher`] is the row sink handed to the query engine.
//! - [`accumulator`] owns the run's batch until it is flushed.

pub mod accumulator;
pub mod dispatcher;

pub use accumulator::{Accumulator, MetricsRun, SpansRun, TelemetryEntity};
pub use dispatcher::ResultDispatcher;
