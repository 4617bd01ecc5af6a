// src/engine/supervisor.rs

//! Per-integration supervisor loop.
//!
//! Each cycle:
//! 1. records its start time,
//! 2. launches the script execution on its own Tokio task, with a
//!    cancellation scope derived from the fleet's shutdown token,
//! 3. races the single-slot completion channel against
//!    `start + (interval - 1s)`, cancelling the scope if the deadline wins,
//! 4. logs the outcome (failures never end the loop),
//! 5. sleeps until `start + interval`, or skips the sleep if the cycle
//!    overran.
//!
//! The loop itself runs inside a crash barrier: a panic anywhere in the loop
//! or in an execution task is intercepted, followed by a cooldown and a
//! restart with the same integration. Only the shutdown token ends a worker.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::{sleep, sleep_until, timeout_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::adapter::{ResourceHelper, RowConverter};
use crate::errors::{CollectorError, Result};
use crate::exec::QueryEngine;
use crate::export::Exporter;
use crate::pipeline::{ResultDispatcher, TelemetryEntity};
use crate::types::PayloadKind;

use super::core::{collect_interval, max_execution_time, remaining_sleep};
use super::{CycleOutcome, SupervisorOptions, WorkerContext};

pub struct Supervisor<C: RowConverter + ?Sized> {
    converter: Arc<C>,
    ctx: WorkerContext,
    shutdown: CancellationToken,
    options: SupervisorOptions,
    started_cycles: Arc<AtomicU64>,
    completed_cycles: Arc<AtomicU64>,
}

impl<C: RowConverter + ?Sized> Clone for Supervisor<C> {
    fn clone(&self) -> Self {
        Self {
            converter: Arc::clone(&self.converter),
            ctx: self.ctx.clone(),
            shutdown: self.shutdown.clone(),
            options: self.options,
            started_cycles: Arc::clone(&self.started_cycles),
            completed_cycles: Arc::clone(&self.completed_cycles),
        }
    }
}

impl<C: RowConverter + ?Sized> Supervisor<C> {
    pub fn new(
        converter: Arc<C>,
        ctx: WorkerContext,
        shutdown: CancellationToken,
        options: SupervisorOptions,
    ) -> Self {
        Self {
            converter,
            ctx,
            shutdown,
            options,
            started_cycles: Arc::new(AtomicU64::new(0)),
            completed_cycles: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn id(&self) -> &str {
        self.converter.id()
    }

    pub fn kind(&self) -> PayloadKind {
        <C::Entity as TelemetryEntity>::KIND
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Cycles finished so far, across restarts.
    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles.load(Ordering::Relaxed)
    }

    /// Drive the integration until the shutdown token is cancelled.
    ///
    /// Unexpected faults restart the loop after `options.cooldown`; there is
    /// no retry limit. With `options.max_cycles` set, a faulted cycle still
    /// uses up its slot, so a worker whose last allowed cycle faulted stops
    /// instead of restarting.
    pub async fn run(self) {
        let id = self.id().to_string();
        let kind = self.kind();
        let mut restarts: u64 = 0;

        info!(integration = %id, %kind, interval_secs = self.converter.collect_interval_sec(), "worker started");

        loop {
            let attempt = self.clone();
            let fault = match tokio::spawn(attempt.run_cycles()).await {
                Ok(Ok(())) => break,
                Ok(Err(err)) => err.to_string(),
                Err(join_err) if join_err.is_panic() => panic_message(join_err.into_panic()),
                Err(join_err) => {
                    warn!(integration = %id, %kind, error = %join_err, "worker loop was cancelled");
                    break;
                }
            };

            if self.cycle_limit_reached() {
                warn!(integration = %id, %kind, error = %fault, "unexpected fault in last allowed cycle; not restarting");
                break;
            }

            restarts += 1;
            warn!(integration = %id, %kind, restarts, error = %fault, "unexpected fault in worker loop");
            info!(
                integration = %id,
                %kind,
                cooldown_secs = self.options.cooldown.as_secs_f64(),
                "cooling down before restarting worker loop"
            );

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = sleep(self.options.cooldown) => {}
            }
        }

        info!(integration = %id, %kind, "leaving worker");
    }

    /// The loop proper. `Ok` means the worker should stop; `Err` is an
    /// unexpected fault for the crash barrier.
    async fn run_cycles(self) -> Result<()> {
        let interval = collect_interval(self.converter.collect_interval_sec());

        loop {
            if self.shutdown.is_cancelled() || self.cycle_limit_reached() {
                return Ok(());
            }

            let start = Instant::now();
            self.started_cycles.fetch_add(1, Ordering::Relaxed);
            self.run_cycle(start).await?;
            self.completed_cycles.fetch_add(1, Ordering::Relaxed);

            if self.cycle_limit_reached() {
                return Ok(());
            }

            match remaining_sleep(start.elapsed(), interval) {
                Some(_) => {
                    let next_start = checked_deadline(start, interval)?;
                    tokio::select! {
                        _ = self.shutdown.cancelled() => {}
                        _ = sleep_until(next_start) => {}
                    }
                }
                None => {
                    warn!(
                        integration = %self.id(),
                        kind = %self.kind(),
                        elapsed_secs = start.elapsed().as_secs_f64(),
                        "cycle overran its interval; skipping the sleep"
                    );
                }
            }
        }
    }

    /// Counts started cycles, so one that faulted counts too.
    fn cycle_limit_reached(&self) -> bool {
        match self.options.max_cycles {
            Some(max) => self.started_cycles.load(Ordering::Relaxed) >= max,
            None => false,
        }
    }

    /// One execution raced against its deadline.
    async fn run_cycle(&self, start: Instant) -> Result<CycleOutcome> {
        let id = self.id();
        let kind = self.kind();
        let max_execution = max_execution_time(self.converter.collect_interval_sec());
        let deadline = checked_deadline(start, max_execution)?;

        let scope = self.shutdown.child_token();
        let (done_tx, done_rx) = oneshot::channel::<Result<usize>>();

        let execution = Execution {
            converter: Arc::clone(&self.converter),
            engine: Arc::clone(&self.ctx.engine),
            exporter: Arc::clone(&self.ctx.exporter),
            resources: Arc::clone(&self.ctx.resources),
            scope: scope.clone(),
        };
        tokio::spawn(async move {
            let result = execution.run().await;
            // The receiver is gone if the deadline already fired.
            let _ = done_tx.send(result);
        });

        let outcome = match timeout_at(deadline, done_rx).await {
            Ok(Ok(Ok(entities))) => {
                debug!(integration = %id, %kind, entities, "execution completed successfully");
                CycleOutcome::Exported { entities }
            }
            Ok(Ok(Err(err))) => {
                warn!(integration = %id, %kind, error = %err, "execution failed");
                CycleOutcome::Failed
            }
            Ok(Err(_)) => {
                scope.cancel();
                return Err(CollectorError::Fault(
                    "execution task ended without reporting an outcome".to_string(),
                ));
            }
            Err(_) => {
                scope.cancel();
                warn!(integration = %id, %kind, "execution out of time");
                CycleOutcome::TimedOut
            }
        };

        Ok(outcome)
    }
}

/// Everything one script run needs, owned so it can move onto its own task.
struct Execution<C: RowConverter + ?Sized> {
    converter: Arc<C>,
    engine: Arc<dyn QueryEngine>,
    exporter: Arc<dyn Exporter>,
    resources: Arc<ResourceHelper>,
    scope: CancellationToken,
}

impl<C: RowConverter + ?Sized> Execution<C> {
    /// Execute, stream, and flush once. Returns the number of exported
    /// top-level entities.
    async fn run(self) -> Result<usize> {
        let id = self.converter.id();
        let mut dispatcher = ResultDispatcher::new(Arc::clone(&self.converter), self.resources);

        debug!(integration = %id, "executing script");
        let mut results = self
            .engine
            .execute_script(self.scope.clone(), self.converter.script())
            .await?;

        debug!(integration = %id, "streaming results");
        let streamed = results.stream(&mut dispatcher).await;
        results.close();
        streamed?;

        // A run whose scope was cancelled never flushes, even if the stream
        // happened to finish cleanly.
        if self.scope.is_cancelled() {
            return Err(CollectorError::Cancelled);
        }

        let rows = dispatcher.rows();
        let exported = dispatcher
            .into_accumulator()
            .flush(self.exporter.as_ref())
            .await?;
        debug!(integration = %id, rows, exported, "done streaming results");
        Ok(exported)
    }
}

fn checked_deadline(start: Instant, offset: Duration) -> Result<Instant> {
    start.checked_add(offset).ok_or_else(|| {
        CollectorError::Fault(format!("deadline {offset:?} after cycle start is out of range"))
    })
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic with non-string payload".to_string()
    }
}
