// src/engine/fleet.rs

//! Fleet driver: one supervisor per integration, one shared shutdown signal.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

use crate::adapter::{AdapterSet, RowConverter};

use super::{Supervisor, SupervisorOptions, WorkerContext};

/// Runs supervisors concurrently and waits for them to quiesce.
///
/// Every worker is spawned on a [`TaskTracker`], which counts it out exactly
/// once when its loop returns.
#[derive(Debug)]
pub struct Fleet {
    shutdown: CancellationToken,
    tracker: TaskTracker,
    workers: usize,
}

impl Fleet {
    pub fn new(shutdown: CancellationToken) -> Self {
        Self {
            shutdown,
            tracker: TaskTracker::new(),
            workers: 0,
        }
    }

    /// Start one worker per adapter.
    pub fn launch(adapters: &AdapterSet, ctx: WorkerContext, options: SupervisorOptions) -> Self {
        let mut fleet = Self::new(CancellationToken::new());
        for adapter in &adapters.metrics {
            fleet.spawn(Arc::clone(adapter), ctx.clone(), options);
        }
        for adapter in &adapters.spans {
            fleet.spawn(Arc::clone(adapter), ctx.clone(), options);
        }
        info!(workers = fleet.workers, "fleet started");
        fleet
    }

    /// Spawn a supervisor for `converter` under this fleet's shutdown signal.
    pub fn spawn<C: RowConverter + ?Sized>(
        &mut self,
        converter: Arc<C>,
        ctx: WorkerContext,
        options: SupervisorOptions,
    ) {
        let supervisor = Supervisor::new(converter, ctx, self.shutdown.clone(), options);
        debug!(integration = %supervisor.id(), kind = %supervisor.kind(), "spawning worker");
        self.tracker.spawn(supervisor.run());
        self.workers += 1;
    }

    pub fn len(&self) -> usize {
        self.workers
    }

    pub fn is_empty(&self) -> bool {
        self.workers == 0
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Wait until every worker has exited (on its own or via shutdown).
    pub async fn wait(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        info!(workers = self.workers, "all workers finished");
    }

    /// Broadcast shutdown, then wait for every worker. Safe to call twice.
    pub async fn shutdown(&self) {
        info!("shutting down fleet");
        self.shutdown.cancel();
        self.wait().await;
    }
}
