// src/exec/mod.rs

//! Query execution layer.
//!
//! This module defines the boundary between the scheduler and whatever
//! actually runs analytics scripts:
//!
//! - [`QueryEngine`] starts a script and hands back a [`ScriptResults`]
//!   handle.
//! - [`ScriptResults::stream`] pushes every result row into a [`RowSink`]
//!   until the server-side stream ends or fails; [`ScriptResults::close`]
//!   releases the handle and is always called once a handle exists.
//! - [`command`] provides `CommandQueryEngine`, which runs a query CLI as a
//!   child process and reads JSON rows from its stdout. Tests replace it
//!   with a scripted fake.
//! - [`rows`] decodes JSON lines into [`Row`]s.

pub mod command;
pub mod rows;

use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::errors::Result;
use crate::row::Row;

pub use command::CommandQueryEngine;

pub type ExecFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Receives rows as they are streamed.
///
/// Returning an error aborts the remainder of the stream.
pub trait RowSink: Send {
    fn on_row(&mut self, row: Row) -> Result<()>;
}

/// Handle to one in-flight script execution.
pub trait ScriptResults: Send {
    /// Deliver every row to `sink`, in order, until the stream ends (`Ok`) or
    /// fails. Returns early with an error once the execution's cancellation
    /// scope fires.
    fn stream<'a>(&'a mut self, sink: &'a mut dyn RowSink) -> ExecFuture<'a, ()>;

    /// Release resources held by the execution. Idempotent.
    fn close(&mut self);
}

/// Something that can run an analytics script.
///
/// Must be shareable: every worker in the fleet holds the same engine.
pub trait QueryEngine: Send + Sync {
    fn execute_script<'a>(
        &'a self,
        cancel: CancellationToken,
        script: &'a str,
    ) -> ExecFuture<'a, Box<dyn ScriptResults>>;
}
