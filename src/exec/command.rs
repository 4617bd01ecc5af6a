// src/exec/command.rs

//! Query engine backed by a CLI child process.
//!
//! The script is written to the child's stdin; every stdout line is decoded
//! as one result row. Stderr is drained and logged at debug so the pipe never
//! fills up.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::model::EngineSection;
use crate::errors::{CollectorError, Result};

use super::rows::decode_line;
use super::{ExecFuture, QueryEngine, RowSink, ScriptResults};

#[derive(Debug, Clone)]
pub struct CommandQueryEngine {
    cmd: String,
    args: Vec<String>,
}

impl CommandQueryEngine {
    pub fn new(cmd: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            cmd: cmd.into(),
            args,
        }
    }

    pub fn from_config(cfg: &EngineSection) -> Self {
        Self::new(cfg.cmd.clone(), cfg.args.clone())
    }

    async fn spawn(&self, cancel: CancellationToken, script: &str) -> Result<CommandResults> {
        if cancel.is_cancelled() {
            return Err(CollectorError::Cancelled);
        }

        let mut cmd = Command::new(&self.cmd);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            CollectorError::Execution(format!("spawning query command '{}': {e}", self.cmd))
        })?;

        // Feed the script from a separate task so a chatty child can't
        // deadlock against a full stdout pipe.
        if let Some(mut stdin) = child.stdin.take() {
            let script = script.to_string();
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(script.as_bytes()).await {
                    debug!(error = %e, "failed to write script to query command stdin");
                }
                // Dropping stdin closes the pipe and signals end of script.
            });
        }

        if let Some(stderr) = child.stderr.take() {
            let cmd_name = self.cmd.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(cmd = %cmd_name, "stderr: {}", line);
                }
            });
        }

        let stdout = child.stdout.take().ok_or_else(|| {
            CollectorError::Execution("query command has no stdout pipe".to_string())
        })?;

        Ok(CommandResults {
            child,
            lines: BufReader::new(stdout).lines(),
            cancel,
            closed: false,
        })
    }
}

impl QueryEngine for CommandQueryEngine {
    fn execute_script<'a>(
        &'a self,
        cancel: CancellationToken,
        script: &'a str,
    ) -> ExecFuture<'a, Box<dyn ScriptResults>> {
        Box::pin(async move {
            let results = self.spawn(cancel, script).await?;
            Ok(Box::new(results) as Box<dyn ScriptResults>)
        })
    }
}

/// Results of one child process run.
pub struct CommandResults {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
    cancel: CancellationToken,
    closed: bool,
}

impl CommandResults {
    async fn stream_inner(&mut self, sink: &mut dyn RowSink) -> Result<()> {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    self.kill().await;
                    return Err(CollectorError::Cancelled);
                }
                line = self.lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            if let Some(row) = decode_line(&line)? {
                                sink.on_row(row)?;
                            }
                        }
                        Ok(None) => break,
                        Err(e) => {
                            return Err(CollectorError::Streaming(format!(
                                "reading query command output: {e}"
                            )));
                        }
                    }
                }
            }
        }

        let status = tokio::select! {
            _ = self.cancel.cancelled() => {
                self.kill().await;
                return Err(CollectorError::Cancelled);
            }
            status = self.child.wait() => status.map_err(|e| {
                CollectorError::Streaming(format!("waiting for query command: {e}"))
            })?,
        };

        if !status.success() {
            return Err(CollectorError::Streaming(format!(
                "query command exited with {status}"
            )));
        }
        Ok(())
    }

    async fn kill(&mut self) {
        if let Err(e) = self.child.kill().await {
            warn!(error = %e, "failed to kill query command on cancellation");
        }
    }
}

impl ScriptResults for CommandResults {
    fn stream<'a>(&'a mut self, sink: &'a mut dyn RowSink) -> ExecFuture<'a, ()> {
        Box::pin(self.stream_inner(sink))
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        // Already-exited children make this a no-op error; nothing to report.
        let _ = self.child.start_kill();
    }
}
