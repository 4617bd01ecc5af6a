use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use scriptcollect::errors::{CollectorError, Result};
use scriptcollect::exec::{ExecFuture, QueryEngine, RowSink, ScriptResults};
use scriptcollect::row::Row;

/// What one script execution does.
#[derive(Debug, Clone)]
pub enum RunScript {
    /// Stream these rows, then end cleanly.
    Rows(Vec<Row>),
    /// Stream these rows, then fail with a streaming error.
    RowsThenError(Vec<Row>, String),
    /// Fail before any handle is returned.
    ExecuteError(String),
    /// Stream these rows, then never finish until cancelled.
    RowsThenHang(Vec<Row>),
    /// Wait `delay` (cancellable), then stream the rows.
    Delayed(Duration, Vec<Row>),
}

/// A scripted query engine that:
/// - records every execution (start instant + script text)
/// - plays back `RunScript`s in order, repeating the last one forever
/// - records when a cancellation was observed and how often `close` ran.
#[derive(Clone)]
pub struct FakeQueryEngine {
    runs: Arc<Vec<RunScript>>,
    log: Arc<EngineLog>,
}

#[derive(Default)]
pub struct EngineLog {
    calls: Mutex<Vec<(Instant, String)>>,
    cancellations: Mutex<Vec<Instant>>,
    closes: AtomicUsize,
}

impl FakeQueryEngine {
    pub fn new(runs: Vec<RunScript>) -> Self {
        assert!(!runs.is_empty(), "FakeQueryEngine needs at least one RunScript");
        Self {
            runs: Arc::new(runs),
            log: Arc::new(EngineLog::default()),
        }
    }

    pub fn always(run: RunScript) -> Self {
        Self::new(vec![run])
    }

    pub fn call_count(&self) -> usize {
        self.log.calls.lock().unwrap().len()
    }

    pub fn call_instants(&self) -> Vec<Instant> {
        self.log.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.log.calls.lock().unwrap().iter().map(|(_, s)| s.clone()).collect()
    }

    pub fn cancellation_instants(&self) -> Vec<Instant> {
        self.log.cancellations.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.log.closes.load(Ordering::SeqCst)
    }
}

impl QueryEngine for FakeQueryEngine {
    fn execute_script<'a>(
        &'a self,
        cancel: CancellationToken,
        script: &'a str,
    ) -> ExecFuture<'a, Box<dyn ScriptResults>> {
        let run = {
            let mut calls = self.log.calls.lock().unwrap();
            let index = calls.len().min(self.runs.len() - 1);
            calls.push((Instant::now(), script.to_string()));
            debug!(call = calls.len(), ?script, "fake engine executing script");
            self.runs[index].clone()
        };
        let log = Arc::clone(&self.log);

        Box::pin(async move {
            if let RunScript::ExecuteError(msg) = run {
                return Err(CollectorError::Execution(msg));
            }
            Ok(Box::new(FakeResults {
                run,
                cancel,
                log,
                closed: false,
            }) as Box<dyn ScriptResults>)
        })
    }
}

struct FakeResults {
    run: RunScript,
    cancel: CancellationToken,
    log: Arc<EngineLog>,
    closed: bool,
}

impl FakeResults {
    async fn wait_for_cancel(&self) -> Result<()> {
        self.cancel.cancelled().await;
        self.log.cancellations.lock().unwrap().push(Instant::now());
        Err(CollectorError::Cancelled)
    }

    fn push_rows(rows: &[Row], sink: &mut dyn RowSink) -> Result<()> {
        for row in rows {
            sink.on_row(row.clone())?;
        }
        Ok(())
    }
}

impl ScriptResults for FakeResults {
    fn stream<'a>(&'a mut self, sink: &'a mut dyn RowSink) -> ExecFuture<'a, ()> {
        Box::pin(async move {
            match self.run.clone() {
                RunScript::Rows(rows) => Self::push_rows(&rows, sink),
                RunScript::RowsThenError(rows, msg) => {
                    Self::push_rows(&rows, sink)?;
                    Err(CollectorError::Streaming(msg))
                }
                RunScript::ExecuteError(msg) => Err(CollectorError::Execution(msg)),
                RunScript::RowsThenHang(rows) => {
                    Self::push_rows(&rows, sink)?;
                    self.wait_for_cancel().await
                }
                RunScript::Delayed(delay, rows) => {
                    tokio::select! {
                        res = self.wait_for_cancel() => res,
                        _ = tokio::time::sleep(delay) => Self::push_rows(&rows, sink),
                    }
                }
            }
        })
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.log.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}
