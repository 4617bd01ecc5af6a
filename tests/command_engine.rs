// tests/command_engine.rs
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout};

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use scriptcollect::errors::{CollectorError, Result};
use scriptcollect::exec::{CommandQueryEngine, QueryEngine, RowSink};
use scriptcollect::row::{Row, Value};

#[derive(Default)]
struct CollectingSink {
    rows: Vec<Row>,
}

impl RowSink for CollectingSink {
    fn on_row(&mut self, row: Row) -> Result<()> {
        self.rows.push(row);
        Ok(())
    }
}

fn shell(script: &str) -> CommandQueryEngine {
    CommandQueryEngine::new("sh", vec!["-c".to_string(), script.to_string()])
}

#[tokio::test]
async fn streams_json_lines_from_child() {
    init_tracing();

    let engine = shell(r#"printf '{"pod":"a","v":1}\n\n{"pod":"b","v":2.5}\n'"#);
    let mut sink = CollectingSink::default();

    with_timeout(async {
        let mut results = engine
            .execute_script(CancellationToken::new(), "ignored")
            .await
            .unwrap();
        results.stream(&mut sink).await.unwrap();
        results.close();
        results.close();
    })
    .await;

    assert_eq!(sink.rows.len(), 2);
    assert_eq!(sink.rows[0].get_str("pod").unwrap(), "a");
    assert_eq!(sink.rows[1].get("v"), Some(&Value::Float64(2.5)));
}

#[tokio::test]
async fn script_is_written_to_stdin() {
    init_tracing();

    // `cat` echoes the script back, so the script itself is one JSON row.
    let engine = CommandQueryEngine::new("cat", Vec::new());
    let mut sink = CollectingSink::default();

    with_timeout(async {
        let mut results = engine
            .execute_script(CancellationToken::new(), r#"{"echo":"hello"}"#)
            .await
            .unwrap();
        results.stream(&mut sink).await.unwrap();
    })
    .await;

    assert_eq!(sink.rows.len(), 1);
    assert_eq!(sink.rows[0].get_str("echo").unwrap(), "hello");
}

#[tokio::test]
async fn non_zero_exit_is_a_streaming_error() {
    init_tracing();

    let engine = shell(r#"printf '{"v":1}\n'; echo 'cluster unavailable' >&2; exit 3"#);
    let mut sink = CollectingSink::default();

    let err = with_timeout(async {
        let mut results = engine
            .execute_script(CancellationToken::new(), "")
            .await
            .unwrap();
        results.stream(&mut sink).await.unwrap_err()
    })
    .await;

    assert!(matches!(err, CollectorError::Streaming(ref msg) if msg.contains("exited")));
    assert_eq!(sink.rows.len(), 1, "rows before the failure still reached the sink");
}

#[tokio::test]
async fn missing_binary_is_an_execution_error() {
    init_tracing();

    let engine = CommandQueryEngine::new("/definitely/not/a/query-cli", Vec::new());
    let result = engine.execute_script(CancellationToken::new(), "").await;
    assert!(matches!(result, Err(CollectorError::Execution(_))));
}

#[tokio::test]
async fn cancelled_scope_refuses_to_start() {
    init_tracing();

    let token = CancellationToken::new();
    token.cancel();
    let result = shell("echo '{}'").execute_script(token, "").await;
    assert!(matches!(result, Err(CollectorError::Cancelled)));
}

#[tokio::test]
async fn cancellation_kills_a_running_child() {
    init_tracing();

    let engine = shell(r#"printf '{"v":1}\n'; sleep 30"#);
    let token = CancellationToken::new();
    let mut sink = CollectingSink::default();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let err = with_timeout(async {
        let mut results = engine.execute_script(token, "").await.unwrap();
        let err = results.stream(&mut sink).await.unwrap_err();
        results.close();
        err
    })
    .await;

    assert!(matches!(err, CollectorError::Cancelled));
    assert_eq!(sink.rows.len(), 1);
}
