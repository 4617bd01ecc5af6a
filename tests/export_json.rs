// tests/export_json.rs

mod common;
use crate::common::builders::jvm_row;
use crate::common::{init_tracing, with_timeout};

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value as Json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use scriptcollect::adapter::{jvm, IntegrationDescriptor, JvmAdapter, ResourceHelper, RowConverter};
use scriptcollect::errors::CollectorError;
use scriptcollect::export::{
    Exporter, MetricsRequest, OtlpHttpExporter, StdoutExporter, TracesRequest,
};
use scriptcollect::telemetry::{
    KeyValue, Resource, ResourceMetrics, ResourceSpans, ScopeSpans, Span, SpanKind, Status,
    StatusCode, SCOPE_NAME,
};

fn jvm_batch() -> Vec<ResourceMetrics> {
    let adapter = JvmAdapter::new(IntegrationDescriptor {
        id: "jvm".to_string(),
        collect_interval_sec: 10,
        script: jvm::script(10),
    });
    adapter
        .convert(&ResourceHelper::new("prod-eu", None), &jvm_row(1_700_000_000_000_000_000))
        .unwrap()
}

fn span_batch() -> Vec<ResourceSpans> {
    vec![ResourceSpans {
        resource: Resource {
            attributes: vec![KeyValue::string("service.name", "users")],
        },
        scope_spans: vec![ScopeSpans {
            scope: Default::default(),
            spans: vec![Span {
                trace_id: "0af7651916cd43dd8448eb211c80319c".to_string(),
                span_id: "b7ad6b7169203331".to_string(),
                parent_span_id: String::new(),
                name: "GET /".to_string(),
                kind: SpanKind::Server,
                start_time_unix_nano: 10,
                end_time_unix_nano: 20,
                attributes: vec![KeyValue::int("http.status_code", 500)],
                status: Status {
                    message: "HTTP 500".to_string(),
                    code: StatusCode::Error,
                },
            }],
        }],
    }]
}

#[test]
fn metrics_request_uses_otlp_json_shape() {
    let json = serde_json::to_value(MetricsRequest {
        resource_metrics: jvm_batch(),
    })
    .unwrap();

    let rm = &json["resourceMetrics"][0];
    assert_eq!(rm["resource"]["attributes"][0]["key"], "k8s.container.name");
    assert_eq!(rm["scopeMetrics"][0]["scope"]["name"], SCOPE_NAME);

    let metric = &rm["scopeMetrics"][0]["metrics"][0];
    assert_eq!(metric["name"], "runtime.jvm.gc.collection");
    let point = &metric["gauge"]["dataPoints"][0];
    assert_eq!(point["timeUnixNano"], "1700000000000000000");
    assert_eq!(point["asDouble"], 12.5);
    assert_eq!(point["attributes"][0]["value"]["stringValue"], "young");
}

#[test]
fn traces_request_uses_otlp_json_shape() {
    let json = serde_json::to_value(TracesRequest {
        resource_spans: span_batch(),
    })
    .unwrap();

    let span = &json["resourceSpans"][0]["scopeSpans"][0]["spans"][0];
    assert_eq!(span["traceId"], "0af7651916cd43dd8448eb211c80319c");
    assert_eq!(span["kind"], 2);
    assert_eq!(span["startTimeUnixNano"], "10");
    assert_eq!(span["status"]["code"], 2);
    assert_eq!(span["attributes"][0]["value"]["intValue"], "500");
    assert!(span.get("parentSpanId").is_none());
}

#[test]
fn otlp_urls_are_derived_from_endpoint() {
    let exporter = OtlpHttpExporter::new(
        "https://otlp.example.com:4318/",
        vec![("api-key".to_string(), "secret".to_string())],
        Duration::from_secs(5),
    )
    .unwrap();
    assert_eq!(exporter.metrics_url(), "https://otlp.example.com:4318/v1/metrics");
    assert_eq!(exporter.traces_url(), "https://otlp.example.com:4318/v1/traces");
}

#[test]
fn invalid_header_name_is_a_config_error() {
    let result = OtlpHttpExporter::new(
        "http://localhost:4318",
        vec![("bad header".to_string(), "x".to_string())],
        Duration::from_secs(5),
    );
    assert!(matches!(result, Err(CollectorError::ConfigError(_))));
}

/// Accept one HTTP request, answer with `status`, and return the raw request.
#[tokio::test]
async fn stdout_exporter_writes_one_document_per_line() {
    init_tracing();

    let (writer, mut reader) = tokio::io::duplex(1 << 20);
    let exporter = Arc::new(StdoutExporter::from_writer(writer));

    let metrics = {
        let exporter = Arc::clone(&exporter);
        tokio::spawn(async move { exporter.send_metrics(jvm_batch()).await })
    };
    let spans = {
        let exporter = Arc::clone(&exporter);
        tokio::spawn(async move { exporter.send_spans(span_batch()).await })
    };
    metrics.await.unwrap().unwrap();
    spans.await.unwrap().unwrap();
    drop(exporter);

    let mut output = String::new();
    with_timeout(reader.read_to_string(&mut output)).await.unwrap();

    let docs: Vec<Json> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs.iter().filter(|d| d.get("resourceMetrics").is_some()).count(), 1);
    assert_eq!(docs.iter().filter(|d| d.get("resourceSpans").is_some()).count(), 1);
    assert!(output.ends_with('\n'));
}

async fn serve_once(listener: TcpListener, status: &'static str) -> String {
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    let response = format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
    socket.write_all(response.as_bytes()).await.unwrap();
    String::from_utf8_lossy(&buf).into_owned()
}

#[tokio::test]
async fn otlp_exporter_posts_metrics_with_headers() {
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(serve_once(listener, "200 OK"));

    let exporter = OtlpHttpExporter::new(
        &format!("http://{addr}"),
        vec![("api-key".to_string(), "secret".to_string())],
        Duration::from_secs(5),
    )
    .unwrap();

    with_timeout(exporter.send_metrics(jvm_batch())).await.unwrap();
    let request = with_timeout(server).await.unwrap();

    assert!(request.starts_with("POST /v1/metrics "));
    let lower = request.to_ascii_lowercase();
    assert!(lower.contains("api-key: secret"));
    assert!(lower.contains("content-type: application/json"));

    let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
    let json: Json = serde_json::from_str(body).unwrap();
    assert_eq!(json["resourceMetrics"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn otlp_exporter_reports_non_success_status() {
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(serve_once(listener, "500 Internal Server Error"));

    let exporter =
        OtlpHttpExporter::new(&format!("http://{addr}"), Vec::new(), Duration::from_secs(5))
            .unwrap();

    let err = with_timeout(exporter.send_spans(span_batch())).await.unwrap_err();
    let request = with_timeout(server).await.unwrap();

    assert!(request.starts_with("POST /v1/traces "));
    assert!(matches!(err, CollectorError::Export(ref msg) if msg.contains("500")));
}
