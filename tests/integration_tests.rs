//! Integration tests for the fallback logger
//!
//! These tests verify:
//! - Routing exclusivity between remote client and fallback sink
//! - Cancellation and deadline overrides
//! - Fallback line format
//! - Close semantics
//! - File, writer and TCP collaborators end to end

use rust_fallback_logger::backends::{MemoryBackend, TcpBackend};
use rust_fallback_logger::core::{AcquisitionPolicy, LoggerConfig, LoggerError, Result};
use rust_fallback_logger::prelude::*;
use rust_fallback_logger::sinks::FileSink;
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const LOGGER_NAME: &str = "test-logger";

fn live_logger(backend: &MemoryBackend, sink: &MemorySink, ctx: SystemContext) -> Logger {
    Logger::new(ctx, backend, "gcp-project-id", LOGGER_NAME, sink.clone(), ["env", "test"])
}

fn degraded_logger(sink: &MemorySink) -> Logger {
    let logger = Logger::new(
        SystemContext::new(),
        &MemoryBackend::unavailable("could not find default credentials"),
        "gcp-project-id",
        LOGGER_NAME,
        sink.clone(),
        (),
    );
    sink.clear();
    logger
}

fn details() -> HashMap<String, String> {
    let mut details = HashMap::new();
    details.insert("key1".to_string(), "value1".to_string());
    details.insert("source".to_string(), "test".to_string());
    details
}

#[test]
fn test_live_logger_routes_all_levels_remotely() {
    let backend = MemoryBackend::new();
    let sink = MemorySink::new();
    let logger = live_logger(&backend, &sink, SystemContext::new());

    logger.error("e", details());
    logger.warn("w", details());
    logger.info("i", details());
    logger.debug("d", details());

    assert!(sink.is_empty(), "fallback sink must stay empty: {:?}", sink.lines());

    let severities: Vec<Severity> = backend.entries().iter().map(|e| e.severity).collect();
    assert_eq!(
        severities,
        vec![Severity::Error, Severity::Warning, Severity::Info, Severity::Debug]
    );
    assert_eq!(logger.metrics().remote_submitted(), 4);
    assert_eq!(logger.metrics().fallback_written(), 0);
}

#[test]
fn test_degraded_logger_routes_all_levels_to_fallback() {
    let sink = MemorySink::new();
    let logger = degraded_logger(&sink);

    let cases: [(&str, fn(&Logger, &str), &str); 4] = [
        ("Info", |l, m| l.info(m, details()), "INFO"),
        ("Warn", |l, m| l.warn(m, details()), "WARNING"),
        ("Error", |l, m| l.error(m, details()), "ERROR"),
        ("Debug", |l, m| l.debug(m, details()), "DEBUG"),
    ];

    for (level, log_fn, severity) in cases {
        sink.clear();
        let msg = format!("This is a {} message", level);
        log_fn(&logger, &msg);

        let lines = sink.lines();
        assert_eq!(lines.len(), 1, "{} should write exactly one line", level);
        let output = &lines[0];
        assert!(output.starts_with(severity), "got: {}", output);
        assert!(output.contains(&msg), "got: {}", output);
        assert!(output.contains("key1:value1"), "got: {}", output);
        assert!(output.contains("source:test"), "got: {}", output);
    }

    assert!(logger.is_degraded());
    assert_eq!(logger.metrics().remote_submitted(), 0);
}

#[test]
fn test_degraded_construction_writes_single_warning() {
    let sink = MemorySink::new();
    let logger = Logger::new(
        SystemContext::new(),
        &MemoryBackend::unavailable("permission denied"),
        "",
        LOGGER_NAME,
        sink.clone(),
        (),
    );

    assert!(logger.is_degraded());
    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("WARNING   : "));
    assert!(lines[0].contains("failed to initialize remote logging"));
    assert!(lines[0].contains(&format!("stream:{}", LOGGER_NAME)));
}

#[test]
fn test_cancellation_switches_sinks_mid_run() {
    let backend = MemoryBackend::new();
    let sink = MemorySink::new();
    let ctx = SystemContext::new();
    let logger = live_logger(&backend, &sink, ctx.child());

    for i in 0..3 {
        logger.info(format!("before {}", i), ());
    }
    ctx.cancel();
    for i in 0..2 {
        logger.info(format!("after {}", i), ());
    }

    assert_eq!(backend.entries().len(), 3);
    assert_eq!(sink.len(), 2);
    assert!(sink.contains("msg:after 0"));
    assert!(!logger.is_degraded(), "cancellation must not drop the client");
    assert!(!logger.routes_remote());
}

#[test]
fn test_expired_deadline_routes_to_fallback() {
    let backend = MemoryBackend::new();
    let sink = MemorySink::new();
    let ctx = SystemContext::new().with_deadline(Instant::now() + Duration::from_millis(50));
    let logger = live_logger(&backend, &sink, ctx);

    logger.info("early", ());
    std::thread::sleep(Duration::from_millis(80));
    logger.info("late", ());

    assert_eq!(backend.entries().len(), 1);
    assert!(sink.contains("msg:late"));
}

#[test]
fn test_fallback_format() {
    let sink = MemorySink::new();
    let logger = degraded_logger(&sink);

    logger.error("boom", [("k", "v")]);

    let line = &sink.lines()[0];
    assert!(line.contains("ERROR"));
    assert!(line.contains("boom"));
    assert!(line.contains("k:v"));
    assert_eq!(line, "ERROR     : map[k:v msg:boom]");
}

#[test]
fn test_flat_fields_through_logger() {
    let backend = MemoryBackend::new();
    let logger = live_logger(&backend, &MemorySink::new(), SystemContext::new());

    logger.warn("odd", ["a", "1", "dangling"]);

    let payload = &backend.entries()[0].payload;
    assert_eq!(payload.get("a"), Some("1"));
    assert_eq!(payload.get("dangling"), Some("MISSING"));
    assert_eq!(payload.get("msg"), Some("odd"));
}

#[test]
fn test_common_labels_never_printed_by_fallback() {
    let backend = MemoryBackend::new();
    let sink = MemorySink::new();
    let ctx = SystemContext::new();
    let logger = live_logger(&backend, &sink, ctx.clone());

    ctx.cancel();
    logger.info("cancelled", ());

    assert_eq!(backend.labels().get("env").map(String::as_str), Some("test"));
    assert!(!sink.contains("env"));
}

#[test]
fn test_close_on_degraded_logger() {
    let sink = MemorySink::new();
    let mut logger = degraded_logger(&sink);
    assert!(logger.close().is_ok());
    assert!(logger.close().is_ok());
}

#[test]
fn test_close_on_live_logger() {
    let backend = MemoryBackend::new();
    let mut logger = live_logger(&backend, &MemorySink::new(), SystemContext::new());

    assert!(logger.close().is_ok());
    assert_eq!(backend.release_count(), 1);
    assert!(logger.is_degraded());

    let failing = MemoryBackend::new().with_release_error("rpc error: unavailable");
    let mut logger = live_logger(&failing, &MemorySink::new(), SystemContext::new());
    match logger.close() {
        Err(LoggerError::Release(msg)) => assert_eq!(msg, "rpc error: unavailable"),
        other => panic!("expected release error, got {:?}", other),
    }
}

#[test]
fn test_strict_policy_via_builder() {
    let result = Logger::builder()
        .identity("gcp-project-id")
        .stream_name(LOGGER_NAME)
        .fallback(MemorySink::new())
        .policy(AcquisitionPolicy::Strict)
        .build(&MemoryBackend::unavailable("dial tcp: i/o timeout"));

    match result {
        Err(LoggerError::Acquisition { identity, message }) => {
            assert_eq!(identity, "gcp-project-id");
            assert!(message.contains("i/o timeout"));
        }
        other => panic!("expected acquisition error, got {:?}", other),
    }
}

#[test]
fn test_config_from_json() {
    let config: LoggerConfig = serde_json::from_str(
        r#"{
            "identity": "gcp-project-id",
            "stream_name": "billing",
            "common_labels": { "env": "prod", "team": "payments" }
        }"#,
    )
    .expect("valid config");

    let backend = MemoryBackend::new();
    let logger = LoggerBuilder::from_config(config)
        .fallback(MemorySink::new())
        .build(&backend)
        .expect("graceful build never fails");

    assert!(!logger.is_degraded());
    assert_eq!(logger.stream_name(), "billing");
    assert_eq!(backend.stream_name().as_deref(), Some("billing"));
    assert_eq!(backend.labels().len(), 2);
}

#[test]
fn test_failing_sink_is_not_surfaced() {
    struct FailingSink {
        attempts: Arc<AtomicUsize>,
    }

    impl FallbackSink for FailingSink {
        fn write_line(&self, _line: &str) -> Result<()> {
            self.attempts.fetch_add(1, Ordering::Relaxed);
            Err(LoggerError::io_operation(
                "writing fallback line",
                "disk full",
                std::io::Error::other("no space left on device"),
            ))
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    let attempts = Arc::new(AtomicUsize::new(0));
    let logger = Logger::new(
        SystemContext::new(),
        &MemoryBackend::unavailable("offline"),
        "p",
        LOGGER_NAME,
        FailingSink {
            attempts: Arc::clone(&attempts),
        },
        (),
    );

    for i in 0..5 {
        logger.info(format!("Message {}", i), ());
    }

    // One degraded-mode notice plus five entries
    assert_eq!(attempts.load(Ordering::Relaxed), 6);
    assert_eq!(logger.metrics().fallback_failures(), 5);
    assert_eq!(logger.metrics().fallback_written(), 0);
}

#[test]
fn test_writer_sink_with_prefix() {
    let sink = Arc::new(WriterSink::new(Vec::<u8>::new()).with_prefix("BKP: "));
    let logger = Logger::new(
        SystemContext::new(),
        &MemoryBackend::unavailable("offline"),
        "p",
        LOGGER_NAME,
        Arc::clone(&sink),
        (),
    );

    logger.info("Actual Info call", [("detailKey", "detailValue")]);
    drop(logger);

    let sink = Arc::try_unwrap(sink).ok().expect("logger dropped its handle");
    let output = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("BKP: INFO      : "));
    assert!(lines[1].contains("detailKey:detailValue"));
    assert!(lines[1].contains("msg:Actual Info call"));
}

#[test]
fn test_invalid_timestamp_pattern_does_not_break_fallback() {
    assert!(TimestampFormat::custom("%Q").is_err());

    let sink = Arc::new(
        WriterSink::new(Vec::<u8>::new())
            .with_prefix("BKP: ")
            .with_timestamp(TimestampFormat::Custom("%Q".to_string())),
    );
    let logger = Logger::new(
        SystemContext::new(),
        &MemoryBackend::unavailable("offline"),
        "p",
        LOGGER_NAME,
        Arc::clone(&sink),
        (),
    );

    logger.warn("still written", ["k", "v"]);
    assert_eq!(logger.metrics().fallback_written(), 1);
    assert_eq!(logger.metrics().fallback_failures(), 0);
    drop(logger);

    let sink = Arc::try_unwrap(sink).ok().expect("logger dropped its handle");
    let output = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("BKP: "));
    assert!(lines[1].ends_with("WARNING   : map[k:v msg:still written]"));
}

#[test]
fn test_file_sink_fallback() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("fallback.log");

    let sink = FileSink::new(&log_file).expect("Failed to create sink");
    let mut logger = Logger::new(
        SystemContext::new(),
        &MemoryBackend::unavailable("offline"),
        "p",
        LOGGER_NAME,
        sink,
        (),
    );

    logger.error("disk almost full", ["mount", "/var"]);
    logger.close().expect("close");

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "ERROR     : map[mount:/var msg:disk almost full]");
}

#[test]
fn test_tcp_backend_end_to_end() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().unwrap().to_string();

    let collector = std::thread::spawn(move || {
        let (socket, _) = listener.accept().expect("accept");
        BufReader::new(socket)
            .lines()
            .map_while(std::result::Result::ok)
            .collect::<Vec<_>>()
    });

    let sink = MemorySink::new();
    let mut logger = Logger::new(
        SystemContext::new(),
        &TcpBackend::new(),
        addr.as_str(),
        LOGGER_NAME,
        sink.clone(),
        ["env", "test"],
    );
    assert!(!logger.is_degraded());

    logger.info("first", ());
    logger.error("second", [("code", "500")]);
    logger.close().expect("release");

    let lines = collector.join().expect("collector thread");
    assert_eq!(lines.len(), 2);
    assert!(sink.is_empty());

    let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
    assert_eq!(second["severity"], "ERROR");
    assert_eq!(second["stream"], LOGGER_NAME);
    assert_eq!(second["labels"]["env"], "test");
    assert_eq!(second["payload"]["code"], "500");
}

#[test]
fn test_tcp_backend_unreachable_degrades() {
    let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let sink = MemorySink::new();

    let logger = Logger::new(
        SystemContext::new(),
        &TcpBackend::new().with_connect_timeout(Duration::from_millis(200)),
        format!("127.0.0.1:{}", port),
        LOGGER_NAME,
        sink.clone(),
        (),
    );

    assert!(logger.is_degraded());
    assert!(sink.contains("WARNING"));
    logger.info("still works", ());
    assert!(sink.contains("msg:still works"));
}

#[tokio::test]
async fn test_cancellation_from_async_task() {
    let backend = MemoryBackend::new();
    let sink = MemorySink::new();
    let ctx = SystemContext::new();
    let logger = Arc::new(live_logger(&backend, &sink, ctx.clone()));

    let token = ctx.token().clone();
    let worker_logger = Arc::clone(&logger);
    let worker = tokio::spawn(async move {
        worker_logger.info("worker running", ());
        token.cancelled().await;
        worker_logger.info("worker stopping", ());
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    ctx.cancel();
    worker.await.expect("worker task");

    assert!(backend.entries().iter().any(|e| e.payload.get("msg") == Some("worker running")));
    assert!(sink.contains("msg:worker stopping"));
}
