//! # Rust Fallback Logger
//!
//! A structured logging facade that forwards leveled entries to a remote
//! logging backend and falls back to a local sink when the backend is
//! unavailable or the caller's context is done.
//!
//! ## Features
//!
//! - **Per-call routing**: every entry goes to exactly one of the remote
//!   client or the fallback sink
//! - **Graceful degradation**: a failed backend acquisition yields a working
//!   logger that writes locally
//! - **Structured payloads**: flat `key, value` tokens or keyed maps
//! - **Thread safe**: logging takes `&self` and never locks the logger
//!
//! ## Example
//!
//! ```
//! use rust_fallback_logger::prelude::*;
//!
//! let ctx = SystemContext::new();
//! let backend = MemoryBackend::new();
//! let sink = MemorySink::new();
//!
//! let mut logger = Logger::new(ctx.clone(), &backend, "my-project", "api", sink.clone(), ());
//! logger.info("request served", ["path", "/health", "status", "200"]);
//! assert_eq!(backend.entries().len(), 1);
//!
//! // Once the context is cancelled, entries go to the fallback sink
//! ctx.cancel();
//! logger.error("boom", [("k", "v")]);
//! assert_eq!(sink.lines(), vec!["ERROR     : map[k:v msg:boom]".to_string()]);
//!
//! logger.close().unwrap();
//! ```

pub mod backends;
pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::backends::MemoryBackend;
    pub use crate::core::{
        build_payload, AcquisitionPolicy, CommonLabels, FallbackSink, Fields, LogEntry, Logger,
        LoggerBuilder, LoggerConfig, LoggerError, Payload, RemoteBackend, RemoteClient, Result,
        RoutingMetrics, Severity, StructuredLog, SystemContext, TimestampFormat,
    };
    pub use crate::sinks::{ConsoleSink, MemorySink, WriterSink};
}

pub use crate::backends::MemoryBackend;
pub use crate::core::{
    build_payload, format_fallback_line, AcquisitionPolicy, CommonLabels, FallbackSink, Fields,
    LogEntry, Logger, LoggerBuilder, LoggerConfig, LoggerError, Payload, RemoteBackend,
    RemoteClient, RemoteHandle, Result, RoutingMetrics, Severity, StructuredLog, SystemContext,
    TimestampFormat, DEGRADED_MODE_MESSAGE, MESSAGE_KEY, MISSING_VALUE,
};
pub use crate::sinks::{ConsoleSink, MemorySink, WriterSink};
