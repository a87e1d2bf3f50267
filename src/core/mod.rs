//! Core logger types and traits

pub mod config;
pub mod context;
pub mod error;
pub mod log_entry;
pub mod logger;
pub mod metrics;
pub mod payload;
pub mod remote;
pub mod severity;
pub mod sink;
pub mod timestamp;

pub use config::{AcquisitionPolicy, LoggerConfig};
pub use context::SystemContext;
pub use error::{LoggerError, Result};
pub use log_entry::{format_fallback_line, LogEntry};
pub use logger::{Logger, LoggerBuilder, StructuredLog, DEGRADED_MODE_MESSAGE};
pub use metrics::RoutingMetrics;
pub use payload::{build_payload, CommonLabels, Fields, Payload, MESSAGE_KEY, MISSING_VALUE};
pub use remote::{RemoteBackend, RemoteClient, RemoteHandle};
pub use severity::Severity;
pub use sink::FallbackSink;
pub use timestamp::TimestampFormat;
