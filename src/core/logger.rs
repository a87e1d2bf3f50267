//! Main logger implementation

use super::{
    config::{AcquisitionPolicy, LoggerConfig},
    context::SystemContext,
    error::{LoggerError, Result},
    log_entry::{format_fallback_line, LogEntry},
    metrics::RoutingMetrics,
    payload::{build_payload, CommonLabels, Fields, Payload},
    remote::{RemoteBackend, RemoteHandle},
    severity::Severity,
    sink::FallbackSink,
};
use crate::sinks::ConsoleSink;
use std::fmt;

/// Message of the warning written once when the remote client is unavailable
pub const DEGRADED_MODE_MESSAGE: &str = "failed to initialize remote logging, using fallback sink";

/// Structured logger that prefers a remote backend and falls back to a
/// local sink.
///
/// Each call is routed on its own: the entry goes to the remote client when
/// one was acquired and the context is not done, otherwise the formatted line
/// goes to the fallback sink. Exactly one of the two receives it.
pub struct Logger {
    context: SystemContext,
    remote: RemoteHandle,
    fallback: Box<dyn FallbackSink>,
    identity: String,
    stream_name: String,
    /// Metrics for observability (remote vs fallback counts)
    metrics: RoutingMetrics,
}

impl Logger {
    /// Create a logger, degrading to the fallback sink if the remote client
    /// cannot be acquired.
    ///
    /// Never fails. In degraded mode a single warning line describing the
    /// failure is written to `fallback`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_fallback_logger::prelude::*;
    ///
    /// let sink = MemorySink::new();
    /// let backend = MemoryBackend::unavailable("no credentials");
    ///
    /// let logger = Logger::new(
    ///     SystemContext::new(),
    ///     &backend,
    ///     "my-project",
    ///     "api",
    ///     sink.clone(),
    ///     ["env", "dev"],
    /// );
    ///
    /// assert!(logger.is_degraded());
    /// logger.info("started", ["port", "8080"]);
    /// assert!(sink.lines()[1].starts_with("INFO      : "));
    /// ```
    pub fn new<B, S>(
        context: SystemContext,
        backend: &B,
        identity: impl Into<String>,
        stream_name: impl Into<String>,
        fallback: S,
        common_labels: impl Into<Fields>,
    ) -> Self
    where
        B: RemoteBackend + ?Sized,
        S: FallbackSink + 'static,
    {
        let parts = LoggerParts {
            context,
            identity: identity.into(),
            stream_name: stream_name.into(),
            fallback: Box::new(fallback),
            common_labels: common_labels.into().into_map(),
        };
        Self::connect_graceful(parts, backend)
    }

    /// Create a logger, failing if the remote client cannot be acquired
    pub fn try_new<B, S>(
        context: SystemContext,
        backend: &B,
        identity: impl Into<String>,
        stream_name: impl Into<String>,
        fallback: S,
        common_labels: impl Into<Fields>,
    ) -> Result<Self>
    where
        B: RemoteBackend + ?Sized,
        S: FallbackSink + 'static,
    {
        let parts = LoggerParts {
            context,
            identity: identity.into(),
            stream_name: stream_name.into(),
            fallback: Box::new(fallback),
            common_labels: common_labels.into().into_map(),
        };
        Self::connect_strict(parts, backend)
    }

    fn connect_graceful<B: RemoteBackend + ?Sized>(parts: LoggerParts, backend: &B) -> Self {
        match parts.acquire(backend) {
            Ok(remote) => parts.into_logger(remote),
            Err(err) => {
                let logger = parts.into_logger(RemoteHandle::Absent);
                logger.announce_degraded(&err);
                logger
            }
        }
    }

    fn connect_strict<B: RemoteBackend + ?Sized>(parts: LoggerParts, backend: &B) -> Result<Self> {
        let remote = parts.acquire(backend)?;
        Ok(parts.into_logger(remote))
    }

    /// Write the one-time degraded mode notice. Not counted as a dispatch.
    fn announce_degraded(&self, err: &LoggerError) {
        let payload = build_payload(
            DEGRADED_MODE_MESSAGE,
            Fields::keyed([
                ("identity", self.identity.clone()),
                ("stream", self.stream_name.clone()),
                ("error", err.to_string()),
            ]),
        );
        if let Err(e) = self
            .fallback
            .write_line(&format_fallback_line(Severity::Warning, &payload))
        {
            eprintln!(
                "[LOGGER ERROR] Fallback sink '{}' failed to record degraded mode: {}",
                self.fallback.name(),
                e
            );
        }
    }

    /// Route one entry to the remote client or the fallback sink
    pub fn log(&self, severity: Severity, message: impl Into<String>, fields: impl Into<Fields>) {
        let payload = build_payload(message, fields);

        match &self.remote {
            RemoteHandle::Live(client) if !self.context.is_done() => {
                client.submit(LogEntry::new(severity, payload));
                self.metrics.record_remote();
            }
            RemoteHandle::Live(_) => {
                self.metrics.record_cancelled_reroute();
                self.write_fallback(severity, &payload);
            }
            RemoteHandle::Absent => self.write_fallback(severity, &payload),
        }
    }

    fn write_fallback(&self, severity: Severity, payload: &Payload) {
        let line = format_fallback_line(severity, payload);

        match self.fallback.write_line(&line) {
            Ok(()) => self.metrics.record_fallback(),
            Err(e) => {
                let failures = self.metrics.record_fallback_failure();

                // Alert on first failure and periodically thereafter
                if failures == 0 || (failures + 1).is_multiple_of(1000) {
                    eprintln!(
                        "[LOGGER ERROR] Fallback sink '{}' failed ({} failures so far): {}",
                        self.fallback.name(),
                        failures + 1,
                        e
                    );
                }
            }
        }
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>, fields: impl Into<Fields>) {
        self.log(Severity::Debug, message, fields);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>, fields: impl Into<Fields>) {
        self.log(Severity::Info, message, fields);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>, fields: impl Into<Fields>) {
        self.log(Severity::Warning, message, fields);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>, fields: impl Into<Fields>) {
        self.log(Severity::Error, message, fields);
    }

    /// True when no remote client is held; every entry goes to the fallback
    /// sink regardless of the context
    pub fn is_degraded(&self) -> bool {
        !self.remote.is_live()
    }

    /// True when the next entry would reach the remote client
    pub fn routes_remote(&self) -> bool {
        self.remote.is_live() && !self.context.is_done()
    }

    pub fn context(&self) -> &SystemContext {
        &self.context
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    /// Get the routing metrics
    ///
    /// # Example
    ///
    /// ```
    /// use rust_fallback_logger::prelude::*;
    ///
    /// let backend = MemoryBackend::new();
    /// let logger = Logger::new(SystemContext::new(), &backend, "p", "s", MemorySink::new(), ());
    /// logger.info("hello", ());
    ///
    /// assert_eq!(logger.metrics().remote_submitted(), 1);
    /// assert_eq!(logger.metrics().fallback_written(), 0);
    /// ```
    pub fn metrics(&self) -> &RoutingMetrics {
        &self.metrics
    }

    /// Release the remote client.
    ///
    /// Returns the client's release result unmodified. A degraded or already
    /// closed logger returns `Ok(())`. Entries logged afterwards go to the
    /// fallback sink.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_fallback_logger::prelude::*;
    ///
    /// let backend = MemoryBackend::new();
    /// let mut logger = Logger::new(SystemContext::new(), &backend, "p", "s", MemorySink::new(), ());
    ///
    /// assert!(logger.close().is_ok());
    /// assert!(logger.is_degraded());
    /// assert!(logger.close().is_ok());
    /// ```
    pub fn close(&mut self) -> Result<()> {
        let result = match self.remote.take() {
            Some(mut client) => client.release(),
            None => Ok(()),
        };

        if let Err(e) = self.fallback.flush() {
            eprintln!(
                "[LOGGER ERROR] Failed to flush fallback sink '{}' during close: {}",
                self.fallback.name(),
                e
            );
        }

        result
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // Release a client the caller never closed
        if let Some(mut client) = self.remote.take() {
            if let Err(e) = client.release() {
                eprintln!(
                    "[LOGGER ERROR] Failed to release remote client '{}' on drop: {}",
                    client.name(),
                    e
                );
            }
        }

        let _ = self.fallback.flush();
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("identity", &self.identity)
            .field("stream_name", &self.stream_name)
            .field("remote", &self.remote)
            .field("fallback", &self.fallback.name())
            .field("context_done", &self.context.is_done())
            .finish()
    }
}

/// Everything a logger needs besides the remote handle
struct LoggerParts {
    context: SystemContext,
    identity: String,
    stream_name: String,
    fallback: Box<dyn FallbackSink>,
    common_labels: CommonLabels,
}

impl LoggerParts {
    /// The single blocking round-trip of the logger's lifetime
    fn acquire<B: RemoteBackend + ?Sized>(&self, backend: &B) -> Result<RemoteHandle> {
        if self.identity.trim().is_empty() {
            return Err(LoggerError::acquisition(
                &self.identity,
                "backend identity is empty",
            ));
        }
        if self.stream_name.trim().is_empty() {
            return Err(LoggerError::acquisition(&self.identity, "stream name is empty"));
        }

        backend
            .acquire(&self.identity, &self.stream_name, &self.common_labels)
            .map(RemoteHandle::Live)
    }

    fn into_logger(self, remote: RemoteHandle) -> Logger {
        Logger {
            context: self.context,
            remote,
            fallback: self.fallback,
            identity: self.identity,
            stream_name: self.stream_name,
            metrics: RoutingMetrics::new(),
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_fallback_logger::prelude::*;
///
/// let backend = MemoryBackend::new();
/// let logger = Logger::builder()
///     .identity("my-project")
///     .stream_name("checkout")
///     .common_label("env", "staging")
///     .fallback(MemorySink::new())
///     .policy(AcquisitionPolicy::Strict)
///     .build(&backend)
///     .unwrap();
///
/// assert!(!logger.is_degraded());
/// ```
pub struct LoggerBuilder {
    context: SystemContext,
    identity: String,
    stream_name: String,
    fallback: Option<Box<dyn FallbackSink>>,
    common_labels: CommonLabels,
    policy: AcquisitionPolicy,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            context: SystemContext::new(),
            identity: String::new(),
            stream_name: String::new(),
            fallback: None,
            common_labels: CommonLabels::new(),
            policy: AcquisitionPolicy::Graceful,
        }
    }

    /// Seed a builder from serialized settings
    pub fn from_config(config: LoggerConfig) -> Self {
        Self {
            identity: config.identity,
            stream_name: config.stream_name,
            common_labels: config.common_labels,
            policy: config.policy,
            ..Self::new()
        }
    }

    /// Set the context polled before every remote submission
    #[must_use = "builder methods return a new value"]
    pub fn context(mut self, context: SystemContext) -> Self {
        self.context = context;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stream_name(mut self, stream_name: impl Into<String>) -> Self {
        self.stream_name = stream_name.into();
        self
    }

    /// Set the fallback sink
    ///
    /// If not called, entries fall back to standard error.
    #[must_use = "builder methods return a new value"]
    pub fn fallback<S: FallbackSink + 'static>(mut self, sink: S) -> Self {
        self.fallback = Some(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn common_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.common_labels.insert(key.into(), value.into());
        self
    }

    /// Add common labels, flat or keyed. An odd flat list maps its last key
    /// to `"MISSING"`.
    #[must_use = "builder methods return a new value"]
    pub fn common_labels(mut self, labels: impl Into<Fields>) -> Self {
        self.common_labels.extend(labels.into().into_map());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn policy(mut self, policy: AcquisitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Acquire the remote client and build the Logger
    ///
    /// Only fails under [`AcquisitionPolicy::Strict`].
    pub fn build<B: RemoteBackend + ?Sized>(self, backend: &B) -> Result<Logger> {
        let parts = LoggerParts {
            context: self.context,
            identity: self.identity,
            stream_name: self.stream_name,
            fallback: self
                .fallback
                .unwrap_or_else(|| Box::new(ConsoleSink::stderr())),
            common_labels: self.common_labels,
        };

        match self.policy {
            AcquisitionPolicy::Graceful => Ok(Logger::connect_graceful(parts, backend)),
            AcquisitionPolicy::Strict => Logger::connect_strict(parts, backend),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

/// Object-safe logging interface, for code that takes any logger
///
/// ```
/// use rust_fallback_logger::prelude::*;
///
/// fn charge(log: &dyn StructuredLog) {
///     log.info("charged", Fields::flat(["amount", "12.50"]));
/// }
///
/// let sink = MemorySink::new();
/// let logger = Logger::new(SystemContext::new(), &MemoryBackend::unavailable("offline"), "p", "s", sink.clone(), ());
/// charge(&logger);
/// assert!(sink.contains("amount:12.50"));
/// ```
pub trait StructuredLog: Send + Sync {
    fn log_fields(&self, severity: Severity, message: &str, fields: Fields);

    fn error(&self, message: &str, fields: Fields) {
        self.log_fields(Severity::Error, message, fields);
    }

    fn warn(&self, message: &str, fields: Fields) {
        self.log_fields(Severity::Warning, message, fields);
    }

    fn info(&self, message: &str, fields: Fields) {
        self.log_fields(Severity::Info, message, fields);
    }

    fn debug(&self, message: &str, fields: Fields) {
        self.log_fields(Severity::Debug, message, fields);
    }
}

impl StructuredLog for Logger {
    fn log_fields(&self, severity: Severity, message: &str, fields: Fields) {
        self.log(severity, message, fields);
    }
}
