//! TCP backend for remote logging
//!
//! Sends each entry as one JSON line to a collector. Useful for centralized
//! logging in distributed systems; the backend identity is the collector's
//! socket address.

use crate::core::{
    CommonLabels, LogEntry, LoggerError, Payload, RemoteBackend, RemoteClient, Result, Severity,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// One line on the wire
#[derive(Debug, Serialize)]
pub struct WireRecord<'a> {
    pub stream: &'a str,
    pub severity: Severity,
    pub labels: &'a CommonLabels,
    pub payload: &'a Payload,
}

/// Backend that connects to a TCP log collector
///
/// # Example
///
/// ```no_run
/// use rust_fallback_logger::prelude::*;
/// use rust_fallback_logger::backends::TcpBackend;
///
/// let backend = TcpBackend::new();
/// let logger = Logger::new(
///     SystemContext::new(),
///     &backend,
///     "127.0.0.1:5170",
///     "api",
///     ConsoleSink::stderr(),
///     ["env", "prod"],
/// );
/// logger.info("This entry is sent to 127.0.0.1:5170", ());
/// ```
#[derive(Debug, Clone)]
pub struct TcpBackend {
    connect_timeout: Duration,
    write_timeout: Duration,
}

impl TcpBackend {
    pub fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    fn connect(&self, address: &str) -> Result<TcpStream> {
        let addrs = address.to_socket_addrs().map_err(|e| {
            LoggerError::acquisition(address, format!("cannot resolve address: {}", e))
        })?;

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(stream) => {
                    // Set timeouts to prevent hanging
                    stream
                        .set_write_timeout(Some(self.write_timeout))
                        .map_err(|e| LoggerError::acquisition(address, e.to_string()))?;
                    // Enable TCP_NODELAY for low-latency logging
                    stream
                        .set_nodelay(true)
                        .map_err(|e| LoggerError::acquisition(address, e.to_string()))?;
                    return Ok(stream);
                }
                Err(e) => last_err = Some(e),
            }
        }

        Err(LoggerError::acquisition(
            address,
            match last_err {
                Some(e) => e.to_string(),
                None => "address resolved to nothing".to_string(),
            },
        ))
    }
}

impl Default for TcpBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteBackend for TcpBackend {
    fn acquire(
        &self,
        identity: &str,
        stream_name: &str,
        labels: &CommonLabels,
    ) -> Result<Box<dyn RemoteClient>> {
        let stream = self.connect(identity)?;

        Ok(Box::new(TcpClient {
            stream: Mutex::new(Some(BufWriter::new(stream))),
            address: identity.to_string(),
            stream_name: stream_name.to_string(),
            labels: labels.clone(),
            failed_submissions: AtomicU64::new(0),
        }))
    }
}

/// Connected collector client
///
/// Submission failures are counted, never retried. After a write error the
/// connection is dropped and later submissions are counted as failed.
pub struct TcpClient {
    stream: Mutex<Option<BufWriter<TcpStream>>>,
    address: String,
    stream_name: String,
    labels: CommonLabels,
    failed_submissions: AtomicU64,
}

impl TcpClient {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn failed_submissions(&self) -> u64 {
        self.failed_submissions.load(Ordering::Relaxed)
    }

    fn encode(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        let record = WireRecord {
            stream: &self.stream_name,
            severity: entry.severity,
            labels: &self.labels,
            payload: &entry.payload,
        };
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        Ok(line)
    }
}

impl RemoteClient for TcpClient {
    fn submit(&self, entry: LogEntry) {
        let line = match self.encode(&entry) {
            Ok(line) => line,
            Err(_) => {
                self.failed_submissions.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        let mut guard = self.stream.lock();
        let sent = match guard.as_mut() {
            Some(writer) => writer.write_all(&line).and_then(|()| writer.flush()).is_ok(),
            None => false,
        };

        if !sent {
            // Connection lost
            *guard = None;
            self.failed_submissions.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn release(&mut self) -> Result<()> {
        let Some(mut writer) = self.stream.get_mut().take() else {
            return Ok(());
        };

        writer.flush().map_err(|e| {
            LoggerError::release(format!("flush to {} failed: {}", self.address, e))
        })?;

        match writer.get_ref().shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(LoggerError::release(format!(
                "shutdown of {} failed: {}",
                self.address, e
            ))),
        }
    }

    fn name(&self) -> &str {
        "tcp"
    }
}

impl Drop for TcpClient {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed
        if let Some(writer) = self.stream.get_mut().as_mut() {
            let _ = writer.flush();
        }
    }
}
