//! Sink over any `io::Write`
//!
//! Behaves like a classic line logger: optional prefix, optional timestamp,
//! one newline-terminated line per call.

use crate::core::{FallbackSink, LoggerError, Result, TimestampFormat};
use parking_lot::Mutex;
use std::io::Write;

/// Fallback sink writing to a shared writer
///
/// # Example
///
/// ```
/// use rust_fallback_logger::sinks::WriterSink;
/// use rust_fallback_logger::FallbackSink;
///
/// let sink = WriterSink::new(Vec::new()).with_prefix("BKP: ");
/// sink.write_line("ERROR     : map[msg:boom]").unwrap();
///
/// let bytes = sink.into_inner();
/// assert_eq!(String::from_utf8(bytes).unwrap(), "BKP: ERROR     : map[msg:boom]\n");
/// ```
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
    prefix: String,
    timestamp_format: Option<TimestampFormat>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            prefix: String::new(),
            timestamp_format: None,
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = Some(format);
        self
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> FallbackSink for WriterSink<W> {
    fn write_line(&self, line: &str) -> Result<()> {
        let mut output = self.prefix.clone();
        if let Some(ref format) = self.timestamp_format {
            output.push_str(&format.now());
            output.push(' ');
        }
        output.push_str(line);
        output.push('\n');

        let mut writer = self.writer.lock();
        writer.write_all(output.as_bytes()).map_err(|e| {
            LoggerError::io_operation("writing fallback line", "writer rejected line", e)
        })
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "writer"
    }
}
