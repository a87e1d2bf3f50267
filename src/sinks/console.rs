//! Console sink implementation

use crate::core::{FallbackSink, Result, TimestampFormat};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
}

pub struct ConsoleSink {
    target: ConsoleTarget,
    prefix: String,
    timestamp_format: Option<TimestampFormat>,
}

impl ConsoleSink {
    pub fn new(target: ConsoleTarget) -> Self {
        Self {
            target,
            prefix: String::new(),
            timestamp_format: None,
        }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleTarget::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleTarget::Stderr)
    }

    /// Text written at the start of every line
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Prepend a timestamp after the prefix
    ///
    /// # Example
    ///
    /// ```
    /// use rust_fallback_logger::sinks::ConsoleSink;
    /// use rust_fallback_logger::TimestampFormat;
    ///
    /// let sink = ConsoleSink::stdout()
    ///     .with_prefix("backup ")
    ///     .with_timestamp(TimestampFormat::Iso8601);
    /// ```
    #[must_use]
    pub fn with_timestamp(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = Some(format);
        self
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }

    fn render(&self, line: &str) -> String {
        match self.timestamp_format {
            Some(ref format) => format!("{}{} {}\n", self.prefix, format.now(), line),
            None => format!("{}{}\n", self.prefix, line),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stderr()
    }
}

impl FallbackSink for ConsoleSink {
    fn write_line(&self, line: &str) -> Result<()> {
        let output = self.render(line);
        // Locked handles keep concurrent lines from interleaving
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().lock().write_all(output.as_bytes())?,
            ConsoleTarget::Stderr => std::io::stderr().lock().write_all(output.as_bytes())?,
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().flush()?,
            ConsoleTarget::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.target {
            ConsoleTarget::Stdout => "console:stdout",
            ConsoleTarget::Stderr => "console:stderr",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_prefix() {
        let sink = ConsoleSink::stdout().with_prefix("BKP: ");
        assert_eq!(sink.render("INFO      : map[msg:x]"), "BKP: INFO      : map[msg:x]\n");
    }

    #[test]
    fn test_render_with_timestamp() {
        let sink = ConsoleSink::stderr().with_timestamp(TimestampFormat::UnixMillis);
        let rendered = sink.render("line");
        assert!(rendered.ends_with(" line\n"));
        assert!(rendered.split(' ').next().unwrap().parse::<i64>().is_ok());
    }

    #[test]
    fn test_write_line_succeeds() {
        let sink = ConsoleSink::default();
        assert_eq!(sink.target(), ConsoleTarget::Stderr);
        assert!(sink.write_line("DEBUG     : map[msg:console test]").is_ok());
        assert!(sink.flush().is_ok());
    }
}
