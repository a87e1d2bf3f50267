//! Fallback sink trait for local, line-oriented output

use super::error::Result;

/// Local destination used when the remote backend is absent or the context
/// is done.
///
/// Receives fully formatted lines without a trailing newline. Implementations
/// are shared across threads and synchronise internally.
pub trait FallbackSink: Send + Sync {
    fn write_line(&self, line: &str) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}

impl<S: FallbackSink + ?Sized> FallbackSink for std::sync::Arc<S> {
    fn write_line(&self, line: &str) -> Result<()> {
        (**self).write_line(line)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
