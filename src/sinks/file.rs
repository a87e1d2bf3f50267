//! File sink implementation

use crate::core::{FallbackSink, LoggerError, Result, TimestampFormat};
use fs2::FileExt;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends fallback lines to a file, flushing after every line.
///
/// With [`FileSink::with_file_lock`] each write holds an advisory exclusive
/// lock, so several processes can share one fallback file.
pub struct FileSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    timestamp_format: Option<TimestampFormat>,
    lock_file: bool,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening fallback file",
                    format!("cannot open '{}'", path.display()),
                    e,
                )
            })?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path,
            timestamp_format: None,
            lock_file: false,
        })
    }

    /// Prepend a timestamp to every line
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_fallback_logger::sinks::FileSink;
    /// use rust_fallback_logger::TimestampFormat;
    ///
    /// let sink = FileSink::new("/var/log/app-fallback.log")
    ///     .unwrap()
    ///     .with_timestamp(TimestampFormat::Rfc3339);
    /// ```
    #[must_use]
    pub fn with_timestamp(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = Some(format);
        self
    }

    /// Hold an exclusive advisory lock while writing each line
    #[must_use]
    pub fn with_file_lock(mut self, enable: bool) -> Self {
        self.lock_file = enable;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_locked(&self, writer: &mut BufWriter<File>, output: &[u8]) -> Result<()> {
        FileExt::lock_exclusive(writer.get_ref()).map_err(|e| {
            LoggerError::io_operation("locking fallback file", self.path.display().to_string(), e)
        })?;

        let result = writer.write_all(output).and_then(|()| writer.flush());
        let unlock = FileExt::unlock(writer.get_ref());

        result?;
        unlock?;
        Ok(())
    }
}

impl FallbackSink for FileSink {
    fn write_line(&self, line: &str) -> Result<()> {
        let output = match self.timestamp_format {
            Some(ref format) => format!("{} {}\n", format.now(), line),
            None => format!("{}\n", line),
        };

        let mut writer = self.writer.lock();
        if self.lock_file {
            self.write_locked(&mut writer, output.as_bytes())
        } else {
            writer.write_all(output.as_bytes())?;
            writer.flush()?;
            Ok(())
        }
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.writer.get_mut().flush();
    }
}
