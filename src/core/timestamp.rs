//! Timestamp formatting for fallback sinks
//!
//! Fallback lines carry no timestamp of their own; sinks that want one
//! prepend it using these formats.

use crate::core::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use rust_fallback_logger::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::Classic.format(&at), "2025/01/08 10:30:45");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Date and time to the second: `2025/01/08 10:30:45`
    ///
    /// Matches the classic line-logger prefix.
    #[default]
    Classic,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    ///
    /// Prefer [`TimestampFormat::custom`], which rejects invalid patterns.
    /// An invalid pattern that gets here anyway is rendered as `Classic`.
    Custom(String),
}

impl TimestampFormat {
    /// Validated custom strftime format
    ///
    /// ```
    /// use rust_fallback_logger::TimestampFormat;
    ///
    /// assert!(TimestampFormat::custom("%H:%M:%S").is_ok());
    /// assert!(TimestampFormat::custom("%Q").is_err());
    /// ```
    pub fn custom(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(LoggerError::config(
                "TimestampFormat",
                format!("invalid strftime pattern '{}'", pattern),
            ));
        }
        Ok(TimestampFormat::Custom(pattern))
    }

    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Classic => datetime.format("%Y/%m/%d %H:%M:%S").to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(pattern) => {
                // `to_string` panics when chrono rejects the pattern
                let mut out = String::new();
                match write!(out, "{}", datetime.format(pattern)) {
                    Ok(()) => out,
                    Err(_) => TimestampFormat::Classic.format(datetime),
                }
            }
        }
    }

    /// Format the current time
    #[must_use]
    pub fn now(&self) -> String {
        self.format(&Utc::now())
    }
}
