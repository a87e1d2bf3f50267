//! Log entry structure

use super::payload::Payload;
use super::severity::Severity;
use serde::{Deserialize, Serialize};

/// One entry handed verbatim to the remote client.
///
/// Timestamps, trace ids and labels are the remote side's business; the
/// facade adds nothing beyond severity and payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub severity: Severity,
    pub payload: Payload,
}

impl LogEntry {
    pub fn new(severity: Severity, payload: Payload) -> Self {
        Self { severity, payload }
    }

    /// Line written to the fallback sink: the severity padded to ten
    /// columns, a colon, then the payload map.
    pub fn fallback_line(&self) -> String {
        format_fallback_line(self.severity, &self.payload)
    }
}

/// Format a severity and payload the way the fallback sink receives them,
/// e.g. `ERROR     : map[k:v msg:boom]`
pub fn format_fallback_line(severity: Severity, payload: &Payload) -> String {
    format!("{:<10}: {}", severity, payload)
}
