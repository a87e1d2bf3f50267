//! Logger configuration

use super::payload::CommonLabels;
use serde::{Deserialize, Serialize};

/// What construction does when the remote client cannot be acquired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcquisitionPolicy {
    /// Return a usable logger that routes everything to the fallback sink,
    /// after writing one warning line there
    #[default]
    Graceful,
    /// Fail construction with the acquisition error
    Strict,
}

/// Serializable logger settings
///
/// The fallback sink and the backend are runtime objects and are supplied
/// separately to the builder.
///
/// # Example
///
/// ```
/// use rust_fallback_logger::{AcquisitionPolicy, LoggerConfig};
///
/// let config: LoggerConfig = serde_json::from_str(r#"{
///     "identity": "logs.internal:5170",
///     "stream_name": "billing",
///     "common_labels": { "env": "prod" },
///     "policy": "strict"
/// }"#).unwrap();
///
/// assert_eq!(config.policy, AcquisitionPolicy::Strict);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Backend identity, e.g. a project id or a collector address
    pub identity: String,

    /// Name of the remote log stream entries are written to
    pub stream_name: String,

    /// Labels the remote client attaches to every entry
    pub common_labels: CommonLabels,

    pub policy: AcquisitionPolicy,
}

impl LoggerConfig {
    pub fn new(identity: impl Into<String>, stream_name: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            stream_name: stream_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.common_labels.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: AcquisitionPolicy) -> Self {
        self.policy = policy;
        self
    }
}
