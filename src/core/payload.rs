//! Structured payload assembly
//!
//! This module provides:
//! - `Fields`: caller-supplied metadata, either flat `key, value, ...` tokens or
//!   an already keyed map
//! - `Payload`: the ordered key/value body of one log entry
//! - `build_payload`: the normalization step joining a message and its fields

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Reserved payload key holding the caller's message
pub const MESSAGE_KEY: &str = "msg";

/// Value assigned to the trailing key of an odd-length flat field list
pub const MISSING_VALUE: &str = "MISSING";

/// Labels attached by the remote client to every entry it submits
pub type CommonLabels = BTreeMap<String, String>;

/// Metadata supplied alongside a log message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fields {
    /// Alternating `key, value, key, value, ...` tokens
    Flat(Vec<String>),
    /// Already keyed metadata
    Keyed(BTreeMap<String, String>),
}

impl Fields {
    /// No metadata
    pub fn none() -> Self {
        Fields::Keyed(BTreeMap::new())
    }

    /// Build flat fields from any sequence of string-like tokens
    pub fn flat<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Fields::Flat(tokens.into_iter().map(Into::into).collect())
    }

    /// Build keyed fields from any sequence of pairs
    pub fn keyed<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Fields::Keyed(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Fields::Flat(tokens) => tokens.is_empty(),
            Fields::Keyed(map) => map.is_empty(),
        }
    }

    /// Normalize into a keyed map.
    ///
    /// Flat tokens are paired left to right; a later duplicate key overwrites an
    /// earlier one and an unmatched trailing key maps to [`MISSING_VALUE`].
    pub fn into_map(self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        self.apply_to(&mut map);
        map
    }

    fn apply_to(self, map: &mut BTreeMap<String, String>) {
        match self {
            Fields::Keyed(keyed) => map.extend(keyed),
            Fields::Flat(tokens) => {
                let mut tokens = tokens.into_iter();
                while let Some(key) = tokens.next() {
                    let value = tokens.next().unwrap_or_else(|| MISSING_VALUE.to_string());
                    map.insert(key, value);
                }
            }
        }
    }
}

impl Default for Fields {
    fn default() -> Self {
        Self::none()
    }
}

impl From<()> for Fields {
    fn from(_: ()) -> Self {
        Fields::none()
    }
}

impl From<Vec<String>> for Fields {
    fn from(tokens: Vec<String>) -> Self {
        Fields::Flat(tokens)
    }
}

impl From<Vec<&str>> for Fields {
    fn from(tokens: Vec<&str>) -> Self {
        Fields::flat(tokens)
    }
}

impl From<&[&str]> for Fields {
    fn from(tokens: &[&str]) -> Self {
        Fields::flat(tokens.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Fields {
    fn from(tokens: [&str; N]) -> Self {
        Fields::flat(tokens)
    }
}

impl From<BTreeMap<String, String>> for Fields {
    fn from(map: BTreeMap<String, String>) -> Self {
        Fields::Keyed(map)
    }
}

impl From<HashMap<String, String>> for Fields {
    fn from(map: HashMap<String, String>) -> Self {
        Fields::Keyed(map.into_iter().collect())
    }
}

impl From<HashMap<&str, &str>> for Fields {
    fn from(map: HashMap<&str, &str>) -> Self {
        Fields::keyed(map)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Fields {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Fields::keyed(pairs)
    }
}

impl From<Vec<(String, String)>> for Fields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Fields::Keyed(pairs.into_iter().collect())
    }
}

/// Structured body of one log entry
///
/// Always holds [`MESSAGE_KEY`] unless a caller field overwrote it. Keys are
/// kept sorted, so the textual form is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload {
    fields: BTreeMap<String, String>,
}

impl Payload {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The message slot, which may have been replaced by a caller field
    pub fn message(&self) -> Option<&str> {
        self.get(MESSAGE_KEY)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }
}

impl fmt::Display for Payload {
    /// Renders as `map[k1:v1 k2:v2]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("map[")?;
        for (idx, (key, value)) in self.fields.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{}", key, value)?;
        }
        f.write_str("]")
    }
}

/// Assemble a message and its metadata into a payload.
///
/// The message is stored under [`MESSAGE_KEY`] first, so a caller field with
/// that exact name replaces it. Never fails.
///
/// # Example
///
/// ```
/// use rust_fallback_logger::build_payload;
///
/// let payload = build_payload("disk full", ["mount", "/var", "retry"]);
/// assert_eq!(payload.get("msg"), Some("disk full"));
/// assert_eq!(payload.get("mount"), Some("/var"));
/// assert_eq!(payload.get("retry"), Some("MISSING"));
/// ```
pub fn build_payload(message: impl Into<String>, fields: impl Into<Fields>) -> Payload {
    let mut map = BTreeMap::new();
    map.insert(MESSAGE_KEY.to_string(), message.into());
    fields.into().apply_to(&mut map);
    Payload { fields: map }
}
