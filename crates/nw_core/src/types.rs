use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A captured headline. Immutable once constructed; the store keeps the
/// first record seen for a given key and discards later duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

/// Unvalidated title/url pair straight out of the page markup, before any
/// filtering or normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCandidate {
    pub title: String,
    pub url: String,
}

/// Canonical dedup identity of a headline: lowercased with all whitespace
/// removed, so case and spacing variants collapse onto one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn from_title(title: &str) -> Self {
        Self(title.to_lowercase().split_whitespace().collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
