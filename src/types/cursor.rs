//! Pagination cursors.
//!
//! A cursor is a complete path (root → target) used as an exclusive page
//! boundary. Callers only ever see it as an opaque string: URL-safe base64
//! (unpadded) of the JSON array of occurrence ids.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::occurrence::OccurrenceId;

/// Error decoding an opaque cursor string.
#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    /// Not valid base64.
    #[error("Cursor is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    /// Decoded bytes are not a JSON array of ids.
    #[error("Cursor payload is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// A path used as an exclusive pagination boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathCursor(Vec<OccurrenceId>);

impl PathCursor {
    /// Create a cursor from a path of ids.
    pub fn new(nodes: Vec<OccurrenceId>) -> Self {
        Self(nodes)
    }

    /// Decode an opaque cursor string.
    pub fn decode(encoded: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE_NO_PAD.decode(encoded.trim())?;
        Ok(Self(serde_json::from_slice(&bytes)?))
    }

    /// Encode as an opaque cursor string.
    pub fn encode(&self) -> String {
        // A Vec<i64> newtype always serializes.
        let json = serde_json::to_vec(&self.0).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// The ids making up the cursor path.
    pub fn nodes(&self) -> &[OccurrenceId] {
        &self.0
    }

    /// Whether the cursor carries no path at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `path` is exactly the cursor path.
    pub fn matches(&self, path: &[OccurrenceId]) -> bool {
        self.0 == path
    }

    /// Whether every continuation of `prefix` sorts strictly before the cursor.
    ///
    /// Compares over the common length only; the first differing element
    /// decides. Equal common prefixes return `false`, since a longer
    /// continuation may still sort at or after the cursor.
    pub fn precedes(&self, prefix: &[OccurrenceId]) -> bool {
        prefix
            .iter()
            .zip(self.0.iter())
            .map(|(step, bound)| step.cmp(bound))
            .find(|ord| *ord != Ordering::Equal)
            == Some(Ordering::Less)
    }
}

impl From<Vec<OccurrenceId>> for PathCursor {
    fn from(nodes: Vec<OccurrenceId>) -> Self {
        Self(nodes)
    }
}

impl From<&[i64]> for PathCursor {
    fn from(ids: &[i64]) -> Self {
        Self(ids.iter().copied().map(OccurrenceId::new).collect())
    }
}
