//! Point-in-time metadata snapshots of a source.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adapter::SourceAdapter;
use crate::source::FileSource;

/// Everything an adapter reports about its source, captured in one pass.
///
/// This is the record a persistence layer would store. It is a copy: later
/// changes to the source are not reflected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// The adapter variant that produced this snapshot.
    pub source: FileSource,

    /// Absolute path, URL or stream identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// The file name (e.g., "plank.png").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// The file extension without the dot, lower-cased (e.g., "png").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// The MIME type (e.g., "image/png").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// The size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// When the source was last modified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    /// Whether the source was valid when captured.
    pub valid: bool,
}

impl Metadata {
    /// Query every operation of `adapter` once.
    ///
    /// Metadata of an invalid source is captured as-is; check `valid` before
    /// trusting the rest.
    pub fn capture<A: SourceAdapter + ?Sized>(adapter: &A) -> Self {
        let metadata = Self {
            source: adapter.kind(),
            path: adapter.path(),
            filename: adapter.filename(),
            extension: adapter.extension(),
            mime_type: adapter.mime_type(),
            size: adapter.size(),
            last_modified: adapter.last_modified(),
            valid: adapter.valid(),
        };
        tracing::debug!(?metadata, "metadata captured");
        metadata
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::to_string(self).unwrap_or_default())
    }
}
