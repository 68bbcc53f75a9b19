//! The [`SourceAdapter`] contract and its eight variants.
//!
//! Every adapter wraps exactly one source value and answers each query from
//! the live source. Nothing is cached between calls, so a file deleted after
//! construction shows up as `valid() == false` on the next check.

use std::fmt;
use std::io::Read;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::detection::extension_of;
use crate::error::Result;
use crate::source::{FileSource, SourceRef};

mod fs;
pub mod file_stream;
pub mod generic_stream;
pub mod http_stream;
pub mod local_file;
pub mod local_path;
pub mod remote_url;
pub mod string;
pub mod uploaded_file;

pub use file_stream::FileStreamAdapter;
pub use generic_stream::GenericStreamAdapter;
pub use http_stream::HttpStreamAdapter;
pub use local_file::{LocalFile, LocalFileAdapter};
pub use local_path::LocalPathAdapter;
pub use remote_url::RemoteUrlAdapter;
pub use string::StringAdapter;
pub use uploaded_file::UploadedFileAdapter;

/// A uniform, read-only view of one file-like source.
///
/// Metadata queries never fail: an unreachable source reports `None` and
/// `valid() == false`. Only [`contents`](SourceAdapter::contents) returns a
/// `Result`, and it only errors when the source is invalid.
pub trait SourceAdapter {
    /// Which variant this is.
    fn kind(&self) -> FileSource;

    /// The exact value the adapter was constructed around.
    fn source(&self) -> SourceRef<'_>;

    /// Absolute path, URL or stream identifier; `None` without location
    /// semantics.
    fn path(&self) -> Option<String>;

    /// Base name without any directory component.
    fn filename(&self) -> Option<String>;

    /// Lower-cased suffix of [`filename`](SourceAdapter::filename).
    fn extension(&self) -> Option<String> {
        self.filename().as_deref().and_then(extension_of)
    }

    /// Best-effort content type.
    fn mime_type(&self) -> Option<String>;

    /// The content, as a buffer or as a reader over the live source.
    fn contents(&self) -> Result<Contents<'_>>;

    /// Byte length, if measurable without draining the source.
    fn size(&self) -> Option<u64>;

    /// Whether the source currently resolves to readable, error-free data.
    fn valid(&self) -> bool;

    /// When the source was last modified, where the origin reports it.
    fn last_modified(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Content handed out by [`SourceAdapter::contents`].
pub enum Contents<'a> {
    /// The full content, already in memory.
    Bytes(Bytes),
    /// A reader over the live source, starting wherever the source currently
    /// is positioned.
    Stream(Box<dyn Read + 'a>),
}

impl Contents<'_> {
    /// Whether this reads from a live source rather than a buffer.
    pub fn is_stream(&self) -> bool {
        matches!(self, Contents::Stream(_))
    }

    /// Everything that is left, as one buffer.
    pub fn into_bytes(self) -> Result<Bytes> {
        match self {
            Contents::Bytes(bytes) => Ok(bytes),
            Contents::Stream(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf)?;
                Ok(Bytes::from(buf))
            }
        }
    }

    /// SHA-256 hex digest of everything that is left.
    pub fn checksum(self) -> Result<String> {
        let mut hasher = Sha256::new();
        match self {
            Contents::Bytes(bytes) => hasher.update(&bytes),
            Contents::Stream(mut reader) => {
                std::io::copy(&mut reader, &mut hasher)?;
            }
        }
        Ok(hex::encode(hasher.finalize()))
    }
}

impl fmt::Debug for Contents<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contents::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Contents::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}
