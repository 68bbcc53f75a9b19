//! File source adapters for Rust.
//!
//! One read-only interface over the many shapes "a file" arrives in: a local
//! path, a file reference, an upload descriptor, a remote URL, a byte buffer,
//! an open local file, an open HTTP response, or any other stream.
//!
//! # Overview
//!
//! Each variant implements [`SourceAdapter`], exposing:
//!
//! - **Location**: `path`, `filename`, `extension`
//! - **Description**: `mime_type`, `size`, `last_modified`
//! - **Content**: `contents`, as a buffer or as a reader
//! - **State**: `valid`, re-checked against the live source on every call
//!
//! Adapters never fail to construct and never panic on a broken source; a
//! missing file or failed request is reported as `valid() == false` with
//! `None` metadata. Stream handles are borrowed and never closed.
//!
//! # Examples
//!
//! ```no_run
//! # use file_source::{LocalPathAdapter, SourceAdapter, StringAdapter};
//! let adapter = LocalPathAdapter::new("/var/uploads/plank.png");
//! if adapter.valid() {
//!     println!("{:?} {:?}", adapter.mime_type(), adapter.size());
//! }
//!
//! let buffer = StringAdapter::new(&b"\x89PNG\r\n\x1a\n"[..]);
//! assert_eq!(buffer.mime_type().as_deref(), Some("image/png"));
//! assert!(buffer.filename().is_none());
//! ```

pub mod adapter;
pub mod config;
pub mod content_disposition;
pub mod detection;
pub mod error;
pub mod metadata;
pub mod source;
pub mod stream;
pub mod upload;

// Re-export primary types at the crate root for convenience.
pub use crate::adapter::{
    Contents, FileStreamAdapter, GenericStreamAdapter, HttpStreamAdapter, LocalFile,
    LocalFileAdapter, LocalPathAdapter, RemoteUrlAdapter, SourceAdapter, StringAdapter,
    UploadedFileAdapter,
};
pub use crate::config::HttpConfig;
pub use crate::error::SourceError;
pub use crate::metadata::Metadata;
pub use crate::source::{FileSource, SourceRef};
pub use crate::stream::{BufferedStream, FileHandle, FileStream, HttpStream, SharedStream};
pub use crate::upload::{UploadError, UploadedFile};

/// The crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
