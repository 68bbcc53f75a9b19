//! Error types for the file-source library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by adapter operations that hand out content.
///
/// Metadata queries never return these; they fold failures into `None` and
/// `valid() == false` instead.
#[derive(Error, Debug)]
pub enum SourceError {
    /// An I/O error occurred while reading the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An HTTP error occurred while fetching a remote source.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The source does not resolve to anything on disk.
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The source exists but cannot currently be read.
    #[error("Unreadable source: {0}")]
    Unreadable(String),

    /// The provided source is unusable for the requested operation.
    #[error("Invalid source: {0}")]
    InvalidSource(String),
}

/// Convenience type alias for Results using SourceError.
pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = SourceError::NotFound(PathBuf::from("/tmp/missing.png"));
        assert_eq!(err.to_string(), "Not found: /tmp/missing.png");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SourceError = io.into();
        assert!(matches!(err, SourceError::Io(_)));
    }
}
