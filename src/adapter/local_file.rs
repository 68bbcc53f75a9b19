//! Adapter for a file reference bound to a local path.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::{fs, Contents, SourceAdapter};
use crate::error::Result;
use crate::source::{FileSource, SourceRef};

/// A reference to a local file. Creating one never touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    /// Reference `path` without checking it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path as given, not resolved.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a regular file is at the path right now.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

/// Describes a [`LocalFile`].
#[derive(Debug, Clone)]
pub struct LocalFileAdapter {
    file: LocalFile,
}

impl LocalFileAdapter {
    /// Describe `file`. Nothing is checked until queried.
    pub fn new(file: LocalFile) -> Self {
        tracing::trace!(path = %file.path().display(), "local file adapter");
        Self { file }
    }

    /// The wrapped file reference.
    pub fn get_source(&self) -> &LocalFile {
        &self.file
    }
}

impl SourceAdapter for LocalFileAdapter {
    fn kind(&self) -> FileSource {
        FileSource::LocalFile
    }

    fn source(&self) -> SourceRef<'_> {
        SourceRef::LocalFile(&self.file)
    }

    fn path(&self) -> Option<String> {
        fs::display(self.file.path())
    }

    fn filename(&self) -> Option<String> {
        fs::filename(&fs::resolve(self.file.path())?)
    }

    fn mime_type(&self) -> Option<String> {
        fs::mime_type(self.file.path())
    }

    fn contents(&self) -> Result<Contents<'_>> {
        fs::read(self.file.path()).map(Contents::Bytes)
    }

    fn size(&self) -> Option<u64> {
        fs::size(self.file.path())
    }

    fn valid(&self) -> bool {
        fs::is_readable_file(self.file.path())
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        fs::modified(self.file.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_describes_existing_file() {
        let mut tmp = tempfile::NamedTempFile::with_suffix(".TXT").unwrap();
        write!(tmp, "hello").unwrap();
        tmp.flush().unwrap();

        let adapter = LocalFileAdapter::new(LocalFile::new(tmp.path()));
        assert!(adapter.valid());
        assert_eq!(adapter.size(), Some(5));
        assert_eq!(adapter.extension().as_deref(), Some("txt"));
        assert_eq!(adapter.mime_type().as_deref(), Some("text/plain"));
        assert!(adapter.last_modified().is_some());
        let SourceRef::LocalFile(file) = adapter.source() else {
            panic!("unexpected source {:?}", adapter.source());
        };
        assert!(std::ptr::eq(file, adapter.get_source()));
    }

    #[test]
    fn test_file_deleted_after_construction() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let path = tmp.path().to_path_buf();
        let adapter = LocalFileAdapter::new(LocalFile::new(&path));
        assert!(adapter.valid());
        assert!(adapter.get_source().exists());

        drop(tmp);
        assert!(!adapter.get_source().exists());
        assert!(!adapter.valid());
        assert!(adapter.size().is_none());
        assert!(adapter.mime_type().is_none());
        assert!(adapter.contents().is_err());
    }
}
