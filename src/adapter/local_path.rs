//! Adapter for a raw local path.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::{fs, Contents, SourceAdapter};
use crate::error::Result;
use crate::source::{FileSource, SourceRef};

/// Describes whatever is at a local path. The path is resolved on every
/// query, never at construction.
#[derive(Debug, Clone)]
pub struct LocalPathAdapter {
    path: PathBuf,
}

impl LocalPathAdapter {
    /// Describe `path`, relative or absolute.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path exactly as given.
    pub fn get_source(&self) -> &Path {
        &self.path
    }
}

impl SourceAdapter for LocalPathAdapter {
    fn kind(&self) -> FileSource {
        FileSource::LocalPath
    }

    fn source(&self) -> SourceRef<'_> {
        SourceRef::LocalPath(&self.path)
    }

    fn path(&self) -> Option<String> {
        fs::display(&self.path)
    }

    fn filename(&self) -> Option<String> {
        fs::filename(&fs::resolve(&self.path)?)
    }

    fn mime_type(&self) -> Option<String> {
        fs::mime_type(&self.path)
    }

    fn contents(&self) -> Result<Contents<'_>> {
        fs::read(&self.path).map(Contents::Bytes)
    }

    fn size(&self) -> Option<u64> {
        fs::size(&self.path)
    }

    fn valid(&self) -> bool {
        fs::is_readable_file(&self.path)
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        fs::modified(&self.path)
    }
}
