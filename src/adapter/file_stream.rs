//! Adapter for an open stream on a local file.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use super::{fs, Contents, SourceAdapter};
use crate::detection::{self, SNIFF_LEN};
use crate::error::{Result, SourceError};
use crate::source::{FileSource, SourceRef};
use crate::stream::{FileHandle, SharedStream};

/// Describes a borrowed handle on a local file.
///
/// `None` stands for an open that failed. The handle is never closed here, and
/// [`contents`](SourceAdapter::contents) reads from wherever the caller left it.
#[derive(Debug, Clone, Copy)]
pub struct FileStreamAdapter<'a> {
    handle: Option<FileHandle<'a>>,
}

impl<'a> FileStreamAdapter<'a> {
    /// Describe a bare `&File` or a `&FileStream`; pass `None` for a failed open.
    pub fn new<H: Into<FileHandle<'a>>>(handle: Option<H>) -> Self {
        Self {
            handle: handle.map(Into::into),
        }
    }

    /// The borrowed handle, `None` if the open failed.
    pub fn get_source(&self) -> Option<FileHandle<'a>> {
        self.handle
    }

    fn backing_path(&self) -> Option<PathBuf> {
        self.handle?.backing_path()
    }
}

impl SourceAdapter for FileStreamAdapter<'_> {
    fn kind(&self) -> FileSource {
        FileSource::FileStream
    }

    fn source(&self) -> SourceRef<'_> {
        SourceRef::FileStream(self.handle)
    }

    fn path(&self) -> Option<String> {
        self.backing_path().and_then(|p| fs::display(&p))
    }

    fn filename(&self) -> Option<String> {
        fs::filename(&self.backing_path()?)
    }

    fn mime_type(&self) -> Option<String> {
        let handle = self.handle?;
        let extension = self.extension();
        let head = || match handle.backing_path() {
            Some(path) => fs::head(&path),
            None => handle
                .file()
                .peek_shared(SNIFF_LEN)
                .map_err(|e| tracing::debug!(error = %e, "sniffing file stream failed"))
                .ok(),
        };
        detection::resolve(None, head, extension.as_deref())
    }

    fn contents(&self) -> Result<Contents<'_>> {
        let handle = self
            .handle
            .ok_or_else(|| SourceError::Unreadable("file stream failed to open".to_string()))?;
        Ok(Contents::Stream(Box::new(handle.file())))
    }

    /// Stat of the backing path, else `fstat` of the handle.
    fn size(&self) -> Option<u64> {
        let handle = self.handle?;
        if let Some(size) = handle.backing_path().and_then(|p| fs::size(&p)) {
            return Some(size);
        }
        handle
            .file()
            .metadata()
            .map_err(|e| tracing::debug!(error = %e, "fstat failed"))
            .ok()
            .filter(|meta| meta.is_file())
            .map(|meta| meta.len())
    }

    fn valid(&self) -> bool {
        match self.handle {
            Some(handle) => handle.file().metadata().is_ok(),
            None => false,
        }
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        let modified = self.handle?.file().metadata().ok()?.modified().ok()?;
        Some(DateTime::<Utc>::from(modified))
    }
}
