//! Adapter for an upload descriptor.
//!
//! The name comes from what the client declared; everything physical (path,
//! size, readability) comes from the temp file the middleware wrote.

use chrono::{DateTime, Utc};

use super::{fs, Contents, SourceAdapter};
use crate::detection;
use crate::error::{Result, SourceError};
use crate::source::{FileSource, SourceRef};
use crate::upload::UploadedFile;

/// Describes an [`UploadedFile`].
#[derive(Debug, Clone)]
pub struct UploadedFileAdapter {
    upload: UploadedFile,
}

impl UploadedFileAdapter {
    /// Describe `upload`. Nothing is checked until queried.
    pub fn new(upload: UploadedFile) -> Self {
        tracing::trace!(
            temp_path = %upload.temp_path.display(),
            original_name = %upload.original_name,
            "uploaded file adapter"
        );
        Self { upload }
    }

    /// The wrapped upload descriptor.
    pub fn get_source(&self) -> &UploadedFile {
        &self.upload
    }
}

impl SourceAdapter for UploadedFileAdapter {
    fn kind(&self) -> FileSource {
        FileSource::UploadedFile
    }

    fn source(&self) -> SourceRef<'_> {
        SourceRef::UploadedFile(&self.upload)
    }

    fn path(&self) -> Option<String> {
        fs::display(&self.upload.temp_path)
    }

    fn filename(&self) -> Option<String> {
        detection::basename(&self.upload.original_name)
    }

    fn mime_type(&self) -> Option<String> {
        let extension = self.extension();
        let head = || fs::head(&self.upload.temp_path);
        detection::resolve(self.upload.mime_type.as_deref(), head, extension.as_deref())
    }

    fn contents(&self) -> Result<Contents<'_>> {
        if let Some(error) = self.upload.error {
            return Err(SourceError::Unreadable(error.to_string()));
        }
        fs::read(&self.upload.temp_path).map(Contents::Bytes)
    }

    /// Size of the temp file, or the declared size when it cannot be stat'ed.
    fn size(&self) -> Option<u64> {
        fs::size(&self.upload.temp_path).or(self.upload.size)
    }

    fn valid(&self) -> bool {
        let transferred = self.upload.transferred();
        let present = fs::is_readable_file(&self.upload.temp_path);
        if !transferred {
            tracing::debug!(error = ?self.upload.error, "upload failed in transfer");
        }
        transferred && present
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        fs::modified(&self.upload.temp_path)
    }
}
