//! Upload descriptors handed over by upload-handling middleware.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why an upload did not complete.
///
/// Codes follow the conventional upload error numbering; `0` means success and
/// therefore has no variant here.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadError {
    #[error("the uploaded file exceeds the server's maximum upload size")]
    IniSize,
    #[error("the uploaded file exceeds the form's maximum upload size")]
    FormSize,
    #[error("the file was only partially uploaded")]
    Partial,
    #[error("no file was uploaded")]
    NoFile,
    #[error("no temporary directory is available")]
    NoTmpDir,
    #[error("the file could not be written to disk")]
    CantWrite,
    #[error("an extension stopped the upload")]
    Extension,
    #[error("unknown upload error code {0}")]
    Unknown(i32),
}

impl UploadError {
    /// Map a numeric transfer status to an error; `0` is success.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => None,
            1 => Some(UploadError::IniSize),
            2 => Some(UploadError::FormSize),
            3 => Some(UploadError::Partial),
            4 => Some(UploadError::NoFile),
            6 => Some(UploadError::NoTmpDir),
            7 => Some(UploadError::CantWrite),
            8 => Some(UploadError::Extension),
            other => Some(UploadError::Unknown(other)),
        }
    }

    /// The numeric transfer status.
    pub fn code(&self) -> i32 {
        match self {
            UploadError::IniSize => 1,
            UploadError::FormSize => 2,
            UploadError::Partial => 3,
            UploadError::NoFile => 4,
            UploadError::NoTmpDir => 6,
            UploadError::CantWrite => 7,
            UploadError::Extension => 8,
            UploadError::Unknown(code) => *code,
        }
    }
}

/// A file received by upload middleware.
///
/// Every field is what the middleware declared; nothing here is verified
/// against the temp file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Where the middleware stored the received bytes.
    pub temp_path: PathBuf,

    /// The name the client sent, possibly with directory components.
    pub original_name: String,

    /// The content type the client sent.
    pub mime_type: Option<String>,

    /// The size the client sent.
    pub size: Option<u64>,

    /// Transfer failure, `None` on success.
    pub error: Option<UploadError>,

    /// Set when the descriptor was built by a test harness rather than a real
    /// request.
    pub test: bool,
}

impl UploadedFile {
    /// A successfully transferred upload.
    pub fn new(temp_path: impl Into<PathBuf>, original_name: impl Into<String>) -> Self {
        Self {
            temp_path: temp_path.into(),
            original_name: original_name.into(),
            mime_type: None,
            size: None,
            error: None,
            test: false,
        }
    }

    /// Set the client-declared content type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Set the client-declared size.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the transfer status from its numeric code.
    pub fn with_error_code(mut self, code: i32) -> Self {
        self.error = UploadError::from_code(code);
        self
    }

    /// Mark the descriptor as built by a test harness.
    pub fn with_test_mode(mut self, test: bool) -> Self {
        self.test = test;
        self
    }

    /// Where the received bytes were stored.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Whether the transfer itself succeeded. Says nothing about the temp file.
    pub fn transferred(&self) -> bool {
        self.error.is_none()
    }
}
