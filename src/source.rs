//! Source kinds and borrowed views of wrapped sources.

use std::fmt;
use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::adapter::local_file::LocalFile;
use crate::stream::{FileHandle, HttpStream, SharedStream};
use crate::upload::UploadedFile;

/// Identifies which adapter variant is describing a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileSource {
    /// A file reference bound to a local path.
    LocalFile,
    /// An upload descriptor produced by upload middleware.
    UploadedFile,
    /// A raw local path.
    LocalPath,
    /// A raw HTTP/HTTPS URL.
    RemoteUrl,
    /// An in-memory byte buffer.
    String,
    /// An open stream on a local file.
    FileStream,
    /// An open stream on an HTTP response.
    HttpStream,
    /// An open stream with no location semantics.
    GenericStream,
}

impl fmt::Display for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSource::LocalFile => write!(f, "LocalFile"),
            FileSource::UploadedFile => write!(f, "UploadedFile"),
            FileSource::LocalPath => write!(f, "LocalPath"),
            FileSource::RemoteUrl => write!(f, "RemoteUrl"),
            FileSource::String => write!(f, "String"),
            FileSource::FileStream => write!(f, "FileStream"),
            FileSource::HttpStream => write!(f, "HttpStream"),
            FileSource::GenericStream => write!(f, "GenericStream"),
        }
    }
}

/// A borrowed view of the exact value an adapter was constructed around.
///
/// Stream variants carry `None` when the caller's open attempt failed.
#[derive(Clone, Copy)]
pub enum SourceRef<'a> {
    /// The file reference.
    LocalFile(&'a LocalFile),
    /// The upload descriptor.
    UploadedFile(&'a UploadedFile),
    /// The path as given.
    LocalPath(&'a Path),
    /// The URL as given.
    RemoteUrl(&'a str),
    /// The byte buffer.
    String(&'a Bytes),
    /// The borrowed file handle.
    FileStream(Option<FileHandle<'a>>),
    /// The borrowed response stream.
    HttpStream(Option<&'a HttpStream>),
    /// The borrowed stream.
    GenericStream(Option<&'a dyn SharedStream>),
}

impl SourceRef<'_> {
    /// The kind of adapter this source belongs to.
    pub fn kind(&self) -> FileSource {
        match self {
            SourceRef::LocalFile(_) => FileSource::LocalFile,
            SourceRef::UploadedFile(_) => FileSource::UploadedFile,
            SourceRef::LocalPath(_) => FileSource::LocalPath,
            SourceRef::RemoteUrl(_) => FileSource::RemoteUrl,
            SourceRef::String(_) => FileSource::String,
            SourceRef::FileStream(_) => FileSource::FileStream,
            SourceRef::HttpStream(_) => FileSource::HttpStream,
            SourceRef::GenericStream(_) => FileSource::GenericStream,
        }
    }
}

impl fmt::Debug for SourceRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::LocalFile(file) => f.debug_tuple("LocalFile").field(file).finish(),
            SourceRef::UploadedFile(upload) => {
                f.debug_tuple("UploadedFile").field(upload).finish()
            }
            SourceRef::LocalPath(path) => f.debug_tuple("LocalPath").field(path).finish(),
            SourceRef::RemoteUrl(url) => f.debug_tuple("RemoteUrl").field(url).finish(),
            SourceRef::String(buf) => f
                .debug_struct("String")
                .field("len", &buf.len())
                .finish(),
            SourceRef::FileStream(handle) => {
                f.debug_tuple("FileStream").field(handle).finish()
            }
            SourceRef::HttpStream(stream) => f
                .debug_tuple("HttpStream")
                .field(&stream.map(|s| s.url()))
                .finish(),
            SourceRef::GenericStream(stream) => f
                .debug_struct("GenericStream")
                .field("open", &stream.is_some())
                .finish(),
        }
    }
}
