//! Adapter for a stream with no location semantics, such as an in-memory
//! cursor.

use super::{Contents, SourceAdapter};
use crate::detection::{self, SNIFF_LEN};
use crate::error::{Result, SourceError};
use crate::source::{FileSource, SourceRef};
use crate::stream::{seek_len, SharedStream, StreamReader};

/// Identifier reported as the path of a generic stream.
pub const MEMORY_STREAM: &str = "memory";

/// Describes a borrowed [`SharedStream`]. `None` stands for an open that
/// failed.
///
/// Sniffing never consumes bytes: seekable streams are rewound and put back,
/// a [`BufferedStream`](crate::stream::BufferedStream) is peeked, anything else
/// has no MIME type. Only seekable streams have a size.
/// [`contents`](SourceAdapter::contents) reads on from the current position.
///
/// A live pipe or socket is valid even though it cannot seek.
#[derive(Clone, Copy)]
pub struct GenericStreamAdapter<'a> {
    stream: Option<&'a dyn SharedStream>,
    identifier: &'static str,
}

impl<'a> GenericStreamAdapter<'a> {
    /// Describe `stream`, reporting [`MEMORY_STREAM`] as its path.
    pub fn new(stream: Option<&'a dyn SharedStream>) -> Self {
        Self {
            stream,
            identifier: MEMORY_STREAM,
        }
    }

    /// Report `identifier` as the path instead of [`MEMORY_STREAM`].
    pub fn with_identifier(mut self, identifier: &'static str) -> Self {
        self.identifier = identifier;
        self
    }

    /// The borrowed stream, `None` if the open failed.
    pub fn get_source(&self) -> Option<&'a dyn SharedStream> {
        self.stream
    }
}

impl SourceAdapter for GenericStreamAdapter<'_> {
    fn kind(&self) -> FileSource {
        FileSource::GenericStream
    }

    fn source(&self) -> SourceRef<'_> {
        SourceRef::GenericStream(self.stream)
    }

    fn path(&self) -> Option<String> {
        Some(self.identifier.to_string())
    }

    fn filename(&self) -> Option<String> {
        None
    }

    fn mime_type(&self) -> Option<String> {
        let head = self
            .stream?
            .peek_shared(SNIFF_LEN)
            .map_err(|e| tracing::debug!(error = %e, "sniffing stream failed"))
            .ok()?;
        detection::sniff(&head)
    }

    fn contents(&self) -> Result<Contents<'_>> {
        let stream = self
            .stream
            .ok_or_else(|| SourceError::Unreadable("stream failed to open".to_string()))?;
        Ok(Contents::Stream(Box::new(StreamReader::new(stream))))
    }

    fn size(&self) -> Option<u64> {
        seek_len(self.stream?)
            .map_err(|e| tracing::debug!(error = %e, "measuring stream failed"))
            .ok()
    }

    fn valid(&self) -> bool {
        self.stream.is_some_and(|s| s.is_live())
    }
}

impl std::fmt::Debug for GenericStreamAdapter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericStreamAdapter")
            .field("open", &self.stream.is_some())
            .field("identifier", &self.identifier)
            .finish()
    }
}
