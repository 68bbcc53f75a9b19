//! Adapter for an open HTTP response stream.

use chrono::{DateTime, Utc};
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, LAST_MODIFIED};

use super::remote_url::{filename_from_url, parse_http_date};
use super::{Contents, SourceAdapter};
use crate::content_disposition::declared_filename;
use crate::detection::{self, SNIFF_LEN};
use crate::error::{Result, SourceError};
use crate::source::{FileSource, SourceRef};
use crate::stream::HttpStream;

/// Describes a borrowed [`HttpStream`]. `None` stands for an open that failed.
///
/// Everything except [`contents`](SourceAdapter::contents) is answered from
/// what the stream recorded when it was opened; nothing is re-requested.
#[derive(Debug, Clone, Copy)]
pub struct HttpStreamAdapter<'a> {
    stream: Option<&'a HttpStream>,
}

impl<'a> HttpStreamAdapter<'a> {
    /// Describe an opened response; pass `None` for a failed open.
    pub fn new(stream: Option<&'a HttpStream>) -> Self {
        Self { stream }
    }

    /// The borrowed response stream, `None` if the open failed.
    pub fn get_source(&self) -> Option<&'a HttpStream> {
        self.stream
    }
}

impl SourceAdapter for HttpStreamAdapter<'_> {
    fn kind(&self) -> FileSource {
        FileSource::HttpStream
    }

    fn source(&self) -> SourceRef<'_> {
        SourceRef::HttpStream(self.stream)
    }

    fn path(&self) -> Option<String> {
        self.stream.map(|s| s.url().to_string())
    }

    /// The `Content-Disposition` name if the server sent one, else the last
    /// segment of the URL path.
    fn filename(&self) -> Option<String> {
        let stream = self.stream?;
        stream
            .header(CONTENT_DISPOSITION)
            .and_then(declared_filename)
            .or_else(|| filename_from_url(stream.url()))
    }

    fn mime_type(&self) -> Option<String> {
        let stream = self.stream?;
        let extension = self.extension();
        let head = || {
            stream
                .peek(SNIFF_LEN)
                .map_err(|e| tracing::debug!(url = stream.url(), error = %e, "peek failed"))
                .ok()
        };
        detection::resolve(stream.header(CONTENT_TYPE), head, extension.as_deref())
    }

    fn contents(&self) -> Result<Contents<'_>> {
        let stream = self
            .stream
            .ok_or_else(|| SourceError::Unreadable("HTTP stream failed to open".to_string()))?;
        Ok(Contents::Stream(Box::new(stream)))
    }

    fn size(&self) -> Option<u64> {
        self.stream?.content_length()
    }

    fn valid(&self) -> bool {
        self.stream.is_some_and(|s| s.status().is_success())
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        parse_http_date(self.stream?.header(LAST_MODIFIED)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_open_is_invalid() {
        let adapter = HttpStreamAdapter::new(None);
        assert!(!adapter.valid());
        assert!(adapter.path().is_none());
        assert!(adapter.filename().is_none());
        assert!(adapter.extension().is_none());
        assert!(adapter.mime_type().is_none());
        assert!(adapter.size().is_none());
        assert!(adapter.last_modified().is_none());
        assert!(matches!(adapter.contents(), Err(SourceError::Unreadable(_))));
        assert!(matches!(adapter.source(), SourceRef::HttpStream(None)));
    }
}
