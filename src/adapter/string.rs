//! Adapter for an in-memory byte buffer.

use bytes::Bytes;

use super::{Contents, SourceAdapter};
use crate::detection::{self, SNIFF_LEN};
use crate::error::Result;
use crate::source::{FileSource, SourceRef};

/// Describes a byte buffer. There is no location and no name, so `path`,
/// `filename` and `extension` are always `None`.
#[derive(Debug, Clone)]
pub struct StringAdapter {
    data: Bytes,
}

impl StringAdapter {
    /// Wrap `data`; `Vec<u8>`, `&'static [u8]`, `String` and `&'static str` all convert.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// The wrapped buffer.
    pub fn get_source(&self) -> &Bytes {
        &self.data
    }
}

impl SourceAdapter for StringAdapter {
    fn kind(&self) -> FileSource {
        FileSource::String
    }

    fn source(&self) -> SourceRef<'_> {
        SourceRef::String(&self.data)
    }

    fn path(&self) -> Option<String> {
        None
    }

    fn filename(&self) -> Option<String> {
        None
    }

    fn mime_type(&self) -> Option<String> {
        detection::sniff(&self.data[..self.data.len().min(SNIFF_LEN)])
    }

    fn contents(&self) -> Result<Contents<'_>> {
        Ok(Contents::Bytes(self.data.clone()))
    }

    fn size(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }

    fn valid(&self) -> bool {
        true
    }
}
