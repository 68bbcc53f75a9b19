//! Adapter for a raw remote URL.
//!
//! Each metadata query opens its own short-lived GET, looks at the status and
//! headers, and drops the response. The body is only touched when the headers
//! cannot answer: no `Content-Length` means counting it, no usable
//! `Content-Type` means sniffing its first bytes.

use std::io;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, Response};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED};

use super::{Contents, SourceAdapter};
use crate::config::HttpConfig;
use crate::detection::{self, SNIFF_LEN};
use crate::error::{Result, SourceError};
use crate::source::{FileSource, SourceRef};
use crate::stream::read_up_to;

/// Describes the resource behind an HTTP or HTTPS URL.
#[derive(Debug, Clone)]
pub struct RemoteUrlAdapter {
    url: String,
    client: Option<Client>,
}

impl RemoteUrlAdapter {
    /// Describe `url` using a default-configured client.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_config(url, &HttpConfig::default())
    }

    /// Describe `url` using a client built from `config`.
    ///
    /// A client that fails to build leaves the adapter permanently invalid
    /// rather than failing construction.
    pub fn with_config(url: impl Into<String>, config: &HttpConfig) -> Self {
        let url = url.into();
        let client = config
            .client()
            .map_err(|e| tracing::warn!(url = %url, error = %e, "failed to build HTTP client"))
            .ok();
        Self { url, client }
    }

    /// Describe `url` through an existing client.
    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client: Some(client),
        }
    }

    /// The URL exactly as given.
    pub fn get_source(&self) -> &str {
        &self.url
    }

    /// A successful response with its body still unread.
    fn probe(&self) -> Option<Response> {
        let client = self.client.as_ref()?;
        match client.get(&self.url).send() {
            Ok(response) if response.status().is_success() => Some(response),
            Ok(response) => {
                tracing::debug!(url = %self.url, status = %response.status(), "URL probe rejected");
                None
            }
            Err(e) => {
                tracing::debug!(url = %self.url, error = %e, "URL probe failed");
                None
            }
        }
    }
}

impl SourceAdapter for RemoteUrlAdapter {
    fn kind(&self) -> FileSource {
        FileSource::RemoteUrl
    }

    fn source(&self) -> SourceRef<'_> {
        SourceRef::RemoteUrl(&self.url)
    }

    fn path(&self) -> Option<String> {
        Some(self.url.clone())
    }

    fn filename(&self) -> Option<String> {
        filename_from_url(&self.url)
    }

    fn mime_type(&self) -> Option<String> {
        let extension = self.extension();
        let mut response = self.probe()?;
        let declared = header(&response, CONTENT_TYPE).map(str::to_string);
        let head = || read_up_to(&mut response, SNIFF_LEN).ok();
        detection::resolve(declared.as_deref(), head, extension.as_deref())
    }

    fn contents(&self) -> Result<Contents<'_>> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| SourceError::InvalidSource(format!("no HTTP client for {}", self.url)))?;
        let body = client.get(&self.url).send()?.error_for_status()?.bytes()?;
        Ok(Contents::Bytes(body))
    }

    fn size(&self) -> Option<u64> {
        let mut response = self.probe()?;
        if let Some(len) = header(&response, CONTENT_LENGTH).and_then(|v| v.trim().parse().ok()) {
            return Some(len);
        }
        io::copy(&mut response, &mut io::sink())
            .map_err(|e| tracing::debug!(url = %self.url, error = %e, "counting body failed"))
            .ok()
    }

    fn valid(&self) -> bool {
        self.probe().is_some()
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        let response = self.probe()?;
        parse_http_date(header(&response, LAST_MODIFIED)?)
    }
}

fn header(response: &Response, name: reqwest::header::HeaderName) -> Option<&str> {
    response.headers().get(name)?.to_str().ok()
}

/// Last non-empty segment of a URL's path.
pub(super) fn filename_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    detection::basename(segment)
}

pub(super) fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
