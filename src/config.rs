//! HTTP transport configuration for the URL-backed adapters.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use serde::{Deserialize, Serialize};

/// Settings for the blocking HTTP client used by [`RemoteUrlAdapter`] and
/// [`HttpStream::open_with`].
///
/// Timeouts are the only way to bound a blocking adapter call.
///
/// [`RemoteUrlAdapter`]: crate::adapter::remote_url::RemoteUrlAdapter
/// [`HttpStream::open_with`]: crate::stream::HttpStream::open_with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Time allowed to establish a connection.
    pub connect_timeout: Duration,

    /// Time allowed for a whole request, body included.
    pub timeout: Duration,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Redirects followed before a request is considered failed.
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
            user_agent: format!("file-source/{}", crate::VERSION),
            max_redirects: 10,
        }
    }
}

impl HttpConfig {
    /// Build a blocking client honoring these settings.
    pub fn client(&self) -> reqwest::Result<Client> {
        Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .redirect(Policy::limited(self.max_redirects))
            .build()
    }
}
