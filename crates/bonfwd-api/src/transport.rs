// Shared transport configuration for building reqwest::Client instances.
//
// Redirects are disabled on every client built here: the dashboard answers
// some requests with a redirect to a regional shard, and reqwest strips the
// Authorization header when following a redirect to another host. The
// client re-issues those requests itself (see `DashboardClient::execute`).

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;

use crate::error::Error;

/// Default `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("bonfwd/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: USER_AGENT.into(),
        }
    }
}

impl TransportConfig {
    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a `reqwest::Client` with the given default headers.
    ///
    /// Used by the dashboard client to inject the bearer `Authorization` header.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .default_headers(headers)
            .redirect(Policy::none())
            .build()
            .map_err(|e| Error::Http(format!("failed to build HTTP client: {e}")))
    }
}
