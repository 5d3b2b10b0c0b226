use thiserror::Error;

/// Top-level error type for the `bonfwd-api` crate.
///
/// Covers every failure mode of a dashboard call: authentication,
/// transport, structured API errors, and response decoding.
/// `bonfwd-core` maps these into pipeline-level outcomes.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The dashboard rejected the API key (HTTP 401).
    #[error("Invalid API key")]
    InvalidApiKey,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built, or a header value was invalid.
    #[error("HTTP client error: {0}")]
    Http(String),

    /// The dashboard kept redirecting past the hop limit.
    #[error("Too many redirects (last location: {location})")]
    TooManyRedirects { location: String },

    // ── Dashboard ───────────────────────────────────────────────────
    /// Rate limited by the dashboard. Surfaced as-is, never retried.
    #[error("Rate limited -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Structured error from the `{"errors": [...]}` envelope.
    #[error("Dashboard API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns `true` if the connection could not be established.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_are_neither_timeouts_nor_connect_failures() {
        let err = Error::Api {
            status: 503,
            message: "unavailable".into(),
        };
        assert!(!err.is_timeout());
        assert!(!err.is_connect());
        assert!(!Error::InvalidApiKey.is_connect());
    }

    #[test]
    fn display_includes_status_and_message() {
        let err = Error::Api {
            status: 400,
            message: "VLAN ID must be between 1 and 4094".into(),
        };
        assert_eq!(
            err.to_string(),
            "Dashboard API error (HTTP 400): VLAN ID must be between 1 and 4094"
        );
    }
}
