//! Error types for talking to the backend.

use thiserror::Error;

/// A failed fetch. Caught at the poll boundary and turned into a log entry;
/// the next tick is the retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Backend answered with a non-2xx status.
    #[error("HTTP {0}")]
    Status(u16),

    /// Connection refused, reset, DNS failure...
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    /// Body was not the expected JSON.
    #[error("invalid response: {0}")]
    Parse(String),

    #[error("invalid URL: {0}")]
    Url(String),

    /// The `--tls-ca` certificate could not be read or parsed.
    #[error("TLS setup failed: {0}")]
    Tls(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::Url(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reads_like_the_dashboard_message() {
        assert_eq!(FetchError::Status(503).to_string(), "HTTP 503");
        assert_eq!(FetchError::Timeout.to_string(), "request timed out");
        assert_eq!(
            FetchError::Tls("bad pem".into()).to_string(),
            "TLS setup failed: bad pem"
        );
    }
}
