//! Provider error type.

/// Errors from the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Transport-level failure (DNS, connection, TLS, body read).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The request did not finish within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),
}
