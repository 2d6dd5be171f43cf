use std::fmt;
use thiserror::Error;

/// Errors from a single attempt against one upstream endpoint.
///
/// All variants count as attempt failures for the retry loop; none of them
/// is surfaced to callers directly. Network messages are sanitized to a
/// fixed set of category strings so endpoint internals don't leak into
/// logs or responses.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum UpstreamError {
    /// Request exceeded the configured per-attempt timeout.
    #[error("request timed out")]
    Timeout,

    /// Failed to establish or hold a connection to the endpoint.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP-level error (non-2xx status code).
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// JSON-RPC error returned in the response body.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Response body could not be parsed or had an unexpected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("client initialization failed: {0}")]
    ClientBuild(String),
}

impl UpstreamError {
    /// Maps a transport error to a sanitized variant.
    #[must_use]
    pub fn from_network(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::ConnectionFailed("connection refused or unreachable".to_string())
        } else if error.is_body() || error.is_decode() {
            Self::InvalidResponse("response body error".to_string())
        } else if error.is_redirect() {
            Self::ConnectionFailed("too many redirects".to_string())
        } else if error.is_request() {
            Self::ConnectionFailed("request failed".to_string())
        } else {
            Self::ConnectionFailed("network error".to_string())
        }
    }
}

/// Record of one endpoint whose retry budget was exhausted.
#[derive(Debug)]
pub struct EndpointFailure {
    /// Configured endpoint name.
    pub endpoint: String,
    /// Attempts issued before giving up.
    pub attempts: u32,
    /// The failure observed on the final attempt.
    pub last_error: UpstreamError,
}

impl fmt::Display for EndpointFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed after {} attempts: {}",
            self.endpoint, self.attempts, self.last_error
        )
    }
}

/// Batch-level fetch failure: every configured endpoint was exhausted.
///
/// Carries one [`EndpointFailure`] per endpoint so the log line and the
/// service-unavailable response can say what actually happened. The caller
/// receives no partial data.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("all {} membership endpoints failed", .failures.len())]
    AllEndpointsFailed { failures: Vec<EndpointFailure> },
}
