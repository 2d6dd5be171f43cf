use bytes::Bytes;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::upstream::UpstreamError;

/// Connect timeout for new upstream connections.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Thin JSON-POST client over reqwest.
///
/// Retry and backoff live in the fetch loop, not here: one call is one
/// attempt, bounded by the caller-supplied timeout. When the timeout fires
/// the in-flight request is aborted and never produces late data.
pub struct HttpClient {
    client: Client,
}

// Note: Default is intentionally NOT implemented because HttpClient::new()
// can fail. Callers handle the Result explicitly.

impl HttpClient {
    /// Creates the underlying reqwest client.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::ClientBuild`] if the client fails to build.
    pub fn new() -> Result<Self, UpstreamError> {
        let client = ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("pnode-atlas/", env!("CARGO_PKG_VERSION")))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build http client");
                UpstreamError::ClientBuild(e.to_string())
            })?;

        Ok(Self { client })
    }

    /// Sends one HTTP POST with a JSON body, bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Timeout`] if the request exceeds `timeout`
    /// - [`UpstreamError::HttpStatus`] for non-success status codes
    /// - [`UpstreamError::ConnectionFailed`] for transport failures
    ///   (sanitized message)
    pub async fn post_json(
        &self,
        url: &str,
        body: Bytes,
        timeout: Duration,
    ) -> Result<Bytes, UpstreamError> {
        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .body(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::from_network(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::HttpStatus(status.as_u16()));
        }

        response.bytes().await.map_err(|e| UpstreamError::from_network(&e))
    }
}
