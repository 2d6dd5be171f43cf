use bytes::Bytes;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::{
    types::{ClusterNode, RpcEndpoint, RpcEnvelope, RpcRequest},
    upstream::{
        errors::{EndpointFailure, FetchError, UpstreamError},
        http_client::HttpClient,
        retry::RetryPolicy,
    },
};

/// Fetches the raw membership listing from the upstream pRPC cluster.
///
/// One logical fetch is all-or-nothing: endpoints are walked strictly in
/// priority order, each with its own retry budget, and the first endpoint
/// to answer wins. Attempts against different endpoints are never issued
/// concurrently. Only when every endpoint is exhausted does the call fail,
/// with an aggregate error naming each endpoint's final failure.
pub struct MembershipClient {
    endpoints: Vec<RpcEndpoint>,
    http: HttpClient,
    retry: RetryPolicy,
    request_timeout: Duration,
    /// The fixed `getClusterNodes` request body, serialized once.
    request_body: Bytes,
}

impl MembershipClient {
    /// Creates a membership client over the given endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::ClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(
        endpoints: Vec<RpcEndpoint>,
        retry: RetryPolicy,
        request_timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let http = HttpClient::new()?;
        let request_body = serde_json::to_vec(&RpcRequest::get_cluster_nodes())
            .map(Bytes::from)
            .map_err(|e| UpstreamError::ClientBuild(format!("request serialization failed: {e}")))?;

        Ok(Self { endpoints, http, retry, request_timeout, request_body })
    }

    /// Retrieves the current membership listing.
    ///
    /// Returns every record that parsed; malformed records are dropped with
    /// a warning and do not fail the batch.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::AllEndpointsFailed`] once every configured
    /// endpoint's retry budget is exhausted. No partial data is returned.
    pub async fn fetch_membership(&self) -> Result<Vec<ClusterNode>, FetchError> {
        let mut failures = Vec::with_capacity(self.endpoints.len());

        for endpoint in &self.endpoints {
            match self.fetch_from_endpoint(endpoint).await {
                Ok(records) => {
                    debug!(
                        endpoint = %endpoint.name,
                        records = records.len(),
                        "membership fetched"
                    );
                    return Ok(records);
                }
                Err(failure) => {
                    warn!(
                        endpoint = %failure.endpoint,
                        attempts = failure.attempts,
                        error = %failure.last_error,
                        "membership endpoint exhausted, falling back"
                    );
                    failures.push(failure);
                }
            }
        }

        error!(endpoints = failures.len(), "all membership endpoints failed");
        Err(FetchError::AllEndpointsFailed { failures })
    }

    /// Runs the bounded retry loop against a single endpoint.
    async fn fetch_from_endpoint(
        &self,
        endpoint: &RpcEndpoint,
    ) -> Result<Vec<ClusterNode>, EndpointFailure> {
        let mut last_error = UpstreamError::ConnectionFailed("no attempts made".to_string());

        for attempt in 0..self.retry.max_retries {
            match self.attempt(endpoint).await {
                Ok(records) => return Ok(records),
                Err(e) => {
                    debug!(
                        endpoint = %endpoint.name,
                        attempt,
                        error = %e,
                        "membership attempt failed"
                    );
                    last_error = e;
                }
            }

            if attempt + 1 < self.retry.max_retries {
                tokio::time::sleep(self.retry.backoff_delay(attempt)).await;
            }
        }

        Err(EndpointFailure {
            endpoint: endpoint.name.clone(),
            attempts: self.retry.max_retries,
            last_error,
        })
    }

    /// Issues one `getClusterNodes` attempt and parses the envelope.
    async fn attempt(&self, endpoint: &RpcEndpoint) -> Result<Vec<ClusterNode>, UpstreamError> {
        let body = self
            .http
            .post_json(&endpoint.url, self.request_body.clone(), self.request_timeout)
            .await?;

        let envelope: RpcEnvelope = serde_json::from_slice(&body)
            .map_err(|e| UpstreamError::InvalidResponse(format!("invalid JSON: {e}")))?;

        if let Some(rpc_error) = envelope.error {
            let message = if rpc_error.message.is_empty() {
                "RPC error".to_string()
            } else {
                rpc_error.message
            };
            return Err(UpstreamError::Rpc(message));
        }

        // An absent or null result member means an empty cluster, not a
        // failure.
        let result = match envelope.result {
            None | Some(Value::Null) => Value::Array(Vec::new()),
            Some(value) => value,
        };
        let Value::Array(raw) = result else {
            return Err(UpstreamError::InvalidResponse("result is not an array".to_string()));
        };

        Ok(parse_records(raw))
    }
}

/// Deserializes records individually so one malformed element cannot sink
/// the batch. A record without an identity is a data-quality event, not a
/// fetch failure.
fn parse_records(raw: Vec<Value>) -> Vec<ClusterNode> {
    let mut records = Vec::with_capacity(raw.len());

    for value in raw {
        match serde_json::from_value::<ClusterNode>(value) {
            Ok(record) if record.pubkey.is_empty() => {
                warn!("dropping membership record with empty identity");
            }
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(error = %e, "dropping malformed membership record");
            }
        }
    }

    records
}
