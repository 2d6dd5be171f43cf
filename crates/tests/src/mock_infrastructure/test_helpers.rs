//! Shared helpers for wiring the fetch layer to mock endpoints.

use std::time::Duration;

use atlas_core::{
    types::RpcEndpoint,
    upstream::{MembershipClient, RetryPolicy},
};

/// A retry policy with real attempt counts but millisecond backoff, so
/// exhaustion tests finish quickly.
#[must_use]
pub fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(4),
    }
}

/// Builds endpoint configs from `(name, url)` pairs, in priority order.
#[must_use]
pub fn endpoints(pairs: &[(&str, &str)]) -> Vec<RpcEndpoint> {
    pairs
        .iter()
        .map(|(name, url)| RpcEndpoint { name: (*name).to_string(), url: (*url).to_string() })
        .collect()
}

/// Builds a membership client over mock endpoints with fast backoff.
#[must_use]
pub fn membership_client(pairs: &[(&str, &str)], max_retries: u32) -> MembershipClient {
    MembershipClient::new(endpoints(pairs), fast_retry(max_retries), Duration::from_secs(2))
        .expect("membership client builds")
}
