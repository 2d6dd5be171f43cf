//! Resilient membership retrieval from the upstream pRPC cluster.
//!
//! A single logical fetch walks the configured endpoints in strict priority
//! order. Each endpoint gets a bounded number of attempts with capped
//! exponential backoff between them; every attempt carries its own timeout
//! and cancellation boundary. Per-attempt failures are absorbed here - only
//! whole-fetch exhaustion crosses the module boundary.

pub mod errors;
pub mod http_client;
pub mod membership;
pub mod retry;

pub use errors::{EndpointFailure, FetchError, UpstreamError};
pub use http_client::HttpClient;
pub use membership::MembershipClient;
pub use retry::RetryPolicy;
