//! HTTP query surface for the pNode Atlas gateway.
//!
//! Exposes the core's list/detail/score/stats operations as GET routes
//! with a short-TTL public cache-control policy. The router is exported so
//! integration tests can serve it against a mocked upstream.

pub mod router;
