//! Core type definitions for the pRPC wire protocol and the synthesized
//! node model.
//!
//! # Type Categories
//!
//! ## Wire Protocol Types
//! - [`RpcRequest`], [`RpcEnvelope`], [`RpcErrorBody`]: JSON-RPC 2.0 framing
//!   for the upstream `getClusterNodes` call
//! - [`ClusterNode`]: one raw membership record as the cluster reports it
//!
//! ## Domain Types
//! - [`Node`], [`Health`], [`Location`], [`Storage`]: the synthesized,
//!   externally visible entity
//! - [`NodeScore`]: ephemeral composite score, recomputed on demand
//! - [`NodeList`], [`NetworkStats`]: query surface response shapes
//!
//! Field names follow the wire contracts exactly: the upstream reports
//! camelCase (`featureSet`, `shredVersion`) and the read API serves
//! camelCase (`lastSeen`, `lastUpdated`), so serde renames are applied at
//! the type level rather than ad hoc.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// JSON-RPC protocol version constant.
pub const JSONRPC_VERSION: &str = "2.0";

/// Pre-allocated `Cow` for the JSON-RPC version - zero allocation for
/// static usage.
pub const JSONRPC_VERSION_COW: Cow<'static, str> = Cow::Borrowed(JSONRPC_VERSION);

/// The single upstream method this gateway issues.
pub const GET_CLUSTER_NODES: &str = "getClusterNodes";

/// JSON-RPC 2.0 request for the upstream membership call.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: Cow<'static, str>,
    pub id: u32,
    pub method: Cow<'static, str>,
}

impl RpcRequest {
    /// Builds the fixed `getClusterNodes` request.
    #[must_use]
    pub fn get_cluster_nodes() -> Self {
        Self { jsonrpc: JSONRPC_VERSION_COW, id: 1, method: Cow::Borrowed(GET_CLUSTER_NODES) }
    }
}

/// JSON-RPC 2.0 response envelope from the upstream.
///
/// Carries either `result` (an array of raw membership records) or `error`.
/// Both are optional at the serde level; an envelope with neither is treated
/// as an empty membership list, matching upstream behavior for quiet
/// clusters.
#[derive(Debug, Deserialize)]
pub struct RpcEnvelope {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<RpcErrorBody>,
}

/// Error member of a JSON-RPC response.
#[derive(Debug, Deserialize)]
pub struct RpcErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

/// One raw membership record as reported by `getClusterNodes`.
///
/// `pubkey` is the opaque, globally unique identity and is the only
/// required field; a record without it fails to parse and is dropped from
/// the batch. Presence of the remaining fields is modeled with `Option`,
/// never truthiness - health classification is a pure function over these
/// options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNode {
    pub pubkey: String,
    #[serde(default)]
    pub gossip: Option<String>,
    #[serde(default)]
    pub tpu: Option<String>,
    #[serde(default)]
    pub rpc: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub feature_set: Option<u32>,
    #[serde(default)]
    pub shred_version: u16,
}

/// Health classification of a synthesized node.
///
/// Derived from field presence on the raw record: a node with neither a
/// gossip nor an RPC address is `down`; one missing its version or RPC
/// address is `degraded`; otherwise `healthy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Healthy,
    Degraded,
    Down,
}

impl Health {
    /// Returns the lowercase wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Health::Healthy => "healthy",
            Health::Degraded => "degraded",
            Health::Down => "down",
        }
    }
}

impl std::fmt::Display for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic placement assigned deterministically from the node identity.
///
/// Not a real geographic signal: the city comes from a fixed catalog bucket
/// and the coordinates carry a small identity-derived jitter so co-located
/// nodes don't overlap exactly on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub city: String,
    pub country: String,
}

/// Storage unit label for the synthetic storage figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageUnit {
    #[serde(rename = "GB")]
    Gigabytes,
    #[serde(rename = "TB")]
    Terabytes,
}

/// Synthetic storage figures. `used` is a 0..100 fill level against a fixed
/// `total` of 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    pub used: u32,
    pub total: u32,
    pub unit: StorageUnit,
}

/// The synthesized, externally visible pNode entity.
///
/// Created fresh on every fetch cycle and never mutated after
/// construction. `name` depends on the record's ordinal position in the
/// current result set, so it is not stable across fetches if upstream
/// ordering shifts; `id` and all metric fields are pure functions of the
/// identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub name: String,
    pub location: Location,
    pub health: Health,
    pub storage: Storage,
    pub latency: u64,
    pub uptime: u32,
    pub last_seen: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pubkey: Option<String>,
    /// Overall composite score, attached only when scoring is requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

/// Composite score with its sub-scores, each in `[0, 100]`.
///
/// Derived and ephemeral: recomputed from a [`Node`] whenever requested,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeScore {
    pub overall: u32,
    pub health: f64,
    pub performance: f64,
    pub storage: f64,
    pub reliability: f64,
}

/// Response shape of the list operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeList {
    pub nodes: Vec<Node>,
    pub total: usize,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

/// Aggregated network statistics over the current membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub total_nodes: usize,
    pub healthy: usize,
    pub degraded: usize,
    pub down: usize,
    /// Mean latency across nodes, rounded to whole milliseconds.
    pub avg_latency: u64,
    /// Mean uptime across nodes, rounded to two decimals.
    pub avg_uptime: f64,
    /// Mean storage fill level across nodes, rounded.
    pub avg_storage_used: u32,
}

/// One upstream pRPC endpoint, in priority order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcEndpoint {
    /// Human-readable identifier used in logs (e.g. "devnet-primary").
    pub name: String,
    /// HTTPS endpoint URL.
    pub url: String,
}
