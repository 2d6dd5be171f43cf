//! Query surface composing fetch, synthesis, and scoring.
//!
//! Every operation re-runs the full fetch+synthesize pipeline against the
//! upstream cluster; there is no cross-call caching here. Response caching
//! belongs to the consumer, which gets a short-TTL cache-control policy
//! from the HTTP layer.

use chrono::Utc;
use thiserror::Error;
use tracing::warn;

use crate::{
    scoring,
    synth::{self, short_id},
    types::{ClusterNode, Health, NetworkStats, Node, NodeList, NodeScore},
    upstream::{FetchError, MembershipClient},
};

/// Failures that cross the query surface boundary.
///
/// Upstream exhaustion and a missed lookup are the only two: per-attempt
/// failures are absorbed by the fetch layer, and malformed records are
/// dropped before synthesis. The two variants map to distinct externally
/// visible conditions (service-unavailable vs not-found) and must never be
/// conflated.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("membership unavailable: {0}")]
    Unavailable(#[from] FetchError),

    #[error("no node matches id {0:?}")]
    NotFound(String),
}

/// The two read operations plus their derived aggregates.
pub struct QueryService {
    membership: MembershipClient,
}

impl QueryService {
    #[must_use]
    pub fn new(membership: MembershipClient) -> Self {
        Self { membership }
    }

    /// Lists the current membership as synthesized nodes.
    ///
    /// The health filter applies after synthesis; `total` counts the
    /// filtered result. With `with_scores`, each node carries its overall
    /// composite score.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Unavailable`] when every upstream endpoint is
    /// exhausted - never an empty-but-successful listing.
    pub async fn list(
        &self,
        health: Option<Health>,
        with_scores: bool,
    ) -> Result<NodeList, QueryError> {
        let records = self.membership.fetch_membership().await?;
        let mut nodes = synthesize_all(&records);

        if with_scores {
            for node in &mut nodes {
                node.score = Some(scoring::score(node).overall);
            }
        }

        if let Some(health) = health {
            nodes.retain(|node| node.health == health);
        }

        let total = nodes.len();
        Ok(NodeList { nodes, total, last_updated: Utc::now() })
    }

    /// Looks up a single node by id.
    ///
    /// Match precedence: exact truncated-id match, then exact full
    /// identity, then identity prefix. The synthesized node keeps the
    /// ordinal it has in the full membership list, so its name matches the
    /// list view.
    ///
    /// # Errors
    ///
    /// [`QueryError::NotFound`] when no record matches;
    /// [`QueryError::Unavailable`] on upstream exhaustion.
    pub async fn detail(&self, id: &str) -> Result<Node, QueryError> {
        let records = self.membership.fetch_membership().await?;
        let ordinal =
            find_record(&records, id).ok_or_else(|| QueryError::NotFound(id.to_string()))?;

        synth::synthesize(&records[ordinal], ordinal)
            .map_err(|_| QueryError::NotFound(id.to_string()))
    }

    /// Computes the composite score for a single node.
    ///
    /// # Errors
    ///
    /// Same conditions as [`detail`](Self::detail).
    pub async fn detail_score(&self, id: &str) -> Result<NodeScore, QueryError> {
        let node = self.detail(id).await?;
        Ok(scoring::score(&node))
    }

    /// Aggregates health counts and metric averages over the membership.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Unavailable`] on upstream exhaustion.
    pub async fn stats(&self) -> Result<NetworkStats, QueryError> {
        let list = self.list(None, false).await?;
        Ok(aggregate_stats(&list.nodes))
    }
}

/// Synthesizes every valid record, assigning ordinals by position in the
/// valid-record sequence.
fn synthesize_all(records: &[ClusterNode]) -> Vec<Node> {
    records
        .iter()
        .enumerate()
        .filter_map(|(ordinal, record)| match synth::synthesize(record, ordinal) {
            Ok(node) => Some(node),
            Err(e) => {
                warn!(error = %e, "skipping invalid membership record");
                None
            }
        })
        .collect()
}

/// Locates a record by id with short-id > full-identity > prefix
/// precedence.
fn find_record(records: &[ClusterNode], id: &str) -> Option<usize> {
    if id.is_empty() {
        return None;
    }

    records
        .iter()
        .position(|record| short_id(&record.pubkey) == id)
        .or_else(|| records.iter().position(|record| record.pubkey == id))
        .or_else(|| records.iter().position(|record| record.pubkey.starts_with(id)))
}

fn aggregate_stats(nodes: &[Node]) -> NetworkStats {
    let total_nodes = nodes.len();
    let healthy = nodes.iter().filter(|n| n.health == Health::Healthy).count();
    let degraded = nodes.iter().filter(|n| n.health == Health::Degraded).count();
    let down = nodes.iter().filter(|n| n.health == Health::Down).count();

    if total_nodes == 0 {
        return NetworkStats {
            total_nodes: 0,
            healthy: 0,
            degraded: 0,
            down: 0,
            avg_latency: 0,
            avg_uptime: 0.0,
            avg_storage_used: 0,
        };
    }

    #[allow(clippy::cast_precision_loss)]
    let count = total_nodes as f64;
    #[allow(clippy::cast_precision_loss)]
    let latency_sum = nodes.iter().map(|n| n.latency).sum::<u64>() as f64;
    let uptime_sum: f64 = nodes.iter().map(|n| f64::from(n.uptime)).sum();
    let storage_sum: f64 = nodes.iter().map(|n| f64::from(n.storage.used)).sum();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let avg_latency = (latency_sum / count).round() as u64;
    let avg_uptime = ((uptime_sum / count) * 100.0).round() / 100.0;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let avg_storage_used = (storage_sum / count).round() as u32;

    NetworkStats { total_nodes, healthy, degraded, down, avg_latency, avg_uptime, avg_storage_used }
}
