//! End-to-end tests of the query surface: fetch, synthesis, lookup
//! precedence, filtering, scoring, and stats aggregation.

use serde_json::json;

use atlas_core::{
    query::{QueryError, QueryService},
    types::Health,
};

use crate::mock_infrastructure::{test_helpers::membership_client, MembershipMockBuilder};

fn mixed_records() -> serde_json::Value {
    json!([
        {
            "pubkey": "7Np41oeYqPefeNQEHSv1UDhYrehxin3NStELsSKCT4K2",
            "gossip": "145.40.67.83:8001",
            "rpc": "145.40.67.83:8899",
            "version": "1.14.17"
        },
        {
            "pubkey": "9XQeWM2cbLKb2k8zWYzWpYcfpARu7zfojShBcC3yBGUe",
            "gossip": "145.40.67.84:8001",
            "rpc": null,
            "version": "1.14.17"
        },
        {
            "pubkey": "5D1fNXzvv5NjV1ysLjirC4WY92RNsVH18vjmcszZd8on",
            "gossip": null,
            "rpc": null,
            "version": null
        }
    ])
}

async fn service(mock: &MembershipMockBuilder) -> QueryService {
    QueryService::new(membership_client(&[("mock", &mock.url())], 2))
}

#[tokio::test]
async fn list_synthesizes_every_parsed_record() {
    let mut upstream = MembershipMockBuilder::new().await;
    upstream.mock_cluster_nodes(&mixed_records(), 1).await;

    let list = service(&upstream).await.list(None, false).await.expect("list succeeds");

    assert_eq!(list.total, 3);
    assert_eq!(list.nodes.len(), 3);
    assert_eq!(list.nodes[0].health, Health::Healthy);
    assert_eq!(list.nodes[1].health, Health::Degraded);
    assert_eq!(list.nodes[2].health, Health::Down);
    assert!(list.nodes[0].name.ends_with("#01"));
    assert!(list.nodes[2].name.ends_with("#03"));
}

#[tokio::test]
async fn repeated_fetches_render_nodes_identically() {
    let mut upstream = MembershipMockBuilder::new().await;
    upstream.mock_cluster_nodes(&mixed_records(), 2).await;

    let query = service(&upstream).await;
    let first = query.list(None, false).await.expect("first fetch");
    let second = query.list(None, false).await.expect("second fetch");

    for (a, b) in first.nodes.iter().zip(second.nodes.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.name, b.name);
        assert_eq!(a.location, b.location);
        assert_eq!(a.health, b.health);
        assert_eq!(a.latency, b.latency);
        assert_eq!(a.uptime, b.uptime);
        assert_eq!(a.storage, b.storage);
    }
}

#[tokio::test]
async fn list_health_filter_applies_after_synthesis() {
    let mut upstream = MembershipMockBuilder::new().await;
    upstream.mock_cluster_nodes(&mixed_records(), 1).await;

    let list = service(&upstream)
        .await
        .list(Some(Health::Down), false)
        .await
        .expect("list succeeds");

    assert_eq!(list.total, 1);
    assert_eq!(list.nodes[0].health, Health::Down);
    assert_eq!(list.nodes[0].latency, 0);
    assert_eq!(list.nodes[0].uptime, 0);
    assert_eq!(list.nodes[0].storage.used, 0);
}

#[tokio::test]
async fn scores_are_attached_only_on_request() {
    let mut upstream = MembershipMockBuilder::new().await;
    upstream.mock_cluster_nodes(&mixed_records(), 2).await;

    let query = service(&upstream).await;

    let plain = query.list(None, false).await.expect("list succeeds");
    assert!(plain.nodes.iter().all(|n| n.score.is_none()));

    let scored = query.list(None, true).await.expect("list succeeds");
    for node in &scored.nodes {
        let score = node.score.expect("score attached");
        assert!(score <= 100);
    }
}

#[tokio::test]
async fn detail_prefers_exact_short_id_over_earlier_prefix_match() {
    let mut upstream = MembershipMockBuilder::new().await;
    // Record 0 prefix-matches "abc123"; record 1's identity IS "abc123",
    // so its truncated id matches exactly and must win despite list order.
    let records = json!([
        { "pubkey": "abc123PrefixOnlyIdentityXYZ", "gossip": "g", "rpc": "r", "version": "1.0" },
        { "pubkey": "abc123", "gossip": "g", "rpc": "r", "version": "1.0" }
    ]);
    upstream.mock_cluster_nodes(&records, 1).await;

    let node = service(&upstream).await.detail("abc123").await.expect("lookup succeeds");

    assert_eq!(node.pubkey.as_deref(), Some("abc123"));
    // Ordinal comes from the full membership list, so the name matches the
    // list view.
    assert!(node.name.ends_with("#02"));
}

#[tokio::test]
async fn detail_falls_back_to_prefix_match() {
    let mut upstream = MembershipMockBuilder::new().await;
    upstream.mock_cluster_nodes(&mixed_records(), 1).await;

    let node = service(&upstream).await.detail("9XQeWM2c").await.expect("lookup succeeds");

    assert_eq!(node.id, "9XQeWM2cbLKb");
    assert_eq!(node.health, Health::Degraded);
}

#[tokio::test]
async fn detail_matches_full_identity() {
    let mut upstream = MembershipMockBuilder::new().await;
    upstream.mock_cluster_nodes(&mixed_records(), 1).await;

    let node = service(&upstream)
        .await
        .detail("5D1fNXzvv5NjV1ysLjirC4WY92RNsVH18vjmcszZd8on")
        .await
        .expect("lookup succeeds");

    assert_eq!(node.health, Health::Down);
}

#[tokio::test]
async fn detail_miss_is_not_found_not_unavailable() {
    let mut upstream = MembershipMockBuilder::new().await;
    upstream.mock_cluster_nodes(&mixed_records(), 1).await;

    let error = service(&upstream).await.detail("does-not-exist").await.expect_err("no match");
    assert!(matches!(error, QueryError::NotFound(_)));
}

#[tokio::test]
async fn upstream_exhaustion_is_unavailable_not_empty_success() {
    let mut upstream = MembershipMockBuilder::new().await;
    upstream.mock_http_status(500, 2).await;

    let query = service(&upstream).await;
    let error = query.list(None, false).await.expect_err("fetch must fail");
    assert!(matches!(error, QueryError::Unavailable(_)));
}

#[tokio::test]
async fn detail_score_stays_within_bounds() {
    let mut upstream = MembershipMockBuilder::new().await;
    upstream.mock_cluster_nodes(&mixed_records(), 1).await;

    let score = service(&upstream)
        .await
        .detail_score("7Np41oeYqPef")
        .await
        .expect("score computes");

    assert!(score.overall <= 100);
    for value in [score.health, score.performance, score.storage, score.reliability] {
        assert!((0.0..=100.0).contains(&value));
    }
    assert_eq!(score.health, 100.0);
}

#[tokio::test]
async fn stats_aggregates_health_counts() {
    let mut upstream = MembershipMockBuilder::new().await;
    upstream.mock_cluster_nodes(&mixed_records(), 1).await;

    let stats = service(&upstream).await.stats().await.expect("stats compute");

    assert_eq!(stats.total_nodes, 3);
    assert_eq!(stats.healthy, 1);
    assert_eq!(stats.degraded, 1);
    assert_eq!(stats.down, 1);
    assert!(stats.avg_uptime >= 0.0 && stats.avg_uptime <= 100.0);
}
