//! Integration tests for the resilient fetch layer: retry budgets,
//! endpoint fallback ordering, and exhaustion semantics.

use serde_json::json;

use atlas_core::upstream::{FetchError, UpstreamError};

use crate::mock_infrastructure::{test_helpers::membership_client, MembershipMockBuilder};

fn sample_records() -> serde_json::Value {
    json!([
        {
            "pubkey": "7Np41oeYqPefeNQEHSv1UDhYrehxin3NStELsSKCT4K2",
            "gossip": "145.40.67.83:8001",
            "rpc": "145.40.67.83:8899",
            "version": "1.14.17",
            "featureSet": 3488713460u32,
            "shredVersion": 54208
        },
        {
            "pubkey": "9XQeWM2cbLKb2k8zWYzWpYcfpARu7zfojShBcC3yBGUe",
            "gossip": null,
            "rpc": null,
            "version": null,
            "shredVersion": 54208
        }
    ])
}

#[tokio::test]
async fn primary_success_never_touches_backup() {
    let mut primary = MembershipMockBuilder::new().await;
    let mut backup = MembershipMockBuilder::new().await;
    let primary_mock = primary.mock_cluster_nodes(&sample_records(), 1).await;
    let backup_mock = backup.mock_http_status(500, 0).await;

    let client =
        membership_client(&[("primary", &primary.url()), ("backup", &backup.url())], 3);
    let records = client.fetch_membership().await.expect("primary should serve");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].pubkey, "7Np41oeYqPefeNQEHSv1UDhYrehxin3NStELsSKCT4K2");
    primary_mock.assert_async().await;
    backup_mock.assert_async().await;
}

#[tokio::test]
async fn fallback_uses_backup_after_primary_exhausted() {
    let mut primary = MembershipMockBuilder::new().await;
    let mut backup = MembershipMockBuilder::new().await;
    // The primary must be attempted exactly max_retries times before
    // fallback kicks in.
    let primary_mock = primary.mock_http_status(503, 3).await;
    let backup_mock = backup.mock_cluster_nodes(&sample_records(), 1).await;

    let client =
        membership_client(&[("primary", &primary.url()), ("backup", &backup.url())], 3);
    let records = client.fetch_membership().await.expect("backup should serve");

    assert_eq!(records.len(), 2);
    primary_mock.assert_async().await;
    backup_mock.assert_async().await;
}

#[tokio::test]
async fn exhaustion_fails_after_all_attempts_on_every_endpoint() {
    let mut primary = MembershipMockBuilder::new().await;
    let mut backup = MembershipMockBuilder::new().await;
    let primary_mock = primary.mock_http_status(500, 3).await;
    let backup_mock = backup.mock_http_status(502, 3).await;

    let client =
        membership_client(&[("primary", &primary.url()), ("backup", &backup.url())], 3);
    let error = client.fetch_membership().await.expect_err("both endpoints are down");

    let FetchError::AllEndpointsFailed { failures } = error;
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].endpoint, "primary");
    assert_eq!(failures[0].attempts, 3);
    assert!(matches!(failures[0].last_error, UpstreamError::HttpStatus(500)));
    assert_eq!(failures[1].endpoint, "backup");
    assert_eq!(failures[1].attempts, 3);
    assert!(matches!(failures[1].last_error, UpstreamError::HttpStatus(502)));

    // 2 endpoints x 3 attempts, no more, no less.
    primary_mock.assert_async().await;
    backup_mock.assert_async().await;
}

#[tokio::test]
async fn rpc_error_body_counts_as_attempt_failure() {
    let mut primary = MembershipMockBuilder::new().await;
    let mut backup = MembershipMockBuilder::new().await;
    let primary_mock = primary.mock_rpc_error("Node is behind", 3).await;
    let backup_mock = backup.mock_cluster_nodes(&sample_records(), 1).await;

    let client =
        membership_client(&[("primary", &primary.url()), ("backup", &backup.url())], 3);
    let records = client.fetch_membership().await.expect("backup should serve");

    assert_eq!(records.len(), 2);
    primary_mock.assert_async().await;
    backup_mock.assert_async().await;
}

#[tokio::test]
async fn rpc_error_message_is_preserved_in_failure() {
    let mut primary = MembershipMockBuilder::new().await;
    primary.mock_rpc_error("Node is behind", 2).await;

    let client = membership_client(&[("primary", &primary.url())], 2);
    let error = client.fetch_membership().await.expect_err("endpoint reports an RPC error");

    let FetchError::AllEndpointsFailed { failures } = error;
    match &failures[0].last_error {
        UpstreamError::Rpc(message) => assert_eq!(message, "Node is behind"),
        other => panic!("expected RPC error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_records_are_dropped_not_fatal() {
    let mut primary = MembershipMockBuilder::new().await;
    let records = json!([
        { "pubkey": "valid-node-one", "gossip": "1.2.3.4:8001" },
        { "gossip": "no-identity-here:8001" },
        { "pubkey": "valid-node-two", "rpc": "1.2.3.5:8899", "version": "1.0" }
    ]);
    primary.mock_cluster_nodes(&records, 1).await;

    let client = membership_client(&[("primary", &primary.url())], 3);
    let fetched = client.fetch_membership().await.expect("batch proceeds");

    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[0].pubkey, "valid-node-one");
    assert_eq!(fetched[1].pubkey, "valid-node-two");
}

#[tokio::test]
async fn absent_result_member_is_an_empty_cluster() {
    let mut primary = MembershipMockBuilder::new().await;
    primary.mock_raw_body(r#"{"jsonrpc":"2.0","id":1}"#, 1).await;

    let client = membership_client(&[("primary", &primary.url())], 3);
    let records = client.fetch_membership().await.expect("empty cluster is a success");

    assert!(records.is_empty());
}

#[tokio::test]
async fn null_result_member_is_an_empty_cluster() {
    let mut primary = MembershipMockBuilder::new().await;
    primary.mock_raw_body(r#"{"jsonrpc":"2.0","id":1,"result":null}"#, 1).await;

    let client = membership_client(&[("primary", &primary.url())], 3);
    let records = client.fetch_membership().await.expect("empty cluster is a success");

    assert!(records.is_empty());
}

#[tokio::test]
async fn non_array_result_is_an_attempt_failure() {
    let mut primary = MembershipMockBuilder::new().await;
    primary.mock_raw_body(r#"{"jsonrpc":"2.0","id":1,"result":"not-a-list"}"#, 2).await;

    let client = membership_client(&[("primary", &primary.url())], 2);
    let error = client.fetch_membership().await.expect_err("shape mismatch must fail");

    let FetchError::AllEndpointsFailed { failures } = error;
    assert!(matches!(failures[0].last_error, UpstreamError::InvalidResponse(_)));
}

#[tokio::test]
async fn unparseable_body_is_an_attempt_failure() {
    let mut primary = MembershipMockBuilder::new().await;
    primary.mock_raw_body("<html>gateway error</html>", 2).await;

    let client = membership_client(&[("primary", &primary.url())], 2);
    let error = client.fetch_membership().await.expect_err("garbage body must fail");

    let FetchError::AllEndpointsFailed { failures } = error;
    assert!(matches!(failures[0].last_error, UpstreamError::InvalidResponse(_)));
}
