//! Composite node scoring.
//!
//! Pure functions over a synthesized [`Node`]; no I/O and no state, hence
//! trivially safe under unlimited concurrent callers. Sub-scores and the
//! weighted composite all land in `[0, 100]`.

use crate::types::{Health, Node, NodeScore};

/// Sub-score weights for the composite.
///
/// These constants are ranking policy: changing any of them re-orders
/// nodes system-wide and must ship as a versioned policy change, not a
/// silent tweak. They sum to 1.0.
pub const HEALTH_WEIGHT: f64 = 0.30;
pub const PERFORMANCE_WEIGHT: f64 = 0.25;
pub const STORAGE_WEIGHT: f64 = 0.20;
pub const RELIABILITY_WEIGHT: f64 = 0.25;

/// Computes the weighted composite score for a node.
#[must_use]
pub fn score(node: &Node) -> NodeScore {
    let health = health_score(node.health);
    let performance = performance_score(node.latency);
    let storage = storage_score(node.storage.used, node.storage.total);
    let reliability = f64::from(node.uptime);

    let overall = HEALTH_WEIGHT * health
        + PERFORMANCE_WEIGHT * performance
        + STORAGE_WEIGHT * storage
        + RELIABILITY_WEIGHT * reliability;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let overall = overall.round() as u32;

    NodeScore { overall, health, performance, storage, reliability }
}

fn health_score(health: Health) -> f64 {
    match health {
        Health::Healthy => 100.0,
        Health::Degraded => 60.0,
        Health::Down => 0.0,
    }
}

/// Lower latency scores higher: full marks at or below 50 ms, zero at or
/// above 1000 ms, linear in between.
fn performance_score(latency_ms: u64) -> f64 {
    if latency_ms <= 50 {
        return 100.0;
    }
    if latency_ms >= 1000 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let latency = latency_ms as f64;
    (100.0 - latency / 10.0).max(0.0)
}

/// More free space scores higher.
fn storage_score(used: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let used_percentage = (f64::from(used) / f64::from(total)) * 100.0;
    (100.0 - used_percentage).max(0.0)
}
