//! Deterministic node synthesis.
//!
//! Turns one raw membership record into a fully-populated [`Node`]: a city
//! from the fixed catalog, coordinates with identity-derived jitter, a
//! health classification over the record's optional fields, and synthetic
//! latency/uptime/storage figures seeded from the identity. Everything
//! except the synthesis timestamp is a pure function of the identity and
//! the record's ordinal position, so repeated fetches render the same node
//! the same way.

pub mod catalog;
pub mod hash;

pub use catalog::{CityLocation, CITY_CATALOG};
pub use hash::identity_hash;

use chrono::Utc;
use thiserror::Error;

use crate::types::{ClusterNode, Health, Location, Node, Storage, StorageUnit};

/// Width of the truncated display identity.
///
/// Collisions are possible in theory with fixed-width truncation; they are
/// accepted and not deduplicated.
pub const SHORT_ID_LEN: usize = 12;

/// A record that cannot be synthesized because it carries no identity.
///
/// Dropped from the batch by callers; never fatal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("membership record has no identity")]
pub struct MissingIdentity;

/// Truncates a raw identity to the fixed-width display id.
#[must_use]
pub fn short_id(identity: &str) -> String {
    identity
        .char_indices()
        .nth(SHORT_ID_LEN)
        .map_or(identity, |(idx, _)| &identity[..idx])
        .to_string()
}

/// Classifies health from field presence on the raw record.
///
/// Neither gossip nor RPC address: the node is unreachable, `down`.
/// Missing version or RPC address: `degraded` - the RPC-address/version
/// pair is the stronger signal, so a missing gossip address alone does not
/// downgrade further. Otherwise `healthy`.
#[must_use]
pub fn classify_health(record: &ClusterNode) -> Health {
    if record.gossip.is_none() && record.rpc.is_none() {
        Health::Down
    } else if record.version.is_none() || record.rpc.is_none() {
        Health::Degraded
    } else {
        Health::Healthy
    }
}

/// Synthesizes the display-ready node entity for one membership record.
///
/// `ordinal` is the record's 0-based position in the current result set;
/// it only affects the display name. Down nodes report zeroed synthetic
/// metrics - that is a health signal, never a stand-in for a fetch error.
///
/// # Errors
///
/// Returns [`MissingIdentity`] if the record's identity is empty.
pub fn synthesize(record: &ClusterNode, ordinal: usize) -> Result<Node, MissingIdentity> {
    if record.pubkey.is_empty() {
        return Err(MissingIdentity);
    }

    let identity = record.pubkey.as_str();
    let city = &CITY_CATALOG[identity_hash(identity, CITY_CATALOG.len())];

    #[allow(clippy::cast_precision_loss)]
    let lat_jitter = (identity_hash(&format!("{identity}lat"), 100) as f64 - 50.0) * 0.01;
    #[allow(clippy::cast_precision_loss)]
    let lng_jitter = (identity_hash(&format!("{identity}lng"), 100) as f64 - 50.0) * 0.01;

    let health = classify_health(record);

    let seed = identity_hash(&format!("{identity}metrics"), 1000);
    let (latency, uptime, storage_used) = match health {
        Health::Down => (0, 0, 0),
        Health::Degraded => (latency_for(seed), 85 + (seed % 10) as u32, storage_for(seed)),
        Health::Healthy => (latency_for(seed), 97 + (seed % 3) as u32, storage_for(seed)),
    };

    Ok(Node {
        id: short_id(identity),
        name: format!("pNode {} #{:02}", city.city, ordinal + 1),
        location: Location {
            lat: city.lat + lat_jitter,
            lng: city.lng + lng_jitter,
            city: city.city.to_string(),
            country: city.country.to_string(),
        },
        health,
        storage: Storage { used: storage_used, total: 100, unit: StorageUnit::Terabytes },
        latency,
        uptime,
        last_seen: Utc::now(),
        version: record.version.clone(),
        pubkey: Some(record.pubkey.clone()),
        score: None,
    })
}

fn latency_for(seed: usize) -> u64 {
    15 + (seed % 150) as u64
}

fn storage_for(seed: usize) -> u32 {
    #[allow(clippy::cast_possible_truncation)]
    let used = 20 + (seed % 60) as u32;
    used
}
