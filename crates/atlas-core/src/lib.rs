//! # Atlas Core
//!
//! Core library for the pNode Atlas membership gateway.
//!
//! The pipeline turns the raw `getClusterNodes` listing reported by the
//! upstream pRPC cluster into a stable, health-scored view of individual
//! pNodes:
//!
//! - **[`upstream`]**: resilient membership retrieval - bounded retries with
//!   exponential backoff per endpoint, strict priority-order fallback across
//!   endpoints, all-or-nothing failure semantics.
//!
//! - **[`synth`]**: deterministic node synthesis - a stable string hash maps
//!   each identity to a city bucket, display jitter, and synthetic
//!   latency/uptime/storage figures; health is classified from the presence
//!   of the record's gossip/RPC/version fields.
//!
//! - **[`scoring`]**: weighted composite scoring over the synthesized
//!   health, performance, storage, and reliability signals.
//!
//! - **[`query`]**: the list / detail / score / stats operations composing
//!   the above. Every call re-runs the full fetch+synthesize pipeline;
//!   response caching is the consumer's concern.
//!
//! - **[`config`]**: layered configuration (defaults → TOML → `ATLAS__*`
//!   env overrides) with startup validation.
//!
//! ## Request Flow
//!
//! ```text
//! Query Surface ──► Resilient Fetch ──► raw records
//!                        │
//!                        ▼ (per record)
//!                  Node Synthesizer ──► Scoring Engine (on demand)
//!                        │
//!                        ▼
//!                     Response
//! ```

pub mod config;
pub mod query;
pub mod scoring;
pub mod synth;
pub mod types;
pub mod upstream;
