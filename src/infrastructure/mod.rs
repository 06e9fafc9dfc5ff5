//! Infrastructure layer - external adapters and integrations.
//!
//! This layer provides adapters for:
//! - Storage implementations (single lock, sharded)
//! - JSON encoding and decoding of actions, stats and snapshots

pub mod json;
pub mod storage;
