//! Error types for the host data boundary.
//!
//! The core never errors on data-shape irregularities reachable from
//! normal application state (empty lists, missing classifications) - those
//! are recovered locally. The only fallible surface is decoding a snapshot
//! the host hands over as JSON.

use thiserror::Error;

/// Failure to decode a host-supplied data snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to decode snapshot JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
