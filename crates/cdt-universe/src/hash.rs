//! Canonical structural hash of a triangulation.

use sha2::{Digest, Sha256};

use crate::universe::Universe;

/// SHA-256 over the exported geometry serialization.
///
/// Deterministic for a given state, so two universes with identical live
/// content (same dense renumbering) hash equal; recorded in run manifests
/// and used by tests to compare states cheaply.
pub fn canonical_hash(universe: &Universe) -> String {
    let mut hasher = Sha256::new();
    hasher.update(universe.serialize_geometry().as_bytes());
    format!("{:x}", hasher.finalize())
}
