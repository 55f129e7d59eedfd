//! Orphan detection for the reconciliation sweep.
//!
//! Upload and metadata write are separate steps, so a crash between them
//! leaves a stored object that no record references. The sweep lists the
//! store, subtracts every referenced handle, and deletes what is left once
//! it is older than a grace period. Recent objects are never selected so an
//! upload whose record is still being written survives.

use std::collections::HashSet;

use campus_core::types::Timestamp;

use crate::StoredObject;

/// Select the objects that are unreferenced and last modified before `cutoff`.
pub fn find_orphans(
    objects: Vec<StoredObject>,
    referenced: &HashSet<String>,
    cutoff: Timestamp,
) -> Vec<StoredObject> {
    objects
        .into_iter()
        .filter(|obj| !referenced.contains(&obj.handle) && obj.last_modified < cutoff)
        .collect()
}
