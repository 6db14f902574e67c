// src/watch/diff.rs

//! Snapshot comparison.

use tracing::debug;

use crate::types::{ChangeRecord, Operation};
use crate::watch::snapshot::Snapshot;

/// Compare two snapshots and list every path that differs.
///
/// - in `previous` only: [`Operation::Removed`]
/// - in `current` only: [`Operation::Added`]
/// - in both with different sizes: [`Operation::Changed`]
///
/// Each path yields at most one record. The output order is unspecified.
pub fn diff_snapshots(previous: &Snapshot, current: &Snapshot) -> Vec<ChangeRecord> {
    let mut changes = Vec::new();

    for (path, previous_size) in previous.iter() {
        match current.size_of(path) {
            None => {
                debug!(path = ?path, "file removed");
                changes.push(ChangeRecord::new(path, Operation::Removed));
            }
            Some(current_size) if current_size != previous_size => {
                debug!(path = ?path, previous_size, current_size, "file changed");
                changes.push(ChangeRecord::new(path, Operation::Changed));
            }
            Some(_) => {}
        }
    }

    for (path, _) in current.iter() {
        if !previous.contains(path) {
            debug!(path = ?path, "file added");
            changes.push(ChangeRecord::new(path, Operation::Added));
        }
    }

    changes
}
