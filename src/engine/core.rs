// src/engine/core.rs

//! Pure core of the poll loop.
//!
//! The core owns the retained "previous" snapshot. Given the freshly taken
//! current snapshot it produces the change list and swaps the baseline. It
//! has no Tokio types, performs no IO, and is unit tested directly.

use crate::types::ChangeRecord;
use crate::watch::{diff_snapshots, Snapshot};

/// Result of feeding one snapshot into the core.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreStep {
    /// Empty when nothing changed (or when this snapshot became the seed).
    pub changes: Vec<ChangeRecord>,
}

impl CoreStep {
    pub fn should_invoke(&self) -> bool {
        !self.changes.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct PollCore {
    previous: Option<Snapshot>,
}

impl PollCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_seeded(&self) -> bool {
        self.previous.is_some()
    }

    pub fn previous(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }

    /// Install the startup baseline. Nothing is reported for it.
    pub fn seed(&mut self, baseline: Snapshot) {
        self.previous = Some(baseline);
    }

    /// Diff `current` against the retained snapshot, then retain `current`
    /// whatever the outcome.
    ///
    /// An unseeded core treats `current` as its seed, so a first scan never
    /// reports every file as added.
    pub fn step(&mut self, current: Snapshot) -> CoreStep {
        let changes = match self.previous.as_ref() {
            Some(previous) => diff_snapshots(previous, &current),
            None => Vec::new(),
        };
        self.previous = Some(current);
        CoreStep { changes }
    }
}
