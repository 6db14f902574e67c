// src/watch/mod.rs

//! Polling-based change detection.
//!
//! This module is responsible for:
//! - Walking the watch folder into a [`Snapshot`] of file sizes, honouring
//!   the folder / file [`ExclusionRules`].
//! - Comparing two snapshots into a list of [`ChangeRecord`]s.
//!
//! It does **not** know about timing or the callback; the poll loop in
//! [`crate::engine`] drives it.
//!
//! [`ChangeRecord`]: crate::types::ChangeRecord

pub mod diff;
pub mod exclude;
pub mod path_utils;
pub mod snapshot;

pub use diff::diff_snapshots;
pub use exclude::ExclusionRules;
pub use snapshot::{Snapshot, SnapshotBuilder};
