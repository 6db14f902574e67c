// src/types.rs

//! Plain data shared across the watcher, the diff engine and the callback.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, Serializer};

/// One regular file observed during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRecord {
    pub absolute_path: PathBuf,
    pub size_bytes: u64,
}

impl FileRecord {
    pub fn new(absolute_path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        Self {
            absolute_path: absolute_path.into(),
            size_bytes,
        }
    }
}

/// How a path differs between two consecutive snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Added,
    Removed,
    Changed,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Added => "added",
            Operation::Removed => "removed",
            Operation::Changed => "changed",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single path-level difference, as handed to the callback command.
///
/// Serialized as `{"absolute_path": "...", "operation": "added"}`. Paths that
/// are not valid UTF-8 are written lossily (invalid bytes become U+FFFD).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeRecord {
    #[serde(serialize_with = "serialize_path_lossy")]
    pub absolute_path: PathBuf,
    pub operation: Operation,
}

impl ChangeRecord {
    pub fn new(absolute_path: impl Into<PathBuf>, operation: Operation) -> Self {
        Self {
            absolute_path: absolute_path.into(),
            operation,
        }
    }
}

fn serialize_path_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// Per-operation counts for a diff, used for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
}

impl ChangeSummary {
    pub fn of(changes: &[ChangeRecord]) -> Self {
        changes.iter().fold(Self::default(), |mut acc, c| {
            match c.operation {
                Operation::Added => acc.added += 1,
                Operation::Removed => acc.removed += 1,
                Operation::Changed => acc.changed += 1,
            }
            acc
        })
    }
}
