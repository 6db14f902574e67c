#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use simple_file_watch::engine::Poller;
use simple_file_watch::exec::CallbackInvoker;
use simple_file_watch::fs::FileSystem;
use simple_file_watch::types::FileRecord;
use simple_file_watch::watch::{ExclusionRules, Snapshot, SnapshotBuilder};

/// Builder for `Snapshot` to simplify diff test setup.
#[derive(Debug, Default)]
pub struct SnapshotFixture {
    records: Vec<FileRecord>,
}

impl SnapshotFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, path: impl Into<PathBuf>, size: u64) -> Self {
        self.records.push(FileRecord::new(path, size));
        self
    }

    pub fn build(self) -> Snapshot {
        self.records.into_iter().collect()
    }
}

/// Write a file of exactly `size` bytes, creating parent directories.
pub fn write_sized(path: impl AsRef<Path>, size: usize) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, vec![b'x'; size]).expect("write fixture file");
}

/// Build a poller over any filesystem, with a zero interval for tests that
/// drive `run_cycle` by hand.
pub fn poller_over<I: CallbackInvoker>(
    fs: Arc<dyn FileSystem>,
    root: impl AsRef<Path>,
    rules: ExclusionRules,
    invoker: I,
) -> Poller<I> {
    let builder =
        SnapshotBuilder::new(fs, root, &rules).expect("watch root should exist in fixture");
    Poller::new(builder, invoker, Duration::ZERO)
}
