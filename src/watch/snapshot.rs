// src/watch/snapshot.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::{Result, WatchError};
use crate::fs::{EntryKind, FileSystem};
use crate::types::FileRecord;
use crate::watch::exclude::ExclusionRules;
use crate::watch::path_utils::join_relative;

/// Every tracked file and its size at one point in time, keyed by absolute
/// path. Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    files: HashMap<PathBuf, u64>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any previous size for the same path.
    /// Returns `true` if the path was not present before.
    pub fn insert(&mut self, record: FileRecord) -> bool {
        self.files
            .insert(record.absolute_path, record.size_bytes)
            .is_none()
    }

    pub fn size_of(&self, path: &Path) -> Option<u64> {
        self.files.get(path).copied()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, u64)> {
        self.files.iter().map(|(p, s)| (p.as_path(), *s))
    }
}

impl FromIterator<FileRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}

/// Walks the watch folder and produces [`Snapshot`]s.
///
/// The root is made absolute once, at construction, so every recorded path
/// is absolute and folder exclusions are already expressed relative to it.
/// Symlinks in the root are kept, so paths start with the folder as typed.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    rules: ExclusionRules,
}

impl SnapshotBuilder {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        watch_folder: impl AsRef<Path>,
        rules: &ExclusionRules,
    ) -> Result<Self> {
        let watch_folder = watch_folder.as_ref();
        let root = fs
            .absolute(watch_folder)
            .map_err(|source| WatchError::RootUnreadable {
                path: watch_folder.to_path_buf(),
                source,
            })?;
        let rules = rules.rebased(watch_folder, &root);

        debug!(
            root = ?root,
            ignore_folders = ?rules.folders().collect::<Vec<_>>(),
            ignore_files = ?rules.files().collect::<Vec<_>>(),
            "snapshot builder ready"
        );

        Ok(Self { fs, root, rules })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rules(&self) -> &ExclusionRules {
        &self.rules
    }

    /// Take a fresh snapshot of the tree.
    ///
    /// Failing to list the root is an error; failures below the root only
    /// drop the affected subtree or entry.
    pub fn build(&self) -> Result<Snapshot> {
        let entries = self
            .fs
            .read_dir(&self.root)
            .map_err(|source| WatchError::RootUnreadable {
                path: self.root.clone(),
                source,
            })?;

        let mut snapshot = Snapshot::new();
        self.visit_entries(entries, "", &mut snapshot);
        Ok(snapshot)
    }

    fn walk_dir(&self, dir: &Path, relative: &str, snapshot: &mut Snapshot) {
        match self.fs.read_dir(dir) {
            Ok(entries) => self.visit_entries(entries, relative, snapshot),
            Err(err) => {
                warn!(dir = ?dir, error = %err, "cannot read directory; skipping subtree");
            }
        }
    }

    fn visit_entries(&self, entries: Vec<PathBuf>, relative: &str, snapshot: &mut Snapshot) {
        for path in entries {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };

            let meta = match self.fs.metadata(&path) {
                Ok(meta) => meta,
                Err(err) => {
                    warn!(path = ?path, error = %err, "cannot stat entry; skipping");
                    continue;
                }
            };

            match meta.kind {
                EntryKind::Dir => {
                    let sub_relative = join_relative(relative, &name);
                    if self.rules.is_folder_excluded(&sub_relative) {
                        debug!(folder = %sub_relative, "ignoring folder");
                        continue;
                    }
                    self.walk_dir(&path, &sub_relative, snapshot);
                }
                EntryKind::File => {
                    if self.rules.is_file_excluded(&name) {
                        debug!(file = %name, "ignoring file");
                        continue;
                    }
                    snapshot.insert(FileRecord::new(path, meta.len));
                }
                EntryKind::Other => {
                    debug!(path = ?path, "not a regular file; skipping");
                }
                EntryKind::BrokenLink => {
                    debug!(path = ?path, "dangling symlink; skipping");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn builder(fs: &MockFileSystem, rules: ExclusionRules) -> SnapshotBuilder {
        SnapshotBuilder::new(Arc::new(fs.clone()), "/w", &rules).unwrap()
    }

    #[test]
    fn records_every_file_with_its_size() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/a.txt", 10);
        fs.add_file("/w/sub/deep/b.bin", 7);

        let snap = builder(&fs, ExclusionRules::default()).build().unwrap();

        assert_eq!(snap.len(), 2);
        assert_eq!(snap.size_of(Path::new("/w/a.txt")), Some(10));
        assert_eq!(snap.size_of(Path::new("/w/sub/deep/b.bin")), Some(7));
    }

    #[test]
    fn excluded_folder_hides_its_whole_subtree() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/keep.txt", 1);
        fs.add_file("/w/ignored/x.txt", 1);
        fs.add_file("/w/ignored/nested/y.txt", 1);

        let rules = ExclusionRules::new(["ignored"], Vec::<String>::new());
        let snap = builder(&fs, rules).build().unwrap();

        assert_eq!(snap.len(), 1);
        assert!(snap.contains(Path::new("/w/keep.txt")));
    }

    #[test]
    fn nested_folder_exclusion_uses_the_relative_path() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/a/b/x.txt", 1);
        fs.add_file("/w/b/y.txt", 1);

        let rules = ExclusionRules::new(["a/b"], Vec::<String>::new());
        let snap = builder(&fs, rules).build().unwrap();

        assert!(!snap.contains(Path::new("/w/a/b/x.txt")));
        assert!(snap.contains(Path::new("/w/b/y.txt")));
    }

    #[test]
    fn excluded_file_name_matches_at_any_depth() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/.DS_Store", 1);
        fs.add_file("/w/sub/.DS_Store", 1);
        fs.add_file("/w/sub/real.txt", 1);

        let rules = ExclusionRules::new(Vec::<String>::new(), [".DS_Store"]);
        let snap = builder(&fs, rules).build().unwrap();

        assert_eq!(snap.len(), 1);
        assert!(snap.contains(Path::new("/w/sub/real.txt")));
    }

    #[test]
    fn unreadable_subdirectory_is_skipped() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/a.txt", 1);
        fs.add_file("/w/locked/secret.txt", 1);
        fs.add_file("/w/open/b.txt", 1);
        fs.break_dir("/w/locked");

        let snap = builder(&fs, ExclusionRules::default()).build().unwrap();

        assert_eq!(snap.len(), 2);
        assert!(snap.contains(Path::new("/w/open/b.txt")));
    }

    #[test]
    fn vanished_entry_is_skipped() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/a.txt", 1);
        fs.add_file("/w/gone.txt", 1);
        fs.break_metadata("/w/gone.txt");

        let snap = builder(&fs, ExclusionRules::default()).build().unwrap();

        assert_eq!(snap.len(), 1);
        assert!(snap.contains(Path::new("/w/a.txt")));
    }

    #[test]
    fn dangling_symlink_is_skipped() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/a.txt", 1);
        fs.add_broken_link("/w/dangling");

        let snap = builder(&fs, ExclusionRules::default()).build().unwrap();

        assert_eq!(snap.len(), 1);
        assert!(!snap.contains(Path::new("/w/dangling")));
    }

    #[test]
    fn empty_folders_contribute_nothing() {
        let fs = MockFileSystem::new();
        fs.add_dir("/w/empty/nested");
        fs.add_file("/w/a.txt", 1);

        let snap = builder(&fs, ExclusionRules::default()).build().unwrap();

        assert_eq!(snap.len(), 1);
    }

    #[test]
    fn exclusions_are_rebased_onto_the_root() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/a.txt", 1);
        let rules = ExclusionRules::new(["/w/build", "cache/"], Vec::<String>::new());

        let b = builder(&fs, rules);

        assert_eq!(b.root(), Path::new("/w"));
        assert_eq!(b.rules().folders().collect::<Vec<_>>(), vec!["build", "cache"]);
    }

    #[test]
    fn unreadable_root_is_reported() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/a.txt", 1);
        let b = builder(&fs, ExclusionRules::default());
        fs.break_dir("/w");

        assert!(matches!(b.build(), Err(WatchError::RootUnreadable { .. })));
    }

    #[test]
    fn missing_root_fails_construction() {
        let fs = MockFileSystem::new();
        let res = SnapshotBuilder::new(Arc::new(fs), "/nope", &ExclusionRules::default());
        assert!(matches!(res, Err(WatchError::RootUnreadable { .. })));
    }
}
