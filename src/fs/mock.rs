// src/fs/mock.rs

use super::{EntryKind, EntryMetadata, FileSystem};
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(u64),
    Dir(Vec<String>), // List of child names
    BrokenLink,
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    broken_dirs: HashSet<PathBuf>,
    broken_metadata: HashSet<PathBuf>,
}

/// In-memory filesystem holding only file sizes.
///
/// Clones share state, so a test can keep a handle and mutate the tree while
/// a `SnapshotBuilder` owns another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

fn parent_of(path: &Path) -> Option<&Path> {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Some(Path::new(".")),
        other => other,
    }
}

fn child_name(path: &Path) -> Option<String> {
    path.file_name().and_then(|n| n.to_str()).map(str::to_string)
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or resize) a file, creating parent directories implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, size: u64) {
        let path = path.as_ref();
        let mut state = self.state.lock().unwrap();
        state.entries.insert(path.to_path_buf(), MockEntry::File(size));
        Self::link_to_parent(&mut state.entries, path);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.state.lock().unwrap();
        Self::ensure_dir_entry(&mut state.entries, path);
    }

    /// Add a symlink whose target is missing.
    pub fn add_broken_link(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.state.lock().unwrap();
        state.entries.insert(path.to_path_buf(), MockEntry::BrokenLink);
        Self::link_to_parent(&mut state.entries, path);
    }

    /// Remove a file or a whole directory subtree.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.state.lock().unwrap();
        state.entries.retain(|p, _| !p.starts_with(path));

        if let (Some(parent), Some(name)) = (parent_of(path), child_name(path)) {
            if let Some(MockEntry::Dir(children)) = state.entries.get_mut(parent) {
                children.retain(|c| c != &name);
            }
        }
    }

    /// Make `read_dir` fail for this directory.
    pub fn break_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.broken_dirs.insert(path.as_ref().to_path_buf());
    }

    /// Make `metadata` fail for this path, as if it vanished mid-scan.
    pub fn break_metadata(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.broken_metadata.insert(path.as_ref().to_path_buf());
    }

    pub fn repair(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.state.lock().unwrap();
        state.broken_dirs.remove(path);
        state.broken_metadata.remove(path);
    }

    fn link_to_parent(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let Some(parent) = parent_of(path) else {
            return;
        };
        if parent == path {
            return;
        }
        Self::ensure_dir_entry(entries, parent);
        if let (Some(MockEntry::Dir(children)), Some(name)) =
            (entries.get_mut(parent), child_name(path))
        {
            if !children.contains(&name) {
                children.push(name);
            }
        }
    }

    fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if entries.contains_key(path) {
            return;
        }
        entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        Self::link_to_parent(entries, path);
    }
}

impl FileSystem for MockFileSystem {
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        if state.broken_dirs.contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        match state.entries.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }

    fn metadata(&self, path: &Path) -> Result<EntryMetadata> {
        let state = self.state.lock().unwrap();
        if state.broken_metadata.contains(path) {
            return Err(anyhow!("File not found: {:?}", path));
        }
        match state.entries.get(path) {
            Some(MockEntry::File(len)) => Ok(EntryMetadata {
                kind: EntryKind::File,
                len: *len,
            }),
            Some(MockEntry::Dir(_)) => Ok(EntryMetadata {
                kind: EntryKind::Dir,
                len: 0,
            }),
            Some(MockEntry::BrokenLink) => Ok(EntryMetadata {
                kind: EntryKind::BrokenLink,
                len: 0,
            }),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn absolute(&self, path: &Path) -> Result<PathBuf> {
        // Tests use absolute paths; only the directory's existence is checked.
        let state = self.state.lock().unwrap();
        match state.entries.get(path) {
            Some(MockEntry::Dir(_)) => Ok(path.to_path_buf()),
            Some(_) => Err(anyhow!("Not a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_file_creates_parent_chain() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/a/b/c.txt", 3);

        assert_eq!(fs.read_dir(Path::new("/w")).unwrap(), vec![PathBuf::from("/w/a")]);
        assert_eq!(
            fs.read_dir(Path::new("/w/a/b")).unwrap(),
            vec![PathBuf::from("/w/a/b/c.txt")]
        );
        assert_eq!(fs.metadata(Path::new("/w/a/b/c.txt")).unwrap().len, 3);
    }

    #[test]
    fn remove_drops_subtree_and_parent_link() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/a/x.txt", 1);
        fs.add_file("/w/b.txt", 1);
        fs.remove("/w/a");

        assert_eq!(fs.read_dir(Path::new("/w")).unwrap(), vec![PathBuf::from("/w/b.txt")]);
        assert!(fs.metadata(Path::new("/w/a/x.txt")).is_err());
    }

    #[test]
    fn add_dir_creates_an_empty_listable_directory() {
        let fs = MockFileSystem::new();
        fs.add_dir("/w/empty");

        assert_eq!(fs.read_dir(Path::new("/w")).unwrap(), vec![PathBuf::from("/w/empty")]);
        assert!(fs.read_dir(Path::new("/w/empty")).unwrap().is_empty());
        assert_eq!(fs.absolute(Path::new("/w/empty")).unwrap(), PathBuf::from("/w/empty"));
    }

    #[test]
    fn broken_link_is_listed_but_not_followed() {
        let fs = MockFileSystem::new();
        fs.add_broken_link("/w/dangling");

        assert_eq!(fs.read_dir(Path::new("/w")).unwrap(), vec![PathBuf::from("/w/dangling")]);
        let meta = fs.metadata(Path::new("/w/dangling")).unwrap();
        assert_eq!(meta.kind, EntryKind::BrokenLink);
    }

    #[test]
    fn broken_entries_fail_until_repaired() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/a.txt", 1);
        fs.break_dir("/w");
        assert!(fs.read_dir(Path::new("/w")).is_err());
        fs.repair("/w");
        assert!(fs.read_dir(Path::new("/w")).is_ok());
    }
}
