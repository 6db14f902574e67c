// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

pub mod mock;

/// What a directory entry resolves to once symlinks are followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Sockets, fifos, devices. Never part of a snapshot.
    Other,
    /// A symlink whose target does not exist (or cannot be resolved).
    BrokenLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    pub kind: EntryKind,
    pub len: u64,
}

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// Return the entries of a directory as full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Metadata for `path`, following symlinks. A link that cannot be
    /// followed is reported as [`EntryKind::BrokenLink`], not as an error.
    fn metadata(&self, path: &Path) -> Result<EntryMetadata>;

    /// Absolute form of an existing directory path. Symlinks are kept as
    /// typed, not resolved.
    fn absolute(&self, path: &Path) -> Result<PathBuf>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            match entry {
                Ok(entry) => entries.push(entry.path()),
                // The directory itself was readable; drop just this entry.
                Err(err) => warn!(dir = ?path, error = %err, "skipping unreadable directory entry"),
            }
        }
        Ok(entries)
    }

    fn metadata(&self, path: &Path) -> Result<EntryMetadata> {
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(err) => {
                let is_link = fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink());
                if is_link {
                    return Ok(EntryMetadata {
                        kind: EntryKind::BrokenLink,
                        len: 0,
                    });
                }
                return Err(err).with_context(|| format!("reading metadata of {:?}", path));
            }
        };
        let kind = if meta.is_dir() {
            EntryKind::Dir
        } else if meta.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        Ok(EntryMetadata {
            kind,
            len: meta.len(),
        })
    }

    fn absolute(&self, path: &Path) -> Result<PathBuf> {
        let absolute = std::path::absolute(path).with_context(|| format!("resolving {:?}", path))?;
        let meta = fs::metadata(&absolute).with_context(|| format!("reading {:?}", absolute))?;
        if !meta.is_dir() {
            anyhow::bail!("{:?} is not a directory", absolute);
        }
        Ok(absolute)
    }
}
