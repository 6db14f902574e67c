// src/watch/exclude.rs

//! Folder and file exclusion rules.
//!
//! Matching is exact string equality, never globbing:
//! - folders are compared against the root-relative path built during the
//!   walk (`ignored`, `a/b`);
//! - files are compared against the bare file name (`.DS_Store`).

use std::collections::BTreeSet;
use std::path::Path;

use tracing::warn;

use super::path_utils::{forward_slash, relative_str};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRules {
    folders: BTreeSet<String>,
    files: BTreeSet<String>,
}

impl ExclusionRules {
    pub fn new<F, S, N, T>(folders: F, files: N) -> Self
    where
        F: IntoIterator<Item = S>,
        S: AsRef<Path>,
        N: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self {
            folders: folders
                .into_iter()
                .map(|f| forward_slash(f.as_ref()))
                .filter(|f| !f.is_empty())
                .collect(),
            files: files
                .into_iter()
                .map(|f| f.as_ref().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
        }
    }

    /// Rewrite folder entries so they are relative to the watch root.
    ///
    /// An entry may be spelled relative to the root (`ignored`), prefixed
    /// with the watch folder as typed on the command line (`./w/ignored`), or
    /// prefixed with the absolute root (`/tmp/w/ignored`). An absolute entry
    /// that reaches the root through a symlink also matches.
    pub fn rebased(&self, typed_root: &Path, absolute_root: &Path) -> Self {
        let typed_key = forward_slash(typed_root);
        let folders = self
            .folders
            .iter()
            .filter_map(|folder| {
                let path = Path::new(folder);
                let relative = path
                    .strip_prefix(&typed_key)
                    .ok()
                    .map(forward_slash)
                    .or_else(|| relative_str(absolute_root, path));

                match relative {
                    Some(rel) if rel.is_empty() => {
                        warn!(
                            folder = %folder,
                            "ignore-folder names the watch folder itself; ignoring it"
                        );
                        None
                    }
                    Some(rel) => Some(rel),
                    None if path.is_absolute() => {
                        warn!(
                            folder = %folder,
                            root = ?absolute_root,
                            "ignore-folder lies outside the watch folder"
                        );
                        Some(folder.clone())
                    }
                    None => Some(folder.clone()),
                }
            })
            .collect();

        Self {
            folders,
            files: self.files.clone(),
        }
    }

    pub fn is_folder_excluded(&self, relative_path: &str) -> bool {
        self.folders.contains(relative_path)
    }

    pub fn is_file_excluded(&self, file_name: &str) -> bool {
        self.files.contains(file_name)
    }

    pub fn folders(&self) -> impl Iterator<Item = &str> {
        self.folders.iter().map(String::as_str)
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}
