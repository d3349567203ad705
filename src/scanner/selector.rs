//! File Selector
//!
//! Lazily walks a source tree in a stable order: entries are sorted by file
//! name inside each directory and visited depth first. Every regular file is
//! a candidate; hidden and git-ignored files are not filtered.

use ignore::{DirEntry, WalkBuilder};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::ScanConfig;
use crate::types::{DocError, Result};

pub struct FileSelector {
    root: PathBuf,
    checkpoint_marker: String,
    skip_fragment: String,
    exclude: Vec<glob::Pattern>,
}

impl FileSelector {
    /// Selector over `root`; the root must be an existing directory
    pub fn new<P: AsRef<Path>>(root: P, config: &ScanConfig) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(DocError::InvalidRoot(root));
        }

        let exclude = config
            .exclude
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|e| {
                    DocError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            root,
            checkpoint_marker: config.checkpoint_marker.clone(),
            skip_fragment: config.skip_fragment.clone(),
            exclude,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Selected files, produced on demand
    pub fn files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        let marker = self.checkpoint_marker.clone();

        WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false) // Security: prevent symlink traversal attacks
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                if is_dir && !marker.is_empty() && entry.path().to_string_lossy().contains(&*marker)
                {
                    info!("FOLDER SKIPPED: - {}: {}", marker, entry.path().display());
                    return false;
                }
                true
            })
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
            .filter(move |entry| self.keep(entry))
            .map(DirEntry::into_path)
    }

    fn keep(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if !self.skip_fragment.is_empty() && name.contains(&self.skip_fragment) {
            info!("FILE SKIPPED: - {}: {}", self.skip_fragment, name);
            return false;
        }

        if self.is_excluded(entry.path()) {
            info!("FILE SKIPPED: - excluded: {}", entry.path().display());
            return false;
        }

        true
    }

    fn is_excluded(&self, path: &Path) -> bool {
        if self.exclude.is_empty() {
            return false;
        }
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.exclude.iter().any(|p| p.matches_path(relative))
    }
}
