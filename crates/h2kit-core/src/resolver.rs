//! Sample file lookup across search directories.

use crate::error::Error;
use crate::Result;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Search `root` recursively for a file named `target`.
///
/// Symbolic links are followed. Every directory is entered at most once,
/// keyed by its canonical path, so symlink cycles and aliased directories
/// are skipped with a warning instead of being walked again.
///
/// With `ignore_case` the names are compared case-insensitively, otherwise
/// they must match exactly. Within a directory its files are checked before
/// any subdirectory is entered, so the shallowest match wins.
pub fn find_filepath(root: &Path, target: &str, ignore_case: bool) -> Option<PathBuf> {
    let target_lower = target.to_lowercase();
    let mut visited: HashSet<PathBuf> = HashSet::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by(|a, b| {
            (a.path().is_dir(), a.file_name()).cmp(&(b.path().is_dir(), b.file_name()))
        })
        .into_iter()
        .filter_entry(|entry| {
            if !entry.file_type().is_dir() {
                return true;
            }
            match fs::canonicalize(entry.path()) {
                Ok(real) if visited.contains(&real) => {
                    log::warn!(
                        "Already visited {} ({}), skipping",
                        entry.path().display(),
                        real.display()
                    );
                    false
                }
                Ok(real) => {
                    visited.insert(real);
                    true
                }
                Err(_) => true,
            }
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                match err.loop_ancestor() {
                    Some(ancestor) => log::warn!(
                        "Symlink loop at {} back to {}, skipping",
                        path,
                        ancestor.display()
                    ),
                    None => log::warn!("Skipping {}: {}", path, err),
                }
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name();
        let matched = if ignore_case {
            name.to_str()
                .is_some_and(|name| name.to_lowercase() == target_lower)
        } else {
            name == OsStr::new(target)
        };

        if matched {
            return Some(entry.into_path());
        }
    }

    None
}

/// Resolves sample file names against an ordered list of search directories.
#[derive(Clone, Debug)]
pub struct SampleResolver {
    search_dirs: Vec<PathBuf>,
}

impl SampleResolver {
    pub fn new<I, P>(search_dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let search_dirs: Vec<PathBuf> = search_dirs.into_iter().map(Into::into).collect();
        for dir in &search_dirs {
            if !dir.is_dir() {
                log::warn!("Sample search directory {} does not exist", dir.display());
            }
        }
        Self { search_dirs }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Find the file for `filename`.
    ///
    /// All directories are searched for an exact match first, in the order
    /// they were given. Only if none has one are they searched again
    /// ignoring case.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf> {
        self.find(filename, false)
            .or_else(|| {
                log::debug!("No exact match for {}, retrying ignoring case", filename);
                self.find(filename, true)
            })
            .ok_or_else(|| Error::SampleNotFound(filename.to_string()))
    }

    fn find(&self, filename: &str, ignore_case: bool) -> Option<PathBuf> {
        self.search_dirs
            .iter()
            .find_map(|dir| find_filepath(dir, filename, ignore_case))
    }
}
