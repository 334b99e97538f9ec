//! Workspace enumeration.

use crate::error::{Result, YurtleError};
use globset::GlobSet;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map_or(false, |name| name.starts_with('.'))
}

/// Lists files under `root` whose root-relative path matches `patterns`.
///
/// Hidden files and everything under hidden directories are skipped. The
/// result is sorted. Entries that cannot be visited are logged and skipped.
///
/// # Errors
///
/// Returns `RootNotFound` if `root` is not a directory.
pub fn scan_workspace(root: &Path, patterns: &GlobSet) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(YurtleError::RootNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable workspace entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        if patterns.is_match(rel) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
