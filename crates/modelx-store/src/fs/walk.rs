//! Recursive directory snapshot and empty-directory pruning

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::{read_error, task_error, Result};

/// Every regular file under `root`, as paths relative to `root`
///
/// Runs the walk on the blocking pool.
///
/// # Errors
/// * `Read` - a directory could not be listed
/// * `Internal` - the blocking task failed
pub async fn snapshot_files(root: &Path) -> Result<BTreeSet<PathBuf>> {
    let root = root.to_path_buf();
    tokio::task::spawn_blocking(move || walk(&root))
        .await
        .map_err(|e| task_error("snapshot_files", e))?
}

fn walk(root: &Path) -> Result<BTreeSet<PathBuf>> {
    let mut files = BTreeSet::new();
    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            read_error(&path, e)
        })?;
        if entry.file_type().is_file() {
            if let Ok(relative) = entry.path().strip_prefix(root) {
                files.insert(relative.to_path_buf());
            }
        }
    }
    Ok(files)
}

/// Remove directories left empty above a deleted file, stopping at `root`
///
/// Stops at the first directory that is not empty or cannot be removed.
/// Returns the number of directories removed.
pub async fn prune_empty_parents(root: &Path, relative_file: &Path) -> usize {
    let mut removed = 0;
    let mut current = relative_file.parent();
    while let Some(dir) = current {
        if dir.as_os_str().is_empty() {
            break;
        }
        if tokio::fs::remove_dir(root.join(dir)).await.is_err() {
            break;
        }
        tracing::debug!(path = %dir.display(), "pruned empty directory");
        removed += 1;
        current = dir.parent();
    }
    removed
}
