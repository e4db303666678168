//! Atomic write primitives
//!
//! Uses temp→rename pattern to ensure no partial writes

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::errors::{write_error, Result};

/// Atomically write bytes to a file
///
/// Creates missing parent directories, writes a sibling `.tmp` file and
/// renames it over the target.
///
/// # Errors
/// * `Write` - any step failed; the target is either untouched or complete
pub async fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| write_error(target_path, e))?;
    }

    let temp_path = temp_path_for(target_path);
    fs::write(&temp_path, content)
        .await
        .map_err(|e| write_error(target_path, e))?;

    if let Err(e) = fs::rename(&temp_path, target_path).await {
        // Best effort; a stray temp file is swept as an orphan next commit
        let _ = fs::remove_file(&temp_path).await;
        return Err(write_error(target_path, e));
    }

    Ok(())
}

fn temp_path_for(target_path: &Path) -> PathBuf {
    let mut name = target_path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
