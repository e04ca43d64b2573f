//! Backup and restore of original attachments.
//!
//! Backups live under `$TMPDIR/viewbridge_backup/{post_id}/`, so
//! same-named attachments from different posts get distinct backup paths.
//! This module never deletes a backup; temp-dir cleanup is the host's
//! concern.

use std::path::{Path, PathBuf};

use tokio::fs;

use viewbridge_core::AppError;

const BACKUP_DIR: &str = "viewbridge_backup";

/// Copy `original` to the backup area and return the backup path.
pub async fn backup_original(post_id: &str, original: &Path) -> Result<PathBuf, AppError> {
    let backup_dir = std::env::temp_dir().join(BACKUP_DIR).join(post_id);
    fs::create_dir_all(&backup_dir).await.map_err(|e| {
        AppError::Internal(format!(
            "failed to create backup directory {}: {}",
            backup_dir.display(),
            e
        ))
    })?;

    let file_name = original.file_name().ok_or_else(|| {
        AppError::InvalidInput(format!("{} has no file name", original.display()))
    })?;
    let backup_path = backup_dir.join(file_name);

    fs::copy(original, &backup_path).await.map_err(|e| {
        AppError::Internal(format!(
            "failed to back up {} to {}: {}",
            original.display(),
            backup_path.display(),
            e
        ))
    })?;

    Ok(backup_path)
}

/// Copy a backup back to its original location, creating directories as
/// needed.
pub async fn restore_original(backup: &Path, original: &Path) -> Result<(), AppError> {
    if let Some(parent) = original.parent() {
        fs::create_dir_all(parent).await.map_err(|e| {
            AppError::Internal(format!(
                "failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    fs::copy(backup, original).await.map_err(|e| {
        AppError::Internal(format!(
            "failed to restore {} from {}: {}",
            original.display(),
            backup.display(),
            e
        ))
    })?;

    Ok(())
}
