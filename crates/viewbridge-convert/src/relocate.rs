//! Artifact relocation: copy to the servable location, then remove the
//! converter's output.

use std::path::Path;

use tokio::fs;

use viewbridge_core::AppError;

/// Move `source` to `dest` as copy-then-delete.
///
/// The source is removed only after the copy has returned without error,
/// so a partial failure can never lose the artifact. An existing
/// destination is overwritten (last-write-wins). A failed source deletion
/// is logged as a warning and does not fail the relocation; the artifact
/// is already safely in place.
pub async fn relocate(source: &Path, dest: &Path) -> Result<(), AppError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).await.map_err(|e| {
            AppError::RelocationFailed(format!(
                "failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    fs::copy(source, dest).await.map_err(|e| {
        AppError::RelocationFailed(format!(
            "failed to copy {} to {}: {}",
            source.display(),
            dest.display(),
            e
        ))
    })?;

    if let Err(e) = fs::remove_file(source).await {
        tracing::warn!(
            source = %source.display(),
            error = %e,
            "Failed to remove converter output after relocation"
        );
    }

    Ok(())
}
