//! Per-attachment conversion pipeline: resolve → backup → convert →
//! relocate.
//!
//! Each attachment is an independent unit of work; a failure abandons
//! that attachment only and never touches its siblings. Nothing here is
//! retried and nothing survives a restart: an interrupted conversion is
//! simply gone.

use std::path::Path;

use tokio::fs;

use viewbridge_convert::{backup, converter::Converter, paths, relocate};
use viewbridge_core::{AppError, AttachmentRef, ConversionSettings, PostedAttachments};

/// Runs the conversion pipeline for every attachment of a posted event.
pub struct ConversionPipeline {
    settings: ConversionSettings,
    converter: Converter,
}

impl ConversionPipeline {
    pub fn new(settings: ConversionSettings) -> Self {
        let converter = Converter::new(&settings);
        Self {
            settings,
            converter,
        }
    }

    /// Process all attachments of one posted event, sequentially.
    ///
    /// Failures are logged with their identifiers and swallowed here:
    /// the queue worker has nowhere to propagate them, and a sibling
    /// attachment must not be affected.
    pub async fn process_event(&self, event: &PostedAttachments) {
        for attachment in &event.attachments {
            if let Err(e) = self.process_attachment(&event.post_id, attachment).await {
                tracing::error!(
                    post_id = %event.post_id,
                    file_id = %attachment.file_id,
                    file_name = %attachment.file_name,
                    stage = e.error_type(),
                    error = %e.detailed_message(),
                    "Attachment conversion abandoned"
                );
            }
        }
    }

    async fn process_attachment(
        &self,
        post_id: &str,
        attachment: &AttachmentRef,
    ) -> Result<(), AppError> {
        let roots = &self.settings.roots;

        let source = paths::resolve_attachment_path(roots, &attachment.storage_path)
            .ok_or_else(|| AppError::ConfigurationMissing("data root is not set".to_string()))?;
        let converted = paths::resolve_converted_path(roots, post_id, &attachment.file_name)
            .ok_or_else(|| AppError::ConfigurationMissing("output root is not set".to_string()))?;
        let final_path = paths::resolve_final_path(roots, post_id, &attachment.file_name)
            .ok_or_else(|| {
                AppError::ConfigurationMissing("viewer public root is not set".to_string())
            })?;

        // The converter is a black box; keep a copy of the original so a
        // failed run that consumed its input can be undone.
        let backup_path = match backup::backup_original(post_id, &source).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(
                    post_id = %post_id,
                    file_id = %attachment.file_id,
                    error = %e,
                    "Could not back up original, continuing without"
                );
                None
            }
        };

        tracing::info!(
            post_id = %post_id,
            file_id = %attachment.file_id,
            source = %source.display(),
            "Converting attachment"
        );

        if let Err(e) = self.converter.convert(&source, post_id).await {
            if let Some(backup_path) = backup_path {
                self.restore_if_consumed(post_id, &backup_path, &source).await;
            }
            return Err(e);
        }

        tracing::info!(
            post_id = %post_id,
            file_id = %attachment.file_id,
            from = %converted.display(),
            to = %final_path.display(),
            "Relocating converted artifact"
        );

        relocate::relocate(&converted, &final_path).await?;

        tracing::info!(
            post_id = %post_id,
            file_id = %attachment.file_id,
            artifact = %final_path.display(),
            "Attachment converted and published"
        );
        Ok(())
    }

    /// Put the original back if a failed conversion made it disappear.
    async fn restore_if_consumed(&self, post_id: &str, backup_path: &Path, source: &Path) {
        if fs::try_exists(source).await.unwrap_or(false) {
            return;
        }
        match backup::restore_original(backup_path, source).await {
            Ok(()) => {
                tracing::info!(
                    post_id = %post_id,
                    source = %source.display(),
                    "Restored original after failed conversion"
                );
            }
            Err(e) => {
                tracing::error!(
                    post_id = %post_id,
                    source = %source.display(),
                    error = %e,
                    "Failed to restore original after failed conversion"
                );
            }
        }
    }
}
