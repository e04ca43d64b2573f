//! Ingestion of "message posted with attachments" events.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use viewbridge_core::{AppError, PostedAttachments};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// The platform pushes one event per posted message. The handler only
/// validates and enqueues; conversion happens on the worker pool, so the
/// platform's call site is never blocked on a conversion.
#[utoipa::path(
    post,
    path = "/api/v1/events/attachments-posted",
    tag = "events",
    request_body = PostedAttachments,
    responses(
        (status = 202, description = "Event accepted"),
        (status = 400, description = "Malformed event", body = ErrorResponse),
        (status = 503, description = "Conversion queue is full", body = ErrorResponse)
    )
)]
pub async fn attachments_posted(
    State(state): State<Arc<AppState>>,
    Json(event): Json<PostedAttachments>,
) -> Result<impl IntoResponse, HttpAppError> {
    if event.post_id.trim().is_empty() {
        return Err(AppError::InvalidInput("post_id is required".to_string()).into());
    }
    for attachment in &event.attachments {
        if attachment.file_id.trim().is_empty()
            || attachment.file_name.trim().is_empty()
            || attachment.storage_path.trim().is_empty()
        {
            return Err(AppError::InvalidInput(
                "every attachment needs file_id, file_name and storage_path".to_string(),
            )
            .into());
        }
    }

    if event.attachments.is_empty() {
        tracing::debug!(post_id = %event.post_id, "Post has no attachments, nothing to convert");
        return Ok(StatusCode::ACCEPTED);
    }

    let Some(queue) = &state.queue else {
        tracing::warn!(
            post_id = %event.post_id,
            "Conversion is not configured, ignoring posted attachments"
        );
        return Ok(StatusCode::ACCEPTED);
    };

    tracing::info!(
        post_id = %event.post_id,
        attachments = event.attachments.len(),
        "Post with attachments detected"
    );

    queue.submit(event)?;
    Ok(StatusCode::ACCEPTED)
}
