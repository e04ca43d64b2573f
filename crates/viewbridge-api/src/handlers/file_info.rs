//! Platform file-record passthrough.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use viewbridge_core::{AppError, FileRecord};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FileInfoParams {
    #[serde(default)]
    pub file_id: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/fileinfo",
    tag = "files",
    params(
        ("file_id" = String, Query, description = "Platform file identifier")
    ),
    responses(
        (status = 200, description = "File record", body = FileRecord),
        (status = 400, description = "Missing file_id", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
pub async fn get_file_info(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FileInfoParams>,
) -> Result<Json<FileRecord>, HttpAppError> {
    if params.file_id.trim().is_empty() {
        return Err(AppError::InvalidInput("file_id is required".to_string()).into());
    }

    let platform = state.platform.as_ref().ok_or_else(|| {
        AppError::ConfigurationMissing("platform API is not configured".to_string())
    })?;

    let record = platform.fetch_file_info(&params.file_id).await?;
    Ok(Json(record))
}
