//! Viewer redirect: build the authenticated viewer URL for a converted
//! file, notify the viewer backend, and answer with `302 Found`.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use viewbridge_convert::paths;
use viewbridge_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::viewer::ViewerClient;

#[derive(Debug, Deserialize)]
pub struct RedirectParams {
    #[serde(default)]
    pub file_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub authority: String,
}

fn require<'a>(value: &'a str, name: &str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", name)));
    }
    Ok(value)
}

#[utoipa::path(
    get,
    path = "/api/v1/viewer-redirect",
    tag = "viewer",
    params(
        ("file_id" = String, Query, description = "Platform file identifier"),
        ("user_id" = String, Query, description = "Requesting user's id"),
        ("user_name" = String, Query, description = "Requesting user's display name"),
        ("authority" = String, Query, description = "Requesting user's authority level")
    ),
    responses(
        (status = 302, description = "Redirect to the viewer"),
        (status = 400, description = "Missing parameters", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 502, description = "Viewer backend unreachable", body = ErrorResponse)
    )
)]
pub async fn viewer_redirect(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RedirectParams>,
) -> Result<Response, HttpAppError> {
    let file_id = require(&params.file_id, "file_id")?;
    let user_name = require(&params.user_name, "user_name")?;
    // user_id and authority authorize the request but do not appear in
    // the viewer URL.
    require(&params.user_id, "user_id")?;
    require(&params.authority, "authority")?;

    let platform = state.platform.as_ref().ok_or_else(|| {
        AppError::ConfigurationMissing("platform API is not configured".to_string())
    })?;
    let viewer = state.viewer.as_ref().ok_or_else(|| {
        AppError::ConfigurationMissing("viewer URL or disposable key is not set".to_string())
    })?;

    let record = platform.fetch_file_info(file_id).await.map_err(|e| {
        tracing::debug!(file_id = %file_id, error = %e, "File lookup failed");
        e
    })?;

    let relative_path = paths::relative_public_path(&record.post_id, &record.name);
    let final_url =
        viewer.build_viewer_url(file_id, user_name, &relative_path, &ViewerClient::insert_stamp());

    // The viewer must know the mapping before the user arrives; a failed
    // notification withholds the redirect entirely.
    viewer.notify_mapping(file_id, &final_url).await?;

    tracing::info!(file_id = %file_id, "Redirecting to viewer");
    Ok((StatusCode::FOUND, [(header::LOCATION, final_url)]).into_response())
}
