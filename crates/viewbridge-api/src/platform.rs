//! Client for the messaging platform's REST API.
//!
//! The platform owns attachment metadata; viewbridge only reads it. The
//! trait seam keeps handlers testable without a live platform.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use viewbridge_core::{AppError, FileRecord, PlatformSettings};

/// Read access to platform file records.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    async fn fetch_file_info(&self, file_id: &str) -> Result<FileRecord, AppError>;
}

/// Production implementation backed by the platform REST API.
pub struct HttpPlatformClient {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpPlatformClient {
    pub fn new(settings: &PlatformSettings, timeout_secs: u64) -> Result<Self, anyhow::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client for the platform API")?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            token: settings.token.clone(),
        })
    }
}

#[async_trait]
impl PlatformClient for HttpPlatformClient {
    async fn fetch_file_info(&self, file_id: &str) -> Result<FileRecord, AppError> {
        let url = format!("{}/api/v4/files/{}/info", self.base_url, file_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("platform request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("file {} not found", file_id)));
        }

        let response = response
            .error_for_status()
            .map_err(|e| AppError::Internal(format!("platform request failed: {}", e)))?;

        response
            .json::<FileRecord>()
            .await
            .map_err(|e| AppError::Internal(format!("invalid platform response: {}", e)))
    }
}
