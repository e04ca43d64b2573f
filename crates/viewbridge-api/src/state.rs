//! Application state.
//!
//! Built once at startup from [`Config`] and shared behind an `Arc`.
//! Each optional feature block that is unconfigured leaves its slot
//! `None`; handlers degrade per feature instead of failing startup.

use std::sync::Arc;

use viewbridge_core::Config;
use viewbridge_worker::{ConversionPipeline, ConversionQueue};

use crate::platform::{HttpPlatformClient, PlatformClient};
use crate::viewer::ViewerClient;

pub struct AppState {
    pub config: Config,
    /// Conversion job queue; `None` when conversion roots are unconfigured.
    pub queue: Option<ConversionQueue>,
    /// Platform file-record lookups; `None` without platform credentials.
    pub platform: Option<Arc<dyn PlatformClient>>,
    /// Viewer URL building and notification; `None` without viewer settings.
    pub viewer: Option<ViewerClient>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self, anyhow::Error> {
        let queue = match &config.conversion {
            Some(settings) => Some(ConversionQueue::new(
                ConversionPipeline::new(settings.clone()),
                config.queue_size,
                config.max_concurrent_conversions,
            )),
            None => {
                tracing::warn!(
                    "Conversion roots or converter runtime not configured; \
                     attachment conversion is disabled"
                );
                None
            }
        };

        let platform: Option<Arc<dyn PlatformClient>> = match &config.platform {
            Some(settings) => Some(Arc::new(HttpPlatformClient::new(
                settings,
                config.http_client_timeout_secs,
            )?)),
            None => {
                tracing::warn!("Platform API not configured; file lookups are disabled");
                None
            }
        };

        let viewer = match &config.viewer {
            Some(settings) => Some(ViewerClient::new(
                settings.clone(),
                config.http_client_timeout_secs,
            )?),
            None => {
                tracing::warn!(
                    "Viewer base URL or disposable key not configured; redirects are disabled"
                );
                None
            }
        };

        Ok(Self {
            config,
            queue,
            platform,
            viewer,
        })
    }
}
