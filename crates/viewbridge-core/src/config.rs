//! Configuration module
//!
//! Environment-driven configuration for the viewbridge service. The whole
//! configuration is loaded once at startup via [`Config::from_env`] and
//! passed by reference into every component; there is no global state.
//!
//! Conversion and viewer settings are optional blocks: when the required
//! variables are absent the corresponding feature no-ops instead of
//! failing startup, so the HTTP surface stays available.

use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 4600;
const DEFAULT_QUEUE_SIZE: usize = 256;
const DEFAULT_MAX_CONCURRENT_CONVERSIONS: usize = 2;
const DEFAULT_CONVERTER_TIMEOUT_SECS: u64 = 300;
const DEFAULT_HTTP_CLIENT_TIMEOUT_SECS: u64 = 30;

/// Root directories the conversion pipeline derives paths from.
/// Shared read-only by all pipeline runs.
#[derive(Clone, Debug)]
pub struct ConversionRoots {
    /// Root of the messaging platform's attachment storage.
    pub data_root: PathBuf,
    /// Root the external converter writes artifacts under.
    pub output_root: PathBuf,
    /// Root of the viewer web application's servable tree.
    pub viewer_public_root: PathBuf,
}

/// Settings for the conversion pipeline (roots + external converter).
#[derive(Clone, Debug)]
pub struct ConversionSettings {
    pub roots: ConversionRoots,
    /// Executable that runs the converter script (e.g. "python3").
    pub converter_runtime: String,
    /// Path to the converter script.
    pub converter_script: PathBuf,
    /// Deadline for a single converter invocation.
    pub converter_timeout_secs: u64,
}

/// Settings for building viewer URLs and notifying the viewer backend.
#[derive(Clone, Debug)]
pub struct ViewerSettings {
    /// Base URL of the viewer web application.
    pub base_url: String,
    /// Shared secret embedded in viewer URLs for short-lived access.
    pub disposable_key: String,
}

/// Settings for the messaging platform's REST API.
#[derive(Clone, Debug)]
pub struct PlatformSettings {
    pub base_url: String,
    pub token: String,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub conversion: Option<ConversionSettings>,
    pub viewer: Option<ViewerSettings>,
    pub platform: Option<PlatformSettings>,
    /// Bound of the conversion job queue.
    pub queue_size: usize,
    /// Maximum conversion jobs processed concurrently.
    pub max_concurrent_conversions: usize,
    pub http_client_timeout_secs: u64,
}

/// Read an env var, treating an unset or empty value as absent.
fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let conversion = Self::conversion_from_env();
        let viewer = Self::viewer_from_env();
        let platform = Self::platform_from_env();

        Ok(Config {
            server_port,
            cors_origins,
            environment,
            conversion,
            viewer,
            platform,
            queue_size: env::var("QUEUE_SIZE")
                .unwrap_or_else(|_| DEFAULT_QUEUE_SIZE.to_string())
                .parse()
                .unwrap_or(DEFAULT_QUEUE_SIZE)
                .max(1),
            max_concurrent_conversions: env::var("MAX_CONCURRENT_CONVERSIONS")
                .unwrap_or_else(|_| DEFAULT_MAX_CONCURRENT_CONVERSIONS.to_string())
                .parse()
                .unwrap_or(DEFAULT_MAX_CONCURRENT_CONVERSIONS)
                .max(1),
            http_client_timeout_secs: env::var("HTTP_CLIENT_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_HTTP_CLIENT_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_HTTP_CLIENT_TIMEOUT_SECS),
        })
    }

    /// Conversion block: all three roots plus the converter runtime are
    /// required; the script path defaults to the converter shipped inside
    /// the viewer tree.
    fn conversion_from_env() -> Option<ConversionSettings> {
        let data_root = env_opt("DATA_ROOT")?;
        let output_root = env_opt("OUTPUT_ROOT")?;
        let viewer_public_root = env_opt("VIEWER_PUBLIC_ROOT")?;
        let converter_runtime = env_opt("CONVERTER_RUNTIME")?;

        let converter_script = env_opt("CONVERTER_SCRIPT")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                PathBuf::from(&viewer_public_root)
                    .join("public")
                    .join("web")
                    .join("convert.py")
            });

        Some(ConversionSettings {
            roots: ConversionRoots {
                data_root: PathBuf::from(data_root),
                output_root: PathBuf::from(output_root),
                viewer_public_root: PathBuf::from(viewer_public_root),
            },
            converter_runtime,
            converter_script,
            converter_timeout_secs: env::var("CONVERTER_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_CONVERTER_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_CONVERTER_TIMEOUT_SECS),
        })
    }

    fn viewer_from_env() -> Option<ViewerSettings> {
        Some(ViewerSettings {
            base_url: env_opt("VIEWER_BASE_URL")?.trim_end_matches('/').to_string(),
            disposable_key: env_opt("DISPOSABLE_KEY")?,
        })
    }

    fn platform_from_env() -> Option<PlatformSettings> {
        Some(PlatformSettings {
            base_url: env_opt("PLATFORM_BASE_URL")?.trim_end_matches('/').to_string(),
            token: env_opt("PLATFORM_TOKEN")?,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Whether the conversion pipeline has everything it needs.
    pub fn conversion_enabled(&self) -> bool {
        self.conversion.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state; keep each key set distinct so
    // tests do not race on shared variables.

    #[test]
    fn conversion_block_absent_without_roots() {
        env::remove_var("DATA_ROOT");
        env::remove_var("OUTPUT_ROOT");
        env::remove_var("VIEWER_PUBLIC_ROOT");
        env::remove_var("CONVERTER_RUNTIME");
        assert!(Config::conversion_from_env().is_none());
    }

    #[test]
    fn viewer_block_requires_both_values() {
        env::remove_var("VIEWER_BASE_URL");
        env::remove_var("DISPOSABLE_KEY");
        assert!(Config::viewer_from_env().is_none());

        env::set_var("VIEWER_BASE_URL", "http://viewer.example.com/");
        assert!(Config::viewer_from_env().is_none());

        env::set_var("DISPOSABLE_KEY", "secret");
        let viewer = Config::viewer_from_env().expect("viewer settings");
        // Trailing slash is normalized away
        assert_eq!(viewer.base_url, "http://viewer.example.com");
        env::remove_var("VIEWER_BASE_URL");
        env::remove_var("DISPOSABLE_KEY");
    }

    #[test]
    fn empty_env_value_counts_as_absent() {
        env::set_var("PLATFORM_BASE_URL", "");
        env::remove_var("PLATFORM_TOKEN");
        assert!(Config::platform_from_env().is_none());
        env::remove_var("PLATFORM_BASE_URL");
    }
}
