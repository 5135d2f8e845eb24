//! Sentinel Hub client configuration.

use std::time::Duration;

use field_common::{FieldError, FieldResult};

pub const DEFAULT_BASE_URL: &str = "https://services.sentinel-hub.com";

/// Settings for the imagery provider.
///
/// Credentials are optional here so the service can start without them;
/// their absence surfaces as a configuration error on first use.
#[derive(Debug, Clone)]
pub struct SentinelHubConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub instance_id: Option<String>,
    /// Provider root, without trailing slash
    pub base_url: String,
    /// Bound on each of the token exchange and the process request
    pub timeout: Duration,
    /// Maximum scene cloud coverage, percent
    pub max_cloud_coverage: u8,
    /// Rendered image size in pixels
    pub output_width: u32,
    pub output_height: u32,
    /// Days of imagery ending today
    pub lookback_days: i64,
}

impl Default for SentinelHubConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            instance_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_cloud_coverage: 20,
            output_width: 512,
            output_height: 512,
            lookback_days: field_common::time::DEFAULT_LOOKBACK_DAYS,
        }
    }
}

/// Credentials checked to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub instance_id: String,
}

impl SentinelHubConfig {
    /// Create from environment variables.
    ///
    /// Reads SENTINEL_CLIENT_ID, SENTINEL_CLIENT_SECRET, SENTINEL_INSTANCE_ID,
    /// SENTINEL_BASE_URL and SENTINEL_TIMEOUT_SECS. Empty values count as unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let timeout = std::env::var("SENTINEL_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            client_id: non_empty_env("SENTINEL_CLIENT_ID"),
            client_secret: non_empty_env("SENTINEL_CLIENT_SECRET"),
            instance_id: non_empty_env("SENTINEL_INSTANCE_ID"),
            base_url: non_empty_env("SENTINEL_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            timeout,
            ..defaults
        }
    }

    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.base_url)
    }

    pub fn process_url(&self) -> String {
        format!("{}/api/v1/process", self.base_url)
    }

    /// Resolve credentials, failing when any is missing.
    ///
    /// The instance id is checked first: without it there is nothing to render
    /// and no placeholder image is ever substituted.
    pub fn credentials(&self) -> FieldResult<SentinelCredentials> {
        let instance_id = self.instance_id.clone().ok_or_else(|| {
            FieldError::Configuration(
                "Sentinel Hub INSTANCE_ID is not configured (set SENTINEL_INSTANCE_ID)".to_string(),
            )
        })?;

        match (&self.client_id, &self.client_secret) {
            (Some(client_id), Some(client_secret)) => Ok(SentinelCredentials {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                instance_id,
            }),
            _ => Err(FieldError::Configuration(
                "Sentinel Hub credentials are not set (SENTINEL_CLIENT_ID, SENTINEL_CLIENT_SECRET)"
                    .to_string(),
            )),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
