//! Imagery provider trait and the Sentinel Hub implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use reqwest::{header, Client, Response};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use field_common::{BoundingBox, DateWindow, FieldError, FieldResult, Geometry};

use crate::auth::fetch_access_token;
use crate::config::SentinelHubConfig;
use crate::request::ProcessRequest;

const PROCESS_CONTEXT: &str = "Sentinel Hub process request";

/// Longest provider error body kept for diagnostics.
const MAX_ERROR_BODY: usize = 2048;

/// A rendered NDVI image and the bounds it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageryResult {
    pub content_type: String,
    pub bytes: Bytes,
    pub bounds: BoundingBox,
}

impl ImageryResult {
    /// `data:` URI embedding the image, consumable directly by a browser.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Serialized form handed to the web UI.
#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

impl From<&ImageryResult> for ImageUrl {
    fn from(result: &ImageryResult) -> Self {
        Self {
            image_url: result.data_uri(),
        }
    }
}

/// Source of rendered vegetation-index imagery.
#[async_trait]
pub trait ImageryProvider: Send + Sync {
    /// Render the field polygon over `bbox`. Never retries.
    async fn fetch_imagery(&self, geometry: &Geometry, bbox: BoundingBox)
        -> FieldResult<ImageryResult>;
}

/// Sentinel Hub Process API client.
pub struct SentinelHubClient {
    client: Client,
    config: SentinelHubConfig,
}

impl SentinelHubClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SentinelHubConfig) -> FieldResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10).min(config.timeout))
            .build()
            .map_err(|e| FieldError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SentinelHubConfig {
        &self.config
    }

    async fn render(
        &self,
        token: &str,
        request: &ProcessRequest,
    ) -> FieldResult<(String, Bytes)> {
        let response = self
            .client
            .post(self.config.process_url())
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(PROCESS_CONTEXT, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FieldError::Upstream {
                context: PROCESS_CONTEXT.to_string(),
                status: status.as_u16(),
                body: read_error_body(response).await,
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "image/png".to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(PROCESS_CONTEXT, e))?;

        if bytes.is_empty() {
            return Err(FieldError::Validation(format!(
                "{} returned an empty image",
                PROCESS_CONTEXT
            )));
        }
        if !content_type.starts_with("image/") {
            return Err(FieldError::Validation(format!(
                "{} returned {} instead of an image",
                PROCESS_CONTEXT, content_type
            )));
        }

        Ok((content_type, bytes))
    }
}

#[async_trait]
impl ImageryProvider for SentinelHubClient {
    #[instrument(skip(self, geometry), fields(bbox = ?bbox.to_array()))]
    async fn fetch_imagery(
        &self,
        geometry: &Geometry,
        bbox: BoundingBox,
    ) -> FieldResult<ImageryResult> {
        let credentials = self.config.credentials()?;
        bbox.validate()?;

        let started = Instant::now();
        let token = fetch_access_token(&self.client, &self.config.token_url(), &credentials).await?;

        let window = DateWindow::trailing(chrono::Utc::now(), self.config.lookback_days);
        let request = ProcessRequest::ndvi(geometry, bbox, window, &self.config);
        debug!(
            from = %window.from,
            to = %window.to,
            instance_id = %credentials.instance_id,
            "Requesting NDVI render"
        );

        let result = self.render(&token, &request).await;
        let elapsed = started.elapsed().as_secs_f64();
        metrics::histogram!("imagery_fetch_duration_seconds").record(elapsed);

        let (content_type, bytes) = result.map_err(|e| {
            warn!(error = %e, elapsed_secs = elapsed, "NDVI render failed");
            e
        })?;

        info!(
            bytes = bytes.len(),
            content_type = %content_type,
            elapsed_secs = elapsed,
            "NDVI image received"
        );

        Ok(ImageryResult {
            content_type,
            bytes,
            bounds: bbox,
        })
    }
}

pub(crate) fn transport_error(context: &str, err: reqwest::Error) -> FieldError {
    if err.is_timeout() {
        FieldError::Timeout(format!("{} timed out", context))
    } else {
        FieldError::Transport {
            context: context.to_string(),
            message: err.to_string(),
        }
    }
}

pub(crate) async fn read_error_body(response: Response) -> String {
    match response.text().await {
        Ok(mut body) => {
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            body
        }
        Err(e) => format!("<unreadable body: {}>", e),
    }
}
