//! OAuth2 client-credentials token exchange.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use field_common::{FieldError, FieldResult};

use crate::client::{read_error_body, transport_error};
use crate::config::SentinelCredentials;

const CONTEXT: &str = "Sentinel Hub token exchange";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Exchange client credentials for a bearer token.
#[instrument(skip(client, credentials), fields(url = %token_url))]
pub async fn fetch_access_token(
    client: &Client,
    token_url: &str,
    credentials: &SentinelCredentials,
) -> FieldResult<String> {
    let response = client
        .post(token_url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ])
        .send()
        .await
        .map_err(|e| transport_error(CONTEXT, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FieldError::Upstream {
            context: CONTEXT.to_string(),
            status: status.as_u16(),
            body: read_error_body(response).await,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| transport_error(CONTEXT, e))?;
    let token: TokenResponse = serde_json::from_slice(&body).map_err(|e| {
        FieldError::Validation(format!("{} returned an unexpected body: {}", CONTEXT, e))
    })?;

    if token.access_token.is_empty() {
        return Err(FieldError::Validation(format!(
            "{} returned an empty access_token",
            CONTEXT
        )));
    }

    debug!(expires_in = ?token.expires_in, "Obtained access token");
    Ok(token.access_token)
}
