//! `POST /api/claude`: relays a Messages request to the upstream API with the
//! server-held API key, so browsers never see the key.

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Upstream Messages endpoint plus the credentials to call it.
#[derive(Debug, Clone)]
pub struct UpstreamProxy {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl UpstreamProxy {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(url: &str, api_key: Option<String>, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("pitchdesk/0.1 (proxy)")
            .build()?;
        Ok(Self {
            client,
            url: url.to_owned(),
            api_key,
        })
    }
}

pub(super) async fn forward(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let upstream = &state.upstream;
    let Some(api_key) = upstream.api_key.as_deref() else {
        return Err(ApiError::new(
            req_id.0,
            "not_configured",
            "ANTHROPIC_API_KEY is not configured on the server",
        ));
    };

    if serde_json::from_slice::<serde_json::Value>(&body).is_err() {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "request body must be JSON",
        ));
    }

    let response = upstream
        .client
        .post(&upstream.url)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .body(body)
        .send()
        .await
        .map_err(|e| {
            tracing::warn!(request_id = %req_id.0, error = %e, "upstream request failed");
            ApiError::new(req_id.0.clone(), "bad_gateway", "upstream request failed")
        })?;

    let status = StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let bytes = response.bytes().await.map_err(|e| {
        tracing::warn!(request_id = %req_id.0, error = %e, "upstream body read failed");
        ApiError::new(req_id.0.clone(), "bad_gateway", "upstream response unreadable")
    })?;

    tracing::debug!(request_id = %req_id.0, status = status.as_u16(), "proxied request");

    Ok((status, [(header::CONTENT_TYPE, "application/json")], bytes).into_response())
}
