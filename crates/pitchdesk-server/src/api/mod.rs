mod generate;
mod history;
mod profiles;
mod proxy;

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use pitchdesk_pipeline::Generator;
use pitchdesk_store::{HistoryLog, ProfileRepository, StoreError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RateLimits,
    RequestId,
};

pub use proxy::UpstreamProxy;

#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<Mutex<ProfileRepository>>,
    pub history: HistoryLog,
    pub generator: Arc<Generator>,
    pub upstream: Arc<UpstreamProxy>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    generating: bool,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "bad_gateway" => StatusCode::BAD_GATEWAY,
            "not_configured" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(50).clamp(1, pitchdesk_core::HISTORY_LIMIT)
}

pub(super) fn map_store_error(request_id: String, error: &StoreError) -> ApiError {
    match error {
        StoreError::NotFound(id) => {
            ApiError::new(request_id, "not_found", format!("profile '{id}' not found"))
        }
        other => {
            tracing::error!(error = %other, "storage operation failed");
            ApiError::new(request_id, "internal_error", "storage operation failed")
        }
    }
}

pub(super) fn lock_poisoned(request_id: String) -> ApiError {
    tracing::error!("profile repository lock poisoned");
    ApiError::new(request_id, "internal_error", "profile repository unavailable")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

/// Auth runs before the budget so rejected callers do not spend it.
fn guarded(router: Router<AppState>, auth: AuthState, budget: RateLimitState) -> Router<AppState> {
    router.layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                auth,
                require_bearer_auth,
            ))
            .layer(axum::middleware::from_fn_with_state(
                budget,
                enforce_rate_limit,
            )),
    )
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/profiles",
            get(profiles::list_profiles).post(profiles::create_profile),
        )
        .route(
            "/api/v1/profiles/{id}",
            get(profiles::get_profile)
                .put(profiles::update_profile)
                .delete(profiles::delete_profile),
        )
        .route(
            "/api/v1/profiles/{id}/activate",
            post(profiles::activate_profile),
        )
        .route("/api/v1/history", get(history::list_history))
        .route("/api/v1/history/{id}", get(history::get_history_entry))
        .route("/api/v1/generate", post(generate::generate))
}

pub fn build_app(state: AppState, auth: AuthState, limits: RateLimits) -> Router {
    let proxy_routes = Router::new().route("/api/claude", post(proxy::forward));

    Router::new()
        .route("/api/v1/health", get(health))
        .merge(guarded(proxy_routes, auth.clone(), limits.proxy))
        .merge(guarded(api_routes(), auth, limits.api))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData {
                status: "ok",
                generating: state.generator.is_busy(),
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
