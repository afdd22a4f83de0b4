use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use pitchdesk_core::{ProfileDetails, RightsholderProfile};

use crate::middleware::RequestId;

use super::{lock_poisoned, map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

fn validate_details(req_id: &str, details: &ProfileDetails) -> Result<(), ApiError> {
    if details.name.trim().is_empty() {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "profile name must not be empty",
        ));
    }
    Ok(())
}

pub(super) async fn list_profiles(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<RightsholderProfile>>>, ApiError> {
    let repo = state
        .profiles
        .lock()
        .map_err(|_| lock_poisoned(req_id.0.clone()))?;
    let data = repo.list().to_vec();
    drop(repo);

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<RightsholderProfile>>, ApiError> {
    let repo = state
        .profiles
        .lock()
        .map_err(|_| lock_poisoned(req_id.0.clone()))?;
    let profile = repo.get(&id).cloned();
    drop(repo);

    let profile = profile.ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("profile '{id}' not found"),
        )
    })?;

    Ok(Json(ApiResponse {
        data: profile,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn create_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(details): Json<ProfileDetails>,
) -> Result<(StatusCode, Json<ApiResponse<RightsholderProfile>>), ApiError> {
    validate_details(&req_id.0, &details)?;

    let mut repo = state
        .profiles
        .lock()
        .map_err(|_| lock_poisoned(req_id.0.clone()))?;
    let created = repo
        .add(details, Utc::now())
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .clone();
    drop(repo);

    tracing::info!(id = %created.id, name = %created.name(), "profile created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: created,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

pub(super) async fn update_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(details): Json<ProfileDetails>,
) -> Result<Json<ApiResponse<RightsholderProfile>>, ApiError> {
    validate_details(&req_id.0, &details)?;

    let mut repo = state
        .profiles
        .lock()
        .map_err(|_| lock_poisoned(req_id.0.clone()))?;
    repo.update(&id, details)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    let updated = repo.get(&id).cloned();
    drop(repo);

    let updated = updated.ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("profile '{id}' not found"),
        )
    })?;

    Ok(Json(ApiResponse {
        data: updated,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn delete_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut repo = state
        .profiles
        .lock()
        .map_err(|_| lock_poisoned(req_id.0.clone()))?;
    let removed = repo
        .delete(&id)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    drop(repo);

    tracing::info!(id = %removed.id, name = %removed.name(), "profile deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn activate_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<RightsholderProfile>>, ApiError> {
    let mut repo = state
        .profiles
        .lock()
        .map_err(|_| lock_poisoned(req_id.0.clone()))?;
    let active = repo
        .activate(&id)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .clone();
    drop(repo);

    tracing::info!(id = %active.id, name = %active.name(), "profile activated");

    Ok(Json(ApiResponse {
        data: active,
        meta: ResponseMeta::new(req_id.0),
    }))
}
