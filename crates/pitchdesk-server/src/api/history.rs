use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use pitchdesk_core::HistoryEntry;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_store_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct HistoryQuery {
    pub limit: Option<usize>,
}

pub(super) async fn list_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<HistoryEntry>>>, ApiError> {
    let limit = normalize_limit(params.limit);
    let mut entries = state
        .history
        .list()
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    entries.truncate(limit);

    Ok(Json(ApiResponse {
        data: entries,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_history_entry(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<HistoryEntry>>, ApiError> {
    let entry = state
        .history
        .get(&id)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("history entry '{id}' not found"),
            )
        })?;

    Ok(Json(ApiResponse {
        data: entry,
        meta: ResponseMeta::new(req_id.0),
    }))
}
