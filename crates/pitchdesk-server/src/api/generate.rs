use axum::{extract::State, Extension, Json};
use pitchdesk_core::{EmailDraftSet, ResearchResult};
use pitchdesk_pipeline::PipelineError;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct GenerateRequest {
    pub company: String,
}

#[derive(Debug, Serialize)]
pub(super) struct GenerateResponse {
    history_id: String,
    rightsholder: String,
    research: ResearchResult,
    drafts: EmailDraftSet,
    /// Why placeholder drafts were used, when they were.
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback: Option<String>,
}

fn map_pipeline_error(request_id: String, error: &PipelineError) -> ApiError {
    match error {
        PipelineError::EmptyCompany | PipelineError::NoActiveProfile => {
            ApiError::new(request_id, "validation_error", error.to_string())
        }
        PipelineError::Busy => ApiError::new(request_id, "conflict", error.to_string()),
        PipelineError::Llm(e) => {
            tracing::error!(request_id = %request_id, error = %e, "generation request failed");
            ApiError::new(request_id, "bad_gateway", error.to_string())
        }
        PipelineError::Store(_) | PipelineError::LockPoisoned => {
            tracing::error!(request_id = %request_id, error = %error, "generation could not be saved");
            ApiError::new(request_id, "internal_error", "generation could not be saved")
        }
    }
}

pub(super) async fn generate(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<ApiResponse<GenerateResponse>>, ApiError> {
    let generation = state
        .generator
        .generate(&body.company, state.profiles.as_ref(), &state.history)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: GenerateResponse {
            history_id: generation.history_id,
            rightsholder: generation.rightsholder,
            research: generation.research,
            drafts: generation.drafts,
            fallback: generation.fallback.map(|reason| reason.to_string()),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
