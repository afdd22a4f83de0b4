use pitchdesk_llm::LlmError;
use pitchdesk_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("company name must not be empty")]
    EmptyCompany,

    #[error("no active rightsholder profile")]
    NoActiveProfile,

    #[error("a generation is already in progress")]
    Busy,

    #[error("language model request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("profile repository lock poisoned")]
    LockPoisoned,
}

impl PipelineError {
    /// Caller-side guard failures, detected before any request is sent.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, PipelineError::EmptyCompany | PipelineError::NoActiveProfile)
    }
}
