//! Domain types and configuration shared by every pitchdesk crate.

mod app_config;
mod config;
pub mod drafts;
pub mod profiles;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use drafts::{EmailDraft, EmailDraftSet, HistoryEntry, ResearchResult, HISTORY_LIMIT};
pub use profiles::{
    default_profile, load_profiles, Asset, ProfileDetails, ProfilesFile,
    RightsholderProfile, TargetCategory, Territory,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read profiles file {path}: {source}")]
    ProfilesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profiles file: {0}")]
    ProfilesFileParse(#[from] serde_yaml::Error),

    #[error("profile validation failed: {0}")]
    Validation(String),
}
