mod api;
mod middleware;

use std::sync::{Arc, Mutex};

use chrono::Utc;
use pitchdesk_core::{AppConfig, ConfigError, Environment};
use pitchdesk_llm::MessagesClient;
use pitchdesk_pipeline::Generator;
use pitchdesk_store::{HistoryLog, ProfileRepository};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState, UpstreamProxy},
    middleware::{AuthState, RateLimits},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = pitchdesk_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let is_development = matches!(config.env, Environment::Development);
    let api_key = upstream_api_key(&config, is_development)?;

    let profiles = ProfileRepository::open(config.profiles_path(), Utc::now())?;
    let history = HistoryLog::new(config.history_path());
    tracing::info!(
        profiles = profiles.list().len(),
        path = %profiles.path().display(),
        "profiles loaded"
    );

    // The server already holds the key, so generations skip the proxy hop.
    let mut client = MessagesClient::new(
        &config.upstream_url,
        &config.llm_model,
        config.llm_max_tokens,
        config.llm_timeout_secs,
    )?;
    if let Some(key) = &api_key {
        client = client.with_api_key(key.clone());
    }
    let upstream = UpstreamProxy::new(&config.upstream_url, api_key, config.llm_timeout_secs)?;

    let state = AppState {
        profiles: Arc::new(Mutex::new(profiles)),
        history,
        generator: Arc::new(Generator::new(client)),
        upstream: Arc::new(upstream),
    };

    let auth = AuthState::from_env(is_development)?;
    let app = build_app(state, auth, RateLimits::default());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "pitchdesk server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// The upstream key is mandatory outside development; locally the server can
/// still serve profiles and history without one.
fn upstream_api_key(config: &AppConfig, is_development: bool) -> Result<Option<String>, ConfigError> {
    match (&config.anthropic_api_key, is_development) {
        (Some(key), _) => Ok(Some(key.clone())),
        (None, true) => {
            tracing::warn!("ANTHROPIC_API_KEY not set; /api/claude and generation will fail");
            Ok(None)
        }
        (None, false) => Err(ConfigError::MissingEnvVar("ANTHROPIC_API_KEY".to_string())),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
