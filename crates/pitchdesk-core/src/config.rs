use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("PITCHDESK_ENV", "development"))?;

    let bind_addr = or_default("PITCHDESK_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("PITCHDESK_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("PITCHDESK_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("PITCHDESK_DATA_DIR", "./data"));

    let llm_endpoint = or_default(
        "PITCHDESK_LLM_ENDPOINT",
        "http://127.0.0.1:3000/api/claude",
    );
    let llm_model = or_default("PITCHDESK_LLM_MODEL", "claude-sonnet-4-20250514");
    let llm_max_tokens = parse_u32("PITCHDESK_LLM_MAX_TOKENS", "1000")?;
    if llm_max_tokens == 0 {
        return Err(invalid(
            "PITCHDESK_LLM_MAX_TOKENS",
            "must be greater than zero".to_string(),
        ));
    }
    let llm_timeout_secs = parse_u64("PITCHDESK_LLM_TIMEOUT_SECS", "120")?;

    let upstream_url = or_default(
        "PITCHDESK_UPSTREAM_URL",
        "https://api.anthropic.com/v1/messages",
    );
    let non_blank = |var: &str| lookup(var).ok().filter(|v| !v.trim().is_empty());
    let llm_bearer_token = non_blank("PITCHDESK_LLM_BEARER");
    let anthropic_api_key = non_blank("ANTHROPIC_API_KEY");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        data_dir,
        llm_endpoint,
        llm_model,
        llm_max_tokens,
        llm_timeout_secs,
        llm_bearer_token,
        upstream_url,
        anthropic_api_key,
    })
}

/// Parse `PITCHDESK_ENV` into an [`Environment`].
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PITCHDESK_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
