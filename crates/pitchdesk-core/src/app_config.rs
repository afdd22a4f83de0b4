use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub data_dir: PathBuf,
    pub llm_endpoint: String,
    pub llm_model: String,
    pub llm_max_tokens: u32,
    pub llm_timeout_secs: u64,
    /// Bearer token sent to `llm_endpoint` when the proxy enforces auth.
    pub llm_bearer_token: Option<String>,
    pub upstream_url: String,
    pub anthropic_api_key: Option<String>,
}

impl AppConfig {
    /// Path of the persisted rightsholder profile list.
    #[must_use]
    pub fn profiles_path(&self) -> PathBuf {
        self.data_dir.join("rightsholders.json")
    }

    /// Path of the persisted generation history.
    #[must_use]
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("email_history.json")
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("data_dir", &self.data_dir)
            .field("llm_endpoint", &self.llm_endpoint)
            .field("llm_model", &self.llm_model)
            .field("llm_max_tokens", &self.llm_max_tokens)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field(
                "llm_bearer_token",
                &self.llm_bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .field("upstream_url", &self.upstream_url)
            .field(
                "anthropic_api_key",
                &self.anthropic_api_key.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
