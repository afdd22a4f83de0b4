//! HTTP client for the Messages proxy endpoint.
//!
//! Wraps `reqwest` with a fixed model, output ceiling and endpoint. Both
//! pipeline requests go to the same URL; only the research request enables
//! the web search tool. Non-success statuses surface as
//! [`LlmError::Status`] and are never retried.

use std::time::Duration;

use pitchdesk_core::AppConfig;
use reqwest::{Client, Url};

use crate::error::LlmError;
use crate::prompt::{research_prompt, search_query};
use crate::types::{Message, MessagesRequest, MessagesResponse, Tool, WEB_SEARCH_TOOL};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Longest error body kept in [`LlmError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Client for a Messages-style endpoint (normally the local proxy).
///
/// Use [`MessagesClient::from_config`] in binaries and [`MessagesClient::new`]
/// to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct MessagesClient {
    client: Client,
    endpoint: Url,
    model: String,
    max_tokens: u32,
    api_key: Option<String>,
    bearer_token: Option<String>,
}

impl MessagesClient {
    /// Creates a client posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed, or [`LlmError::InvalidEndpoint`] if `endpoint` is not a
    /// valid URL.
    pub fn new(
        endpoint: &str,
        model: &str,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("pitchdesk/0.1 (partnership-outreach)")
            .build()?;

        let endpoint = Url::parse(endpoint).map_err(|e| LlmError::InvalidEndpoint {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            endpoint,
            model: model.to_owned(),
            max_tokens,
            api_key: None,
            bearer_token: None,
        })
    }

    /// Creates a client from the `PITCHDESK_LLM_*` settings, including the
    /// bearer token the proxy expects when its auth is enabled.
    ///
    /// # Errors
    ///
    /// See [`MessagesClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, LlmError> {
        let client = Self::new(
            &config.llm_endpoint,
            &config.llm_model,
            config.llm_max_tokens,
            config.llm_timeout_secs,
        )?;
        Ok(match &config.llm_bearer_token {
            Some(token) => client.with_bearer_token(token.clone()),
            None => client,
        })
    }

    /// Sends `x-api-key` with every request, for talking to the upstream API
    /// directly instead of through the proxy.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sends `Authorization: Bearer <token>`, for a proxy that requires it.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Runs the web-search research request for `company` and returns the
    /// summary: every text block in order, each followed by a newline.
    ///
    /// # Errors
    ///
    /// - [`LlmError::Http`] on network failure.
    /// - [`LlmError::Status`] on a non-2xx response.
    /// - [`LlmError::Deserialize`] if the body is not a Messages response.
    pub async fn research(&self, company: &str) -> Result<String, LlmError> {
        tracing::info!(company, query = %search_query(company), "researching company");
        let prompt = research_prompt(company);
        let response = self.send(&prompt, &[WEB_SEARCH_TOOL]).await?;
        Ok(response.text_lines())
    }

    /// Sends a plain single-turn prompt and returns the concatenated text.
    ///
    /// # Errors
    ///
    /// Same as [`MessagesClient::research`].
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.send(prompt, &[]).await?;
        Ok(response.joined_text())
    }

    /// Posts one user message with the given tools.
    ///
    /// # Errors
    ///
    /// Same as [`MessagesClient::research`].
    pub async fn send(&self, prompt: &str, tools: &[Tool]) -> Result<MessagesResponse, LlmError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message::user(prompt)],
            tools,
        };

        let mut builder = self.client.post(self.endpoint.clone()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder
                .header("x-api-key", key)
                .header("anthropic-version", ANTHROPIC_VERSION);
        }
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "language model request failed");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        serde_json::from_str(&body).map_err(|e| LlmError::Deserialize {
            context: self.endpoint.to_string(),
            source: e,
        })
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
