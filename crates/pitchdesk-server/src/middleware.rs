//! Request tagging, bearer auth and rate budgets.
//!
//! Every route is tagged with a request id. Only `/api/v1/health` skips auth.
//! The `/api/claude` proxy and the JSON API draw from separate budgets, since
//! every proxied call spends upstream tokens.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_REQUEST_ID_LEN: usize = 128;

#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuses the caller's `x-request-id` when it is short printable ASCII,
    /// otherwise mints a UUID.
    fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| {
                !id.is_empty()
                    && id.len() <= MAX_REQUEST_ID_LEN
                    && id.bytes().all(|b| b.is_ascii_graphic())
            })
            .map_or_else(|| Self(Uuid::new_v4().to_string()), |id| Self(id.to_owned()))
    }
}

fn request_id_of(req: &Request) -> String {
    req.extensions()
        .get::<RequestId>()
        .map_or_else(String::new, |id| id.0.clone())
}

/// Stores a [`RequestId`] in the request extensions and echoes it back.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = RequestId::from_headers(req.headers());
    let echoed = HeaderValue::from_str(&id.0).ok();
    req.extensions_mut().insert(id);

    let mut res = next.run(req).await;
    if let Some(value) = echoed {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

/// Bearer tokens accepted by the proxy and the JSON API.
///
/// The CLI authenticates against the proxy with `PITCHDESK_LLM_BEARER`, which
/// must be one of these keys.
#[derive(Debug, Clone)]
pub struct AuthState {
    api_keys: Arc<Vec<String>>,
    pub enabled: bool,
}

impl AuthState {
    /// Reads `PITCHDESK_API_KEYS` (comma-separated).
    ///
    /// # Errors
    ///
    /// Fails outside development when no key is configured.
    pub fn from_env(is_development: bool) -> anyhow::Result<Self> {
        let raw = std::env::var("PITCHDESK_API_KEYS").unwrap_or_default();
        Self::from_keys(&raw, is_development)
    }

    /// # Errors
    ///
    /// See [`AuthState::from_env`].
    pub fn from_keys(raw: &str, is_development: bool) -> anyhow::Result<Self> {
        let mut keys: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        keys.sort();
        keys.dedup();

        if keys.is_empty() && !is_development {
            anyhow::bail!(
                "PITCHDESK_API_KEYS is required outside development; \
                 the CLI must send one of them as PITCHDESK_LLM_BEARER"
            );
        }
        if keys.is_empty() {
            tracing::warn!("PITCHDESK_API_KEYS not set; proxy and API are open in development");
        }

        Ok(Self {
            enabled: !keys.is_empty(),
            api_keys: Arc::new(keys),
        })
    }

    /// Constant-time match against every configured key.
    fn allows(&self, token: &str) -> bool {
        self.api_keys.iter().fold(false, |found, key| {
            found | bool::from(key.as_bytes().ct_eq(token.as_bytes()))
        })
    }
}

pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.enabled || bearer_token(req.headers()).is_some_and(|t| auth.allows(t)) {
        return next.run(req).await;
    }

    tracing::debug!(path = %req.uri().path(), "rejected request without a valid bearer token");
    ApiError::new(
        request_id_of(&req),
        "unauthorized",
        "missing or invalid bearer token",
    )
    .into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[derive(Debug)]
struct Window {
    started_at: Instant,
    count: usize,
}

/// A named fixed-window request budget.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    name: &'static str,
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<Window>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(name: &'static str, max_requests: usize, window: Duration) -> Self {
        Self {
            name,
            max_requests,
            window,
            state: Arc::new(Mutex::new(Window {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }

    /// Takes one request from the budget, or returns how long until the
    /// window resets.
    async fn acquire(&self) -> Result<(), Duration> {
        let mut window = self.state.lock().await;
        if window.started_at.elapsed() >= self.window {
            window.started_at = Instant::now();
            window.count = 0;
        }
        if window.count >= self.max_requests {
            return Err(self.window.saturating_sub(window.started_at.elapsed()));
        }
        window.count += 1;
        Ok(())
    }
}

/// Budgets for the two guarded route groups.
#[derive(Debug, Clone)]
pub struct RateLimits {
    pub api: RateLimitState,
    pub proxy: RateLimitState,
}

impl Default for RateLimits {
    /// 120 API calls and 20 proxied calls (ten generations) per minute.
    fn default() -> Self {
        Self {
            api: RateLimitState::new("api", 120, Duration::from_secs(60)),
            proxy: RateLimitState::new("proxy", 20, Duration::from_secs(60)),
        }
    }
}

pub async fn enforce_rate_limit(
    State(budget): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let retry_after = match budget.acquire().await {
        Ok(()) => return next.run(req).await,
        Err(retry_after) => retry_after,
    };

    tracing::warn!(budget = budget.name, "rate limit exceeded");
    let mut res = ApiError::new(
        request_id_of(&req),
        "rate_limited",
        format!("{} rate limit exceeded", budget.name),
    )
    .into_response();
    res.headers_mut().insert(
        header::RETRY_AFTER,
        HeaderValue::from(retry_after.as_secs().max(1)),
    );
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(name, HeaderValue::from_str(value).expect("header value"));
        map
    }

    #[test]
    fn request_id_reuses_printable_caller_id() {
        let id = RequestId::from_headers(&headers(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            "req-42",
        ));
        assert_eq!(id.0, "req-42");
    }

    #[test]
    fn request_id_replaces_unusable_caller_ids() {
        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        for raw in ["   ", "two words", long.as_str()] {
            let id = RequestId::from_headers(&headers(
                header::HeaderName::from_static(REQUEST_ID_HEADER),
                raw,
            ));
            assert!(Uuid::parse_str(&id.0).is_ok(), "{raw:?} should be replaced");
        }
        assert!(Uuid::parse_str(&RequestId::from_headers(&HeaderMap::new()).0).is_ok());
    }

    #[test]
    fn bearer_token_requires_bearer_scheme() {
        assert_eq!(
            bearer_token(&headers(header::AUTHORIZATION, "Bearer test-token")),
            Some("test-token")
        );
        assert_eq!(bearer_token(&headers(header::AUTHORIZATION, "Basic abc123")), None);
        assert_eq!(bearer_token(&headers(header::AUTHORIZATION, "Bearer   ")), None);
    }

    #[test]
    fn auth_state_disables_when_no_keys_in_dev() {
        let state = AuthState::from_keys("", true).expect("dev should allow missing keys");
        assert!(!state.enabled);
    }

    #[test]
    fn auth_state_requires_keys_outside_dev() {
        assert!(AuthState::from_keys(" , ", false).is_err());
    }

    #[test]
    fn auth_state_matches_only_configured_keys() {
        let state = AuthState::from_keys("alpha, beta", false).expect("keys");
        assert!(state.enabled);
        assert!(state.allows("alpha"));
        assert!(state.allows("beta"));
        assert!(!state.allows("gamma"));
        assert!(!state.allows("alph"));
    }

    #[tokio::test]
    async fn budget_reports_time_until_reset_once_spent() {
        let budget = RateLimitState::new("test", 2, Duration::from_secs(60));
        assert!(budget.acquire().await.is_ok());
        assert!(budget.acquire().await.is_ok());
        let retry_after = budget.acquire().await.unwrap_err();
        assert!(retry_after <= Duration::from_secs(60));
        assert!(retry_after > Duration::from_secs(50));
    }

    #[tokio::test]
    async fn budget_refills_after_window() {
        let budget = RateLimitState::new("test", 1, Duration::from_millis(20));
        assert!(budget.acquire().await.is_ok());
        assert!(budget.acquire().await.is_err());
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(budget.acquire().await.is_ok());
    }
}
