//! Best-effort structured-response extractor for the draft request.
//!
//! Models do not always honour "return only JSON": replies arrive wrapped in
//! code fences or prefixed with prose. [`extract_draft_set`] strips fences,
//! takes the span from the first `{` to the last `}` and parses that. Anything
//! that still does not yield an object with `conservative`, `valueFocused` and
//! `bold` produces [`EmailDraftSet::fallback`] instead of an error.

use std::sync::LazyLock;

use pitchdesk_core::{EmailDraft, EmailDraftSet};
use regex::Regex;
use serde_json::Value;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*").expect("valid json fence regex"));
static ANY_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\s*").expect("valid fence regex"));
static BRACE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid brace span regex"));

const REQUIRED_KEYS: [&str; 3] = ["conservative", "valueFocused", "bold"];

/// Why a reply could not be used as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    NoJsonObject,
    InvalidJson(String),
    MissingKey(&'static str),
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::NoJsonObject => write!(f, "no JSON object found in response"),
            FallbackReason::InvalidJson(e) => write!(f, "invalid JSON: {e}"),
            FallbackReason::MissingKey(key) => write!(f, "missing required key '{key}'"),
        }
    }
}

/// Result of [`extract_draft_set`]. `fallback` is `Some` when the placeholder
/// set was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub drafts: EmailDraftSet,
    pub fallback: Option<FallbackReason>,
}

/// Remove ```` ```json ```` openers and any other ```` ``` ```` markers, along
/// with the whitespace that follows each.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    let without_json = JSON_FENCE.replace_all(text, "");
    ANY_FENCE.replace_all(&without_json, "").into_owned()
}

/// The substring from the first `{` to the last `}`, if any.
#[must_use]
pub fn brace_span(text: &str) -> Option<&str> {
    BRACE_SPAN.find(text).map(|m| m.as_str())
}

/// Turn the raw draft reply into an [`EmailDraftSet`]. Never fails.
#[must_use]
pub fn extract_draft_set(raw_text: &str) -> Extraction {
    match parse_draft_set(raw_text) {
        Ok(drafts) => Extraction {
            drafts,
            fallback: None,
        },
        Err(reason) => {
            tracing::warn!(%reason, "draft response unusable, using fallback drafts");
            Extraction {
                drafts: EmailDraftSet::fallback(raw_text),
                fallback: Some(reason),
            }
        }
    }
}

fn parse_draft_set(raw_text: &str) -> Result<EmailDraftSet, FallbackReason> {
    let cleaned = strip_code_fences(raw_text);
    let candidate = brace_span(&cleaned).ok_or(FallbackReason::NoJsonObject)?;
    let value: Value =
        serde_json::from_str(candidate).map_err(|e| FallbackReason::InvalidJson(e.to_string()))?;

    for key in REQUIRED_KEYS {
        if value.get(key).is_none_or(is_blank) {
            return Err(FallbackReason::MissingKey(key));
        }
    }

    Ok(EmailDraftSet {
        conservative: draft_from_value(&value["conservative"]),
        value_focused: draft_from_value(&value["valueFocused"]),
        bold: draft_from_value(&value["bold"]),
        recommendation: text_field(value.get("recommendation")),
    })
}

/// `null`, `false`, `0` and `""` do not count as a draft variant.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Read a variant without validating it: absent fields stay `None`.
fn draft_from_value(value: &Value) -> EmailDraft {
    EmailDraft {
        subject: text_field(value.get("subject")),
        body: text_field(value.get("body")),
        reasoning: text_field(value.get("reasoning")),
        confidence: confidence_field(value.get("confidence")),
    }
}

fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn confidence_field(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
