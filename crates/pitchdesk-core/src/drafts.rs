//! Generation outputs: research summaries, email draft sets and history entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of history entries kept, newest first.
pub const HISTORY_LIMIT: usize = 50;

pub const FALLBACK_SUBJECT: &str = "Partnership Opportunity";
pub const FALLBACK_REASONING: &str = "AI-generated draft";
pub const FALLBACK_CONFIDENCE: i64 = 7;
pub const FALLBACK_RECOMMENDATION: &str = "Review all variations";

/// Output of the research stage. Only lives for the current generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub company: String,
    pub summary: String,
    /// Always empty: citations from the search tool are not extracted.
    #[serde(default)]
    pub sources: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// One email variant. Fields the model omitted stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<i64>,
}

/// The three styled variants plus the model's recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailDraftSet {
    pub conservative: EmailDraft,
    pub value_focused: EmailDraft,
    pub bold: EmailDraft,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl EmailDraftSet {
    /// Placeholder set used when the model's reply cannot be read as JSON.
    ///
    /// Every variant carries the unparsed reply as its body so the user still
    /// has something to work with.
    #[must_use]
    pub fn fallback(raw_text: &str) -> Self {
        let draft = EmailDraft {
            subject: Some(FALLBACK_SUBJECT.to_string()),
            body: Some(raw_text.to_string()),
            reasoning: Some(FALLBACK_REASONING.to_string()),
            confidence: Some(FALLBACK_CONFIDENCE),
        };
        Self {
            conservative: draft.clone(),
            value_focused: draft.clone(),
            bold: draft,
            recommendation: Some(FALLBACK_RECOMMENDATION.to_string()),
        }
    }

    /// Variants in display order with their labels.
    #[must_use]
    pub fn variants(&self) -> [(&'static str, &EmailDraft); 3] {
        [
            ("Conservative", &self.conservative),
            ("Value-Focused", &self.value_focused),
            ("Bold/Creative", &self.bold),
        ]
    }
}

/// A completed generation, as stored in the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub company: String,
    pub rightsholder: String,
    pub research: String,
    pub drafts: EmailDraftSet,
    pub timestamp: DateTime<Utc>,
}
