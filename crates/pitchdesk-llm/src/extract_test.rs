use pitchdesk_core::drafts::{
    FALLBACK_CONFIDENCE, FALLBACK_REASONING, FALLBACK_RECOMMENDATION, FALLBACK_SUBJECT,
};

use super::*;

const ACME_JSON: &str = r#"{"conservative":{"subject":"Intro","body":"Hi...","reasoning":"Safe opener","confidence":7},"valueFocused":{"subject":"ROI","body":"...","reasoning":"...","confidence":8},"bold":{"subject":"Bold ask","body":"...","reasoning":"...","confidence":6},"recommendation":"Use value-focused"}"#;

fn draft(subject: &str, body: &str, reasoning: &str, confidence: i64) -> EmailDraft {
    EmailDraft {
        subject: Some(subject.to_string()),
        body: Some(body.to_string()),
        reasoning: Some(reasoning.to_string()),
        confidence: Some(confidence),
    }
}

fn assert_fallback(extraction: &Extraction, raw: &str) {
    assert!(extraction.fallback.is_some(), "expected fallback");
    for (label, d) in extraction.drafts.variants() {
        assert_eq!(d.subject.as_deref(), Some(FALLBACK_SUBJECT), "{label}");
        assert_eq!(d.body.as_deref(), Some(raw), "{label}");
        assert_eq!(d.reasoning.as_deref(), Some(FALLBACK_REASONING), "{label}");
        assert_eq!(d.confidence, Some(FALLBACK_CONFIDENCE), "{label}");
    }
    assert_eq!(
        extraction.drafts.recommendation.as_deref(),
        Some(FALLBACK_RECOMMENDATION)
    );
}

#[test]
fn fenced_reply_with_prose_prefix_parses_without_fallback() {
    let raw = format!("here is the json: ```json\n{ACME_JSON}\n```");
    let extraction = extract_draft_set(&raw);

    assert_eq!(extraction.fallback, None);
    assert_eq!(
        extraction.drafts,
        EmailDraftSet {
            conservative: draft("Intro", "Hi...", "Safe opener", 7),
            value_focused: draft("ROI", "...", "...", 8),
            bold: draft("Bold ask", "...", "...", 6),
            recommendation: Some("Use value-focused".to_string()),
        }
    );
}

#[test]
fn bare_json_parses() {
    let extraction = extract_draft_set(ACME_JSON);
    assert_eq!(extraction.fallback, None);
    assert_eq!(extraction.drafts.bold.subject.as_deref(), Some("Bold ask"));
}

#[test]
fn reply_without_braces_falls_back_with_exact_body() {
    let raw = "I could not generate the email due to a content filter.";
    let extraction = extract_draft_set(raw);
    assert_fallback(&extraction, raw);
    assert_eq!(extraction.fallback, Some(FallbackReason::NoJsonObject));
}

#[test]
fn unparseable_span_falls_back() {
    let raw = "Sure! {conservative: not json at all}";
    let extraction = extract_draft_set(raw);
    assert_fallback(&extraction, raw);
    assert!(matches!(
        extraction.fallback,
        Some(FallbackReason::InvalidJson(_))
    ));
}

#[test]
fn missing_required_key_falls_back() {
    let raw = r#"{"conservative":{"subject":"a"},"bold":{"subject":"b"},"recommendation":"x"}"#;
    let extraction = extract_draft_set(raw);
    assert_fallback(&extraction, raw);
    assert_eq!(
        extraction.fallback,
        Some(FallbackReason::MissingKey("valueFocused"))
    );
}

#[test]
fn null_required_key_counts_as_missing() {
    let raw = r#"{"conservative":{},"valueFocused":{},"bold":null}"#;
    let extraction = extract_draft_set(raw);
    assert_eq!(extraction.fallback, Some(FallbackReason::MissingKey("bold")));
}

#[test]
fn falsy_required_keys_count_as_missing() {
    for (raw, key) in [
        (r#"{"conservative":"","valueFocused":{},"bold":{}}"#, "conservative"),
        (r#"{"conservative":{},"valueFocused":0,"bold":{}}"#, "valueFocused"),
        (r#"{"conservative":{},"valueFocused":{},"bold":false}"#, "bold"),
    ] {
        let extraction = extract_draft_set(raw);
        assert_eq!(extraction.fallback, Some(FallbackReason::MissingKey(key)), "{raw}");
        assert_fallback(&extraction, raw);
    }
}

#[test]
fn empty_object_variant_is_accepted() {
    let raw = r#"{"conservative":{},"valueFocused":{},"bold":{}}"#;
    let extraction = extract_draft_set(raw);
    assert_eq!(extraction.fallback, None);
    assert_eq!(extraction.drafts.bold, EmailDraft::default());
}

#[test]
fn fallback_body_is_the_unstripped_raw_text() {
    let raw = "```json\nnot really json\n```";
    let extraction = extract_draft_set(raw);
    assert_fallback(&extraction, raw);
}

#[test]
fn missing_sub_fields_pass_through_as_none() {
    let raw = r#"{"conservative":{"subject":"only subject"},"valueFocused":{},"bold":{"body":"b"}}"#;
    let extraction = extract_draft_set(raw);
    assert_eq!(extraction.fallback, None);
    assert_eq!(
        extraction.drafts.conservative,
        EmailDraft {
            subject: Some("only subject".to_string()),
            ..EmailDraft::default()
        }
    );
    assert_eq!(extraction.drafts.value_focused, EmailDraft::default());
    assert_eq!(extraction.drafts.bold.body.as_deref(), Some("b"));
    assert_eq!(extraction.drafts.recommendation, None);
}

#[test]
fn confidence_accepts_floats_and_numeric_strings() {
    let raw = r#"{"conservative":{"confidence":7.6},"valueFocused":{"confidence":"8"},"bold":{"confidence":"high"}}"#;
    let extraction = extract_draft_set(raw);
    assert_eq!(extraction.drafts.conservative.confidence, Some(8));
    assert_eq!(extraction.drafts.value_focused.confidence, Some(8));
    assert_eq!(extraction.drafts.bold.confidence, None);
}

#[test]
fn strip_code_fences_handles_zero_one_and_many_markers() {
    assert_eq!(strip_code_fences("plain text"), "plain text");
    assert_eq!(strip_code_fences("```json\n{}"), "{}");
    assert_eq!(strip_code_fences("a ```json {} ``` b ```"), "a {} b ");
    assert_eq!(strip_code_fences("```\n{}\n```\n```json\n[]```"), "{}\n[]");
}

#[test]
fn strip_code_fences_is_idempotent() {
    let once = strip_code_fences("```json\n{\"a\":1}\n```");
    assert_eq!(strip_code_fences(&once), once);
}

#[test]
fn brace_span_is_first_open_to_last_close() {
    assert_eq!(
        brace_span(r#"x {"a":{"b":1}} y {"c":2} z"#),
        Some(r#"{"a":{"b":1}} y {"c":2}"#)
    );
    assert_eq!(brace_span("no braces"), None);
    assert_eq!(brace_span("only { open"), None);
    assert_eq!(brace_span("} backwards {"), None);
    assert_eq!(brace_span("multi\nline {\n\"k\": 1\n}\n"), Some("{\n\"k\": 1\n}"));
}

#[test]
fn repeated_objects_in_prose_fall_back_as_invalid_json() {
    let raw = r#"Option A: {"conservative":{}} Option B: {"bold":{}}"#;
    let extraction = extract_draft_set(raw);
    assert!(matches!(
        extraction.fallback,
        Some(FallbackReason::InvalidJson(_))
    ));
}
