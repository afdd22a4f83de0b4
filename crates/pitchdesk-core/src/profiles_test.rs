use std::io::Write;

use super::*;

fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write yaml");
    file
}

#[test]
fn default_profile_is_active_and_complete() {
    let profile = default_profile(Utc::now());
    assert!(profile.active);
    assert_eq!(profile.name(), "Sporting Kansas City");
    assert_eq!(profile.details.league, "MLS");
    assert_eq!(profile.details.differentiators.len(), 5);
    assert_eq!(profile.details.assets.len(), 5);
    assert_eq!(profile.details.target_categories.len(), 4);
    assert_eq!(profile.details.pitch_angles.len(), 5);
}

#[test]
fn profile_serializes_with_flat_camel_case_keys() {
    let profile = default_profile(Utc::now());
    let json = serde_json::to_value(&profile).expect("serialize");
    assert_eq!(json["id"], "skc-001");
    assert_eq!(json["name"], "Sporting Kansas City");
    assert!(json["pitchAngles"].is_array());
    assert!(json["targetCategories"].is_array());
    assert_eq!(json["targetCategories"][0]["mlsPenetration"], "26%");
    assert_eq!(json["assets"][0]["type"], "Front-of-kit jersey");
    assert_eq!(json["assets"][0]["status"], "occupied");
    assert!(json["assets"][1].get("sponsor").is_none());
}

#[test]
fn profile_deserializes_with_missing_optional_lists() {
    let json = serde_json::json!({
        "id": "rh-1",
        "created": "2025-01-01T00:00:00Z",
        "name": "Minimal FC",
        "territory": { "primary": "Omaha" }
    });
    let profile: RightsholderProfile = serde_json::from_value(json).expect("deserialize");
    assert!(!profile.active);
    assert_eq!(profile.details.territory.primary, "Omaha");
    assert!(profile.details.differentiators.is_empty());
    assert!(profile.details.approach.is_empty());
}

#[test]
fn load_profiles_reads_valid_yaml() {
    let file = write_yaml(
        r"
profiles:
  - name: Kansas City Current
    league: NWSL
    sport: Soccer
    territory:
      primary: Kansas City metro
    differentiators:
      - First stadium built for a women's team
    targetCategories:
      - name: Healthcare
        priority: high
        note: Family audience
",
    );
    let parsed = load_profiles(file.path()).expect("valid yaml");
    assert_eq!(parsed.profiles.len(), 1);
    let profile = &parsed.profiles[0];
    assert_eq!(profile.name, "Kansas City Current");
    assert_eq!(profile.target_categories[0].priority, "high");
    assert!(profile.target_categories[0].mls_penetration.is_none());
}

#[test]
fn load_profiles_rejects_blank_name() {
    let file = write_yaml("profiles:\n  - name: '  '\n");
    let err = load_profiles(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn load_profiles_rejects_duplicate_names_case_insensitive() {
    let file = write_yaml("profiles:\n  - name: Royals\n  - name: royals\n");
    let err = load_profiles(file.path()).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate")),
        "expected duplicate validation error, got: {err:?}"
    );
}

#[test]
fn load_profiles_reports_missing_file() {
    let err = load_profiles(Path::new("/nonexistent/profiles.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::ProfilesFileIo { .. }));
}

#[test]
fn load_profiles_reports_parse_errors() {
    let file = write_yaml("profiles: 42\n");
    let err = load_profiles(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ProfilesFileParse(_)));
}

#[test]
fn unrecognised_priority_and_status_are_kept_verbatim() {
    let json = serde_json::json!({
        "id": "rh-2",
        "created": "2025-01-01T00:00:00Z",
        "name": "Free Text FC",
        "territory": { "primary": "Tulsa" },
        "assets": [{ "type": "Scoreboard", "status": "pending renewal", "value": "High" }],
        "targetCategories": [{ "name": "Energy", "priority": "critical", "note": "Local HQs" }]
    });
    let profile: RightsholderProfile = serde_json::from_value(json).expect("deserialize");
    assert_eq!(profile.details.assets[0].status, "pending renewal");
    assert_eq!(profile.details.target_categories[0].priority, "critical");
}
