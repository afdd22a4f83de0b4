use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Where a rightsholder's audience lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Territory {
    pub primary: String,
    #[serde(default)]
    pub extended: String,
    #[serde(default)]
    pub reach: String,
}

/// A sellable sponsorship inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(rename = "type")]
    pub kind: String,
    /// Free text such as `available` or `occupied`.
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsor: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetCategory {
    pub name: String,
    /// Free text, normally `high`, `medium` or `low`.
    pub priority: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mls_penetration: Option<String>,
    #[serde(default)]
    pub note: String,
}

/// The user-editable part of a rightsholder profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetails {
    pub name: String,
    #[serde(default)]
    pub league: String,
    #[serde(default)]
    pub sport: String,
    #[serde(default)]
    pub territory: Territory,
    #[serde(default)]
    pub differentiators: Vec<String>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub target_categories: Vec<TargetCategory>,
    #[serde(default)]
    pub pitch_angles: Vec<String>,
    #[serde(default)]
    pub current_sponsors: Vec<String>,
    #[serde(default)]
    pub approach: String,
}

/// A persisted rightsholder profile.
///
/// `id`, `created` and `active` are owned by the repository; everything else
/// lives in [`ProfileDetails`] and is flattened into the same JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightsholderProfile {
    pub id: String,
    #[serde(default)]
    pub active: bool,
    pub created: DateTime<Utc>,
    #[serde(flatten)]
    pub details: ProfileDetails,
}

impl RightsholderProfile {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.details.name
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfilesFile {
    pub profiles: Vec<ProfileDetails>,
}

/// Load and validate rightsholder profiles from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_profiles(path: &Path) -> Result<ProfilesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfilesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let profiles_file: ProfilesFile = serde_yaml::from_str(&content)?;

    validate_profiles(&profiles_file)?;

    Ok(profiles_file)
}

fn validate_profiles(profiles_file: &ProfilesFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for profile in &profiles_file.profiles {
        if profile.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "profile name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(profile.name.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate profile name: '{}'",
                profile.name
            )));
        }
    }

    Ok(())
}

/// The profile a fresh install starts with.
#[must_use]
pub fn default_profile(created: DateTime<Utc>) -> RightsholderProfile {
    let strings = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();

    let asset = |kind: &str, status: &str, sponsor: Option<&str>, value: &str| Asset {
        kind: kind.to_string(),
        status: status.to_string(),
        sponsor: sponsor.map(str::to_string),
        value: value.to_string(),
    };

    let category = |name: &str, priority: &str, penetration: &str, note: &str| TargetCategory {
        name: name.to_string(),
        priority: priority.to_string(),
        mls_penetration: Some(penetration.to_string()),
        note: note.to_string(),
    };

    RightsholderProfile {
        id: "skc-001".to_string(),
        active: true,
        created,
        details: ProfileDetails {
            name: "Sporting Kansas City".to_string(),
            league: "MLS".to_string(),
            sport: "Soccer".to_string(),
            territory: Territory {
                primary: "Kansas City metro (2.5M people)".to_string(),
                extended: "6-state youth academy system (KS, MO, NE, IA, OK, AR)".to_string(),
                reach: "100,000+ youth players".to_string(),
            },
            differentiators: strings(&[
                "World Cup 2026 host city (Kansas City selected)",
                "Only MLS team with 6-state territorial rights for youth academy",
                "Pinnacle National Training Center (world-class training facility)",
                "Children's Mercy Park (18,467 capacity, modern amenities)",
                "Strong midwest market presence with national brand appeal",
            ]),
            assets: vec![
                asset(
                    "Front-of-kit jersey",
                    "occupied",
                    Some("Compass Minerals"),
                    "Premium",
                ),
                asset("Sleeve sponsorship", "available", None, "High"),
                asset("Training kit", "available", None, "Medium"),
                asset("Practice facility naming", "available", None, "High"),
                asset("Youth academy naming", "available", None, "Premium"),
            ],
            target_categories: vec![
                category("Healthcare", "high", "26%", "Top MLS category"),
                category("Financial Services", "high", "26%", "Tied for #1"),
                category("Technology/AI", "high", "0%", "First-mover opportunity"),
                category(
                    "Consumer Products",
                    "medium",
                    "30%",
                    "Most active category",
                ),
            ],
            pitch_angles: strings(&[
                "World Cup 2026 activation opportunities (global visibility in host city)",
                "6-state territorial reach vs single-market teams",
                "Youth academy = 100,000+ family engagement at scale",
                "Midwest market value for national brands looking beyond coasts",
                "First-mover advantage in emerging categories (especially AI/tech)",
            ]),
            current_sponsors: strings(&["Compass Minerals (Industrial - unique in MLS)"]),
            approach: "Fact-based value propositions, company-specific solutions, focus on ROI and business objectives".to_string(),
        },
    }
}

#[cfg(test)]
#[path = "profiles_test.rs"]
mod tests;
