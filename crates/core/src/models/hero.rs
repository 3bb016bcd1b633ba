use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Document;
use crate::ids::DocumentId;
use crate::validation::{Checker, Validate, ValidationErrors};

pub const MAX_HERO_STATS: usize = 6;

/// A headline figure such as "8+" / "Years Experience". Stats are positional:
/// their order is their index in the hero's array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroStat {
    pub label: String,
    pub value: String,
}

impl HeroStat {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn is_incomplete(&self) -> bool {
        self.value.trim().is_empty() || self.label.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub id: DocumentId,
    pub initials: String,
    pub full_name: String,
    pub title: String,
    pub location: String,
    pub profile_image: Option<String>,
    pub gradient_from: String,
    pub gradient_to: String,
    #[serde(default)]
    pub stats: Vec<HeroStat>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hero {
    pub fn profile(&self) -> HeroProfile {
        HeroProfile {
            initials: self.initials.clone(),
            full_name: self.full_name.clone(),
            title: self.title.clone(),
            location: self.location.clone(),
            profile_image: self.profile_image.clone(),
            gradient_from: self.gradient_from.clone(),
            gradient_to: self.gradient_to.clone(),
        }
    }
}

/// Scalar hero fields edited by the profile form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroProfile {
    pub initials: String,
    pub full_name: String,
    pub title: String,
    pub location: String,
    pub profile_image: Option<String>,
    pub gradient_from: String,
    pub gradient_to: String,
}

impl Validate for HeroProfile {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Checker::new()
            .length("initials", &self.initials, 1, 5)
            .length("fullName", &self.full_name, 2, 100)
            .length("title", &self.title, 2, 100)
            .length("location", &self.location, 2, 150)
            .optional_url("profileImage", self.profile_image.as_deref())
            .hex_color("gradientFrom", &self.gradient_from)
            .hex_color("gradientTo", &self.gradient_to)
            .finish()
    }
}

/// `PUT /hero` body. Stats are always sent as the complete array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroPatch {
    #[serde(flatten)]
    pub profile: Option<HeroProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<HeroStat>>,
}

impl HeroPatch {
    pub fn stats(stats: Vec<HeroStat>) -> Self {
        Self {
            profile: None,
            stats: Some(stats),
        }
    }

    pub fn profile(mut profile: HeroProfile) -> Self {
        if profile.profile_image.as_deref() == Some("") {
            profile.profile_image = None;
        }
        Self {
            profile: Some(profile),
            stats: None,
        }
    }
}

impl Validate for HeroPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checker = Checker::new();
        if let Some(profile) = &self.profile {
            profile.validate()?;
        }
        if let Some(stats) = &self.stats {
            if stats.len() > MAX_HERO_STATS {
                checker.push("stats", format!("Max {MAX_HERO_STATS} stats"));
            }
            for (i, stat) in stats.iter().enumerate() {
                checker
                    .not_blank(&format!("stats[{i}].value"), &stat.value)
                    .not_blank(&format!("stats[{i}].label"), &stat.label);
            }
        }
        checker.finish()
    }
}

impl Document for Hero {
    type Patch = HeroPatch;

    const LABEL: &'static str = "Hero section";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> HeroProfile {
        HeroProfile {
            initials: "JC".into(),
            full_name: "Jo Carter".into(),
            title: "Engineer".into(),
            location: "Lisbon".into(),
            profile_image: None,
            gradient_from: "#6366f1".into(),
            gradient_to: "#a855f7".into(),
        }
    }

    #[test]
    fn stats_patch_requires_value_and_label() {
        let patch = HeroPatch::stats(vec![HeroStat::new("8+", "Years"), HeroStat::new("", "Clients")]);
        let err = patch.validate().unwrap_err();
        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.for_field("stats[1].value"), Some("Required"));
    }

    #[test]
    fn stats_patch_caps_at_six() {
        let stats = (0..7).map(|i| HeroStat::new(i.to_string(), "x")).collect();
        assert!(HeroPatch::stats(stats).validate().is_err());
    }

    #[test]
    fn stats_patch_serializes_only_stats() {
        let json = serde_json::to_value(HeroPatch::stats(vec![HeroStat::new("3", "Apps")])).unwrap();
        assert_eq!(json, serde_json::json!({ "stats": [{ "label": "Apps", "value": "3" }] }));
    }

    #[test]
    fn profile_patch_flattens_and_nulls_empty_image() {
        let mut p = profile();
        p.profile_image = Some(String::new());
        let json = serde_json::to_value(HeroPatch::profile(p)).unwrap();
        assert_eq!(json["fullName"], "Jo Carter");
        assert!(json["profileImage"].is_null());
        assert!(json.get("stats").is_none());
    }

    #[test]
    fn profile_rejects_bad_color_and_long_initials() {
        let mut p = profile();
        p.initials = "ABCDEF".into();
        p.gradient_to = "purple".into();
        let err = p.validate().unwrap_err();
        assert!(err.for_field("initials").is_some());
        assert!(err.for_field("gradientTo").is_some());
    }
}
