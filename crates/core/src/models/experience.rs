use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::entity::{Flag, OrderedEntity, Resource};
use crate::ids::ExperienceId;
use crate::validation::{Checker, Validate, ValidationErrors};

/// Accepts `YYYY-MM-DD` as well as a full ISO timestamp; only the date part is kept.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn de_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}

fn de_opt_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => parse_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}"))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: ExperienceId,
    pub job_title: String,
    pub company: String,
    pub location: String,
    #[serde(deserialize_with = "de_date")]
    pub start_date: NaiveDate,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub end_date: Option<NaiveDate>,
    pub description: String,
    pub order: u32,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Experience {
    /// An entry without an end date is the current job.
    pub fn is_current(&self) -> bool {
        self.end_date.is_none()
    }
}

impl OrderedEntity for Experience {
    type Id = ExperienceId;
    type Scope = ();

    fn id(&self) -> &ExperienceId {
        &self.id
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }

    fn scope(&self) {}
}

/// What the edit form holds. `is_current_job` and `end_date` are mutually
/// exclusive; the conflict is resolved in [`ExperienceForm::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceForm {
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_current_job: bool,
    pub description: String,
    pub is_visible: bool,
}

impl ExperienceForm {
    pub fn from_existing(experience: &Experience) -> Self {
        Self {
            job_title: experience.job_title.clone(),
            company: experience.company.clone(),
            location: experience.location.clone(),
            start_date: Some(experience.start_date),
            end_date: experience.end_date,
            is_current_job: experience.is_current(),
            description: experience.description.clone(),
            is_visible: experience.is_visible,
        }
    }

    /// Validates the form and produces the request body. A current job is
    /// always submitted with `endDate: null`, whatever the date field holds.
    pub fn submit(&self) -> Result<ExperienceDraft, ValidationErrors> {
        let mut checker = Checker::new();
        checker
            .length("jobTitle", &self.job_title, 2, 100)
            .length("company", &self.company, 2, 100)
            .length("location", &self.location, 2, 100)
            .length("description", &self.description, 10, 1000);
        let Some(start_date) = self.start_date else {
            checker.push("startDate", "Start date is required");
            return Err(checker.into_errors());
        };
        checker.finish()?;

        Ok(ExperienceDraft {
            job_title: self.job_title.clone(),
            company: self.company.clone(),
            location: self.location.clone(),
            start_date,
            end_date: if self.is_current_job { None } else { self.end_date },
            description: self.description.clone(),
            is_visible: self.is_visible,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceDraft {
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: String,
    pub is_visible: bool,
}

impl Validate for ExperienceDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Checker::new()
            .length("jobTitle", &self.job_title, 2, 100)
            .length("company", &self.company, 2, 100)
            .length("location", &self.location, 2, 100)
            .length("description", &self.description, 10, 1000)
            .finish()
    }
}

impl Resource for Experience {
    type Draft = ExperienceDraft;
    type Patch = ExperienceDraft;

    const LABEL: &'static str = "Experience";
    const PLURAL: &'static str = "experience";

    fn flag(&self, flag: Flag) -> Option<bool> {
        match flag {
            Flag::Visible => Some(self.is_visible),
            Flag::Featured => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ExperienceForm {
        ExperienceForm {
            job_title: "Staff Engineer".into(),
            company: "Acme".into(),
            location: "Remote".into(),
            start_date: NaiveDate::from_ymd_opt(2021, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2023, 6, 30),
            is_current_job: false,
            description: "Built the billing platform.".into(),
            is_visible: true,
        }
    }

    #[test]
    fn current_job_clears_end_date() {
        let mut f = form();
        f.is_current_job = true;
        let draft = f.submit().unwrap();
        assert_eq!(draft.end_date, None);
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json["endDate"].is_null());
        assert_eq!(json["startDate"], "2021-03-01");
    }

    #[test]
    fn past_job_keeps_end_date() {
        let draft = form().submit().unwrap();
        assert_eq!(draft.end_date, NaiveDate::from_ymd_opt(2023, 6, 30));
    }

    #[test]
    fn missing_start_date_is_a_field_error() {
        let mut f = form();
        f.start_date = None;
        let err = f.submit().unwrap_err();
        assert_eq!(err.for_field("startDate"), Some("Start date is required"));
        assert_eq!(err.errors().len(), 1);
    }

    #[test]
    fn missing_start_date_is_reported_with_other_errors() {
        let mut f = form();
        f.start_date = None;
        f.company = "A".into();
        let err = f.submit().unwrap_err();
        assert_eq!(err.for_field("company"), Some("Must be at least 2 characters"));
        assert_eq!(err.for_field("startDate"), Some("Start date is required"));
        assert_eq!(err.errors().len(), 2);
    }

    #[test]
    fn reads_iso_timestamps_and_null_end_dates() {
        let exp: Experience = serde_json::from_value(serde_json::json!({
            "id": "e1",
            "jobTitle": "Engineer",
            "company": "Acme",
            "location": "Remote",
            "startDate": "2020-01-15T00:00:00.000Z",
            "endDate": null,
            "description": "Did things well.",
            "order": 0,
            "isVisible": true,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(exp.start_date, NaiveDate::from_ymd_opt(2020, 1, 15).unwrap());
        assert!(exp.is_current());
        assert!(ExperienceForm::from_existing(&exp).is_current_job);
    }
}
