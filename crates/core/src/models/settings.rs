use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Document;
use crate::ids::{DocumentId, MessageId};
use crate::validation::{Checker, Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub id: DocumentId,
    pub site_title: String,
    pub site_tagline: Option<String>,
    pub favicon: Option<String>,
    pub og_image: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub footer_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettingsForm {
    pub site_title: String,
    pub site_tagline: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub footer_text: Option<String>,
}

impl Validate for SiteSettingsForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Checker::new()
            .length("siteTitle", &self.site_title, 1, 100)
            .max_length("siteTagline", self.site_tagline.as_deref(), 200)
            .optional_url("githubUrl", self.github_url.as_deref())
            .optional_url("linkedinUrl", self.linkedin_url.as_deref())
            .optional_url("twitterUrl", self.twitter_url.as_deref())
            .optional_url("portfolioUrl", self.portfolio_url.as_deref())
            .max_length("footerText", self.footer_text.as_deref(), 500)
            .finish()
    }
}

impl Document for SiteSettings {
    type Patch = SiteSettingsForm;

    const LABEL: &'static str = "Site settings";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSettings {
    pub id: DocumentId,
    pub heading: String,
    pub description: String,
    pub email: String,
    pub button_text: String,
    pub show_subject_field: bool,
    pub require_subject: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSettingsForm {
    pub heading: String,
    pub description: Option<String>,
    pub email: String,
    pub button_text: String,
    pub show_subject_field: bool,
    pub require_subject: bool,
}

impl ContactSettingsForm {
    /// A hidden subject field cannot be required.
    pub fn normalized(mut self) -> Self {
        if !self.show_subject_field {
            self.require_subject = false;
        }
        self
    }
}

impl Validate for ContactSettingsForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Checker::new()
            .length("heading", &self.heading, 1, 100)
            .max_length("description", self.description.as_deref(), 500)
            .email("email", &self.email)
            .length("buttonText", &self.button_text, 1, 50)
            .finish()
    }
}

impl Document for ContactSettings {
    type Patch = ContactSettingsForm;

    const LABEL: &'static str = "Contact settings";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: MessageId,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_subject_cannot_be_required() {
        let form = ContactSettingsForm {
            heading: "Say hi".into(),
            description: None,
            email: "me@site.dev".into(),
            button_text: "Send".into(),
            show_subject_field: false,
            require_subject: true,
        }
        .normalized();
        assert!(!form.require_subject);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn site_settings_need_a_title() {
        let err = SiteSettingsForm::default().validate().unwrap_err();
        assert_eq!(err.for_field("siteTitle"), Some("Required"));
    }
}
