use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Flag, OrderedEntity, Resource};
use crate::ids::ProjectId;
use crate::validation::{Checker, Validate, ValidationErrors};

/// Free-text technology tags. Case-sensitive; an exact duplicate is refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechStack(Vec<String>);

impl TechStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a trimmed tag. Returns false for blank input or an exact duplicate.
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.0.iter().any(|t| t == tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|t| t != tag);
        self.0.len() != before
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for TechStack {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut stack = TechStack::new();
        for tag in iter {
            stack.insert(tag);
        }
        stack
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub details: Option<String>,
    pub image_url: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    #[serde(default)]
    pub tech_stack: TechStack,
    pub featured: bool,
    pub order: u32,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderedEntity for Project {
    type Id = ProjectId;
    type Scope = ();

    fn id(&self) -> &ProjectId {
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

/// Create and update body. The tech stack travels in the same payload as the
/// scalar fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub details: Option<String>,
    pub image_url: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub tech_stack: TechStack,
    pub featured: bool,
    pub is_visible: bool,
}

impl ProjectForm {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            details: None,
            image_url: None,
            live_url: None,
            github_url: None,
            tech_stack: TechStack::new(),
            featured: false,
            is_visible: true,
        }
    }

    pub fn from_existing(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            details: project.details.clone(),
            image_url: project.image_url.clone(),
            live_url: project.live_url.clone(),
            github_url: project.github_url.clone(),
            tech_stack: project.tech_stack.clone(),
            featured: project.featured,
            is_visible: project.is_visible,
        }
    }

    /// Empty optional inputs are submitted as null.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.details,
            &mut self.image_url,
            &mut self.live_url,
            &mut self.github_url,
        ] {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }
        self
    }
}

impl Validate for ProjectForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Checker::new()
            .length("title", &self.title, 2, 100)
            .length("description", &self.description, 10, 500)
            .max_length("details", self.details.as_deref(), 500)
            .optional_url("imageUrl", self.image_url.as_deref())
            .optional_url("liveUrl", self.live_url.as_deref())
            .optional_url("githubUrl", self.github_url.as_deref())
            .finish()
    }
}

impl Resource for Project {
    type Draft = ProjectForm;
    type Patch = ProjectForm;

    const LABEL: &'static str = "Project";
    const PLURAL: &'static str = "projects";

    fn flag(&self, flag: Flag) -> Option<bool> {
        match flag {
            Flag::Visible => Some(self.is_visible),
            Flag::Featured => Some(self.featured),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tech_stack_rejects_exact_duplicates_only() {
        let mut stack = TechStack::new();
        assert!(stack.insert("Rust"));
        assert!(!stack.insert("Rust"));
        assert!(!stack.insert("  Rust "));
        assert!(stack.insert("rust"));
        assert!(!stack.insert("   "));
        assert_eq!(stack.iter().collect::<Vec<_>>(), vec!["Rust", "rust"]);
    }

    #[test]
    fn tech_stack_remove() {
        let mut stack: TechStack = ["Go", "Rust"].into_iter().collect();
        assert!(stack.remove("Go"));
        assert!(!stack.remove("Go"));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn form_serializes_tech_stack_inline() {
        let mut form = ProjectForm::new("Folio", "A portfolio CMS");
        form.tech_stack.insert("Rust");
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["techStack"], serde_json::json!(["Rust"]));
        assert_eq!(json["isVisible"], true);
    }

    #[test]
    fn normalized_drops_empty_optionals() {
        let mut form = ProjectForm::new("Folio", "A portfolio CMS");
        form.live_url = Some(String::new());
        form.details = Some("  ".into());
        form.github_url = Some("https://github.com/x/y".into());
        let form = form.normalized();
        assert_eq!(form.live_url, None);
        assert_eq!(form.details, None);
        assert!(form.github_url.is_some());
    }

    #[test]
    fn short_description_is_rejected() {
        let err = ProjectForm::new("Folio", "short").validate().unwrap_err();
        assert_eq!(
            err.for_field("description"),
            Some("Must be at least 10 characters")
        );
    }
}
