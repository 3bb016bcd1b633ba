use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{OrderedEntity, Resource};
use crate::ids::{CategoryId, SkillId};
use crate::validation::{Checker, Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategory {
    pub id: CategoryId,
    pub name: String,
    pub order: u32,
    /// Populated by `GET /skills`; the client keeps skills in their own
    /// collection and leaves this empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<Skill>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub order: u32,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderedEntity for SkillCategory {
    type Id = CategoryId;
    type Scope = ();

    fn id(&self) -> &CategoryId {
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

impl OrderedEntity for Skill {
    type Id = SkillId;
    type Scope = CategoryId;

    fn id(&self) -> &SkillId {
        &self.id
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }

    fn scope(&self) -> CategoryId {
        self.category_id.clone()
    }
}

/// Category create and rename share one body: `{ "name": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInput {
    pub name: String,
}

impl CategoryInput {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
        }
    }
}

impl Validate for CategoryInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Checker::new().not_blank("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDraft {
    pub category_id: CategoryId,
    pub name: String,
}

impl SkillDraft {
    pub fn new(category_id: CategoryId, name: &str) -> Self {
        Self {
            category_id,
            name: name.trim().to_string(),
        }
    }
}

impl Validate for SkillDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Checker::new().not_blank("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillPatch {
    pub name: String,
}

impl SkillPatch {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
        }
    }
}

impl Validate for SkillPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Checker::new().not_blank("name", &self.name).finish()
    }
}

impl Resource for SkillCategory {
    type Draft = CategoryInput;
    type Patch = CategoryInput;

    const LABEL: &'static str = "Category";
    const PLURAL: &'static str = "categories";
}

impl Resource for Skill {
    type Draft = SkillDraft;
    type Patch = SkillPatch;

    const LABEL: &'static str = "Skill";
    const PLURAL: &'static str = "skills";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(CategoryInput::new("  Frontend ").name, "Frontend");
        assert!(CategoryInput::new("   ").validate().is_err());
        assert!(SkillDraft::new(CategoryId::from("c1"), "\t").validate().is_err());
        assert!(SkillPatch::new(" Rust ").validate().is_ok());
    }

    #[test]
    fn skill_scope_is_its_category() {
        let skill: Skill = serde_json::from_value(serde_json::json!({
            "id": "s1",
            "name": "Rust",
            "order": 0,
            "categoryId": "c9",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(skill.scope(), CategoryId::from("c9"));
    }

    #[test]
    fn category_accepts_nested_skills_on_the_wire() {
        let cat: SkillCategory = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "name": "Backend",
            "order": 2,
            "skills": [{
                "id": "s1", "name": "Go", "order": 0, "categoryId": "c1",
                "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"
            }],
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(cat.skills.len(), 1);
        assert_eq!(cat.skills[0].category_id, cat.id);
    }
}
