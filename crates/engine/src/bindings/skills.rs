use std::sync::Arc;

use folio_core::models::{CategoryInput, Skill, SkillCategory, SkillDraft, SkillPatch};
use folio_core::{CategoryId, Direction, SkillId};
use folio_storage::RemoteStore;

use crate::controller::{CollectionController, Deletion};
use crate::error::EngineError;
use crate::notify::Ui;
use crate::preview::{CategoryPreview, PreviewProjector, SortedView};
use crate::reconcile::ReconciliationPolicy;

/// Two-level skills: categories form one ordering scope, and each
/// category's skills form their own.
#[derive(Clone)]
pub struct SkillsBinding {
    categories: CollectionController<SkillCategory>,
    skills: CollectionController<Skill>,
}

impl SkillsBinding {
    pub fn new(
        categories: Arc<dyn RemoteStore<SkillCategory>>,
        skills: Arc<dyn RemoteStore<Skill>>,
        ui: Ui,
    ) -> Self {
        Self {
            categories: CollectionController::new(categories, ui.clone()),
            skills: CollectionController::new(skills, ui),
        }
    }

    pub fn with_policy(self, policy: ReconciliationPolicy) -> Self {
        Self {
            categories: self.categories.with_policy(policy),
            skills: self.skills.with_policy(policy),
        }
    }

    pub fn categories(&self) -> &CollectionController<SkillCategory> {
        &self.categories
    }

    pub fn skills(&self) -> &CollectionController<Skill> {
        &self.skills
    }

    pub fn skills_in(&self, category: &CategoryId) -> Vec<Skill> {
        self.skills.scope_items(category)
    }

    pub async fn load(&self) -> Result<(), EngineError> {
        self.categories.load().await?;
        self.skills.load().await
    }

    pub async fn create_category(&self, name: &str) -> Result<SkillCategory, EngineError> {
        self.categories.create(CategoryInput::new(name)).await
    }

    pub async fn rename_category(
        &self,
        id: &CategoryId,
        name: &str,
    ) -> Result<SkillCategory, EngineError> {
        self.categories.update(id, CategoryInput::new(name)).await
    }

    /// Deletes the category; on success its skills leave local state too,
    /// without any per-skill request.
    pub async fn delete_category(&self, id: &CategoryId) -> Result<Deletion, EngineError> {
        let outcome = self.categories.delete(id).await?;
        if outcome == Deletion::Deleted && self.categories.is_mounted() {
            tracing::debug!(category = %id, "cascading delete to skills");
            self.skills.retain_local(|s| &s.category_id != id);
        }
        Ok(outcome)
    }

    pub async fn reorder_categories(&self, ids: Vec<CategoryId>) -> Result<(), EngineError> {
        self.categories.reorder(&(), ids).await
    }

    pub async fn move_category(
        &self,
        index: usize,
        direction: Direction,
    ) -> Result<bool, EngineError> {
        self.categories.shift(&(), index, direction).await
    }

    /// The category must be known locally.
    pub async fn create_skill(&self, category: &CategoryId, name: &str) -> Result<Skill, EngineError> {
        if self.categories.get(category).is_none() {
            return Err(EngineError::EntityNotFound(format!("Category {category}")));
        }
        self.skills
            .create(SkillDraft::new(category.clone(), name))
            .await
    }

    pub async fn rename_skill(&self, id: &SkillId, name: &str) -> Result<Skill, EngineError> {
        self.skills.update(id, SkillPatch::new(name)).await
    }

    pub async fn delete_skill(&self, id: &SkillId) -> Result<Deletion, EngineError> {
        self.skills.delete(id).await
    }

    /// Reorders one category's skills; other categories are untouched.
    pub async fn reorder_skills(
        &self,
        category: &CategoryId,
        ids: Vec<SkillId>,
    ) -> Result<(), EngineError> {
        self.skills.reorder(category, ids).await
    }

    pub async fn move_skill(
        &self,
        category: &CategoryId,
        index: usize,
        direction: Direction,
    ) -> Result<bool, EngineError> {
        self.skills.shift(category, index, direction).await
    }

    pub fn preview(&self) -> SortedView<CategoryPreview> {
        PreviewProjector::skills(&self.categories.items(), &self.skills.items())
    }

    pub fn unmount(&self) {
        self.categories.unmount();
        self.skills.unmount();
    }
}
