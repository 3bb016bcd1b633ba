use std::sync::Arc;

use folio_core::models::{Project, ProjectForm};
use folio_core::{Direction, Flag, ProjectId};
use folio_storage::RemoteStore;

use crate::controller::{CollectionController, Deletion};
use crate::error::EngineError;
use crate::notify::Ui;
use crate::preview::{PreviewProjector, ProjectsPreview, SortedView};
use crate::reconcile::ReconciliationPolicy;

/// Projects: per-entity CRUD, visibility and featured toggles, one global
/// ordering scope. The tech stack travels inside the form.
#[derive(Clone)]
pub struct ProjectsBinding {
    controller: CollectionController<Project>,
}

impl ProjectsBinding {
    pub fn new(store: Arc<dyn RemoteStore<Project>>, ui: Ui) -> Self {
        Self {
            controller: CollectionController::new(store, ui),
        }
    }

    pub fn with_policy(self, policy: ReconciliationPolicy) -> Self {
        Self {
            controller: self.controller.with_policy(policy),
        }
    }

    pub fn controller(&self) -> &CollectionController<Project> {
        &self.controller
    }

    pub fn projects(&self) -> Vec<Project> {
        self.controller.items()
    }

    pub async fn load(&self) -> Result<(), EngineError> {
        self.controller.load().await
    }

    pub async fn create(&self, form: ProjectForm) -> Result<Project, EngineError> {
        self.controller.create(form.normalized()).await
    }

    pub async fn update(&self, id: &ProjectId, form: ProjectForm) -> Result<Project, EngineError> {
        self.controller.update(id, form.normalized()).await
    }

    pub async fn delete(&self, id: &ProjectId) -> Result<Deletion, EngineError> {
        self.controller.delete(id).await
    }

    pub async fn toggle_visibility(&self, id: &ProjectId) -> Result<Project, EngineError> {
        self.controller.toggle(id, Flag::Visible).await
    }

    pub async fn toggle_featured(&self, id: &ProjectId) -> Result<Project, EngineError> {
        self.controller.toggle(id, Flag::Featured).await
    }

    pub async fn move_project(&self, index: usize, direction: Direction) -> Result<bool, EngineError> {
        self.controller.shift(&(), index, direction).await
    }

    pub async fn reorder(&self, ids: Vec<ProjectId>) -> Result<(), EngineError> {
        self.controller.reorder(&(), ids).await
    }

    /// Every project, featured first.
    pub fn sorted(&self) -> SortedView<Project> {
        PreviewProjector::project(&self.controller.items())
    }

    pub fn preview(&self) -> ProjectsPreview {
        PreviewProjector::projects(&self.controller.items())
    }
}
