use std::sync::Arc;

use folio_core::models::{Experience, ExperienceForm};
use folio_core::{Direction, ExperienceId, Flag};
use folio_storage::RemoteStore;

use crate::controller::{CollectionController, Deletion};
use crate::error::EngineError;
use crate::notify::Ui;
use crate::preview::{PreviewProjector, SortedView};
use crate::reconcile::ReconciliationPolicy;

/// Experience entries. Forms go through [`ExperienceForm::submit`], which
/// drops the end date of a current job before anything is sent.
#[derive(Clone)]
pub struct ExperienceBinding {
    controller: CollectionController<Experience>,
}

impl ExperienceBinding {
    pub fn new(store: Arc<dyn RemoteStore<Experience>>, ui: Ui) -> Self {
        Self {
            controller: CollectionController::new(store, ui),
        }
    }

    pub fn with_policy(self, policy: ReconciliationPolicy) -> Self {
        Self {
            controller: self.controller.with_policy(policy),
        }
    }

    pub fn controller(&self) -> &CollectionController<Experience> {
        &self.controller
    }

    pub fn entries(&self) -> Vec<Experience> {
        self.controller.items()
    }

    pub async fn load(&self) -> Result<(), EngineError> {
        self.controller.load().await
    }

    pub async fn create(&self, form: &ExperienceForm) -> Result<Experience, EngineError> {
        let draft = form.submit()?;
        self.controller.create(draft).await
    }

    pub async fn update(
        &self,
        id: &ExperienceId,
        form: &ExperienceForm,
    ) -> Result<Experience, EngineError> {
        let draft = form.submit()?;
        self.controller.update(id, draft).await
    }

    pub async fn delete(&self, id: &ExperienceId) -> Result<Deletion, EngineError> {
        self.controller.delete(id).await
    }

    pub async fn toggle_visibility(&self, id: &ExperienceId) -> Result<Experience, EngineError> {
        self.controller.toggle(id, Flag::Visible).await
    }

    pub async fn move_entry(&self, index: usize, direction: Direction) -> Result<bool, EngineError> {
        self.controller.shift(&(), index, direction).await
    }

    pub async fn reorder(&self, ids: Vec<ExperienceId>) -> Result<(), EngineError> {
        self.controller.reorder(&(), ids).await
    }

    /// Visible entries in order.
    pub fn preview(&self) -> SortedView<Experience> {
        PreviewProjector::experience(&self.controller.items())
    }
}
