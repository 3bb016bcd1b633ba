use std::sync::Arc;

use folio_core::Direction;
use folio_core::models::{Hero, HeroPatch, HeroProfile, HeroStat, MAX_HERO_STATS};
use folio_storage::DocumentStore;

use crate::batch::BatchEditor;
use crate::document::DocumentController;
use crate::error::EngineError;
use crate::notify::Ui;
use crate::preview::{PreviewProjector, SortedView};
use crate::status::Status;

/// Hero profile fields and the headline stats. Stats are capped at
/// [`MAX_HERO_STATS`] and saved as one atomic array replacement.
pub struct HeroEditor {
    document: DocumentController<Hero>,
    stats: BatchEditor<HeroStat>,
}

impl HeroEditor {
    pub fn new(store: Arc<dyn DocumentStore<Hero>>, ui: Ui) -> Self {
        Self {
            document: DocumentController::new(store, ui),
            stats: BatchEditor::new(0, Some(MAX_HERO_STATS)),
        }
    }

    pub async fn load(&mut self) -> Result<(), EngineError> {
        let hero = self.document.load().await?;
        self.stats.reset(hero.stats);
        Ok(())
    }

    pub fn hero(&self) -> Option<Hero> {
        self.document.value()
    }

    pub fn profile(&self) -> Option<HeroProfile> {
        self.document.value().map(|h| h.profile())
    }

    pub fn stats(&self) -> &[HeroStat] {
        self.stats.items()
    }

    pub fn status(&self) -> Status {
        self.document.status()
    }

    pub fn is_saving(&self) -> bool {
        self.document.is_saving()
    }

    pub fn is_dirty(&self) -> bool {
        self.stats.is_dirty()
    }

    pub fn can_add_stat(&self) -> bool {
        !self.stats.is_full()
    }

    /// Appends an empty stat; no-op once the cap is reached.
    pub fn add_stat(&mut self) -> bool {
        self.stats.add(HeroStat::default())
    }

    pub fn set_stat(&mut self, index: usize, value: &str, label: &str) -> bool {
        self.stats.edit(index, |s| {
            s.value = value.to_string();
            s.label = label.to_string();
        })
    }

    pub fn remove_stat(&mut self, index: usize) -> bool {
        self.stats.remove(index)
    }

    pub fn move_stat(&mut self, index: usize, direction: Direction) -> bool {
        self.stats.move_item(index, direction)
    }

    /// Every stat needs a value and a label before the array is sent.
    pub async fn save_stats(&mut self) -> Result<Hero, EngineError> {
        let patch = HeroPatch::stats(self.stats.items().to_vec());
        let hero = self.document.save(patch).await?;
        self.stats.reset(hero.stats.clone());
        Ok(hero)
    }

    /// Saves the profile fields; local stat edits are left as they are.
    pub async fn save_profile(&mut self, profile: HeroProfile) -> Result<Hero, EngineError> {
        self.document.save(HeroPatch::profile(profile)).await
    }

    pub fn preview_stats(&self) -> SortedView<HeroStat> {
        PreviewProjector::stats(self.stats.items())
    }

    pub fn unmount(&self) {
        self.document.unmount();
    }
}
