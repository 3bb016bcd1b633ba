use std::sync::Arc;

use folio_core::models::{About, AboutParagraph, AboutPatch, HeroStat, MIN_PARAGRAPHS};
use folio_core::{Direction, ParagraphId, ordering};
use folio_storage::DocumentStore;

use crate::batch::BatchEditor;
use crate::document::DocumentController;
use crate::error::EngineError;
use crate::notify::Ui;
use crate::preview::{AboutPreview, PreviewProjector};
use crate::status::Status;

/// About paragraphs: edited locally, saved as one `PUT /about` of the
/// whole ordered array. At least one paragraph always remains.
pub struct AboutEditor {
    document: DocumentController<About>,
    paragraphs: BatchEditor<AboutParagraph>,
}

impl AboutEditor {
    pub fn new(store: Arc<dyn DocumentStore<About>>, ui: Ui) -> Self {
        Self {
            document: DocumentController::new(store, ui),
            paragraphs: BatchEditor::new(MIN_PARAGRAPHS, None),
        }
    }

    pub async fn load(&mut self) -> Result<(), EngineError> {
        let about = self.document.load().await?;
        self.reset(about);
        Ok(())
    }

    pub fn paragraphs(&self) -> &[AboutParagraph] {
        self.paragraphs.items()
    }

    pub fn is_dirty(&self) -> bool {
        self.paragraphs.is_dirty()
    }

    pub fn status(&self) -> Status {
        self.document.status()
    }

    pub fn is_saving(&self) -> bool {
        self.document.is_saving()
    }

    /// Appends an empty paragraph and returns its id.
    pub fn add_paragraph(&mut self) -> ParagraphId {
        let paragraph = AboutParagraph::blank(self.paragraphs.len() as u32);
        let id = paragraph.id.clone();
        self.paragraphs.add(paragraph);
        id
    }

    pub fn set_text(&mut self, index: usize, text: &str) -> bool {
        self.paragraphs.edit(index, |p| p.text = text.to_string())
    }

    /// Rejected locally, without a store call, when it is the last paragraph.
    pub fn remove_paragraph(&mut self, index: usize) -> bool {
        let removed = self.paragraphs.remove(index);
        if !removed {
            tracing::debug!(index, count = self.paragraphs.len(), "paragraph removal rejected");
        }
        removed
    }

    pub fn move_paragraph(&mut self, index: usize, direction: Direction) -> bool {
        self.paragraphs.move_item(index, direction)
    }

    pub async fn save(&mut self) -> Result<About, EngineError> {
        let patch = AboutPatch {
            content: self.paragraphs.items().to_vec(),
        };
        let about = self.document.save(patch).await?;
        self.reset(about.clone());
        Ok(about)
    }

    /// Live preview, merged with the hero's stats.
    pub fn preview(&self, stats: &[HeroStat]) -> AboutPreview {
        PreviewProjector::about(self.paragraphs.items(), stats)
    }

    pub fn unmount(&self) {
        self.document.unmount();
    }

    fn reset(&mut self, about: About) {
        let mut content = about.content;
        ordering::sort_by_order(&mut content);
        self.paragraphs.reset(content);
    }
}
