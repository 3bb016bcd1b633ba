use std::sync::Arc;

use parking_lot::Mutex;

use folio_core::{Document, Validate};
use folio_storage::DocumentStore;

use crate::error::EngineError;
use crate::notify::Ui;
use crate::status::{Activity, Status};

struct State<D> {
    value: Option<D>,
    activity: Activity,
    mounted: bool,
}

/// Loads and saves a singleton document. Saves are not optimistic: the
/// local value changes only when the store returns the new document.
pub struct DocumentController<D: Document> {
    state: Arc<Mutex<State<D>>>,
    store: Arc<dyn DocumentStore<D>>,
    ui: Ui,
}

impl<D: Document> Clone for DocumentController<D> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            store: Arc::clone(&self.store),
            ui: self.ui.clone(),
        }
    }
}

impl<D: Document> DocumentController<D> {
    pub fn new(store: Arc<dyn DocumentStore<D>>, ui: Ui) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                value: None,
                activity: Activity::default(),
                mounted: true,
            })),
            store,
            ui,
        }
    }

    pub fn value(&self) -> Option<D> {
        self.state.lock().value.clone()
    }

    pub fn status(&self) -> Status {
        self.state.lock().activity.status()
    }

    pub fn is_saving(&self) -> bool {
        self.state.lock().activity.in_flight() > 0
    }

    pub fn unmount(&self) {
        self.state.lock().mounted = false;
    }

    pub async fn load(&self) -> Result<D, EngineError> {
        {
            let mut state = self.state.lock();
            if !state.mounted {
                return Err(EngineError::Unmounted);
            }
            state.activity.begin_load();
        }
        tracing::debug!(document = D::LABEL, "load");
        let result = self.store.fetch().await;

        let mounted = {
            let mut state = self.state.lock();
            state
                .activity
                .end_load(result.as_ref().err().map(ToString::to_string));
            if state.mounted {
                if let Ok(doc) = &result {
                    state.value = Some(doc.clone());
                }
            }
            state.mounted
        };
        result.map_err(|source| {
            tracing::warn!(document = D::LABEL, error = %source, "load failed");
            if mounted {
                self.ui.error(&format!("Failed to load {}", D::LABEL.to_lowercase()));
            }
            EngineError::Fetch {
                resource: D::LABEL,
                source,
            }
        })
    }

    /// Validates and replaces the whole document.
    pub async fn save(&self, patch: D::Patch) -> Result<D, EngineError> {
        patch.validate()?;
        {
            let mut state = self.state.lock();
            if !state.mounted {
                return Err(EngineError::Unmounted);
            }
            state.activity.begin_save();
        }
        tracing::debug!(document = D::LABEL, "save");
        let result = self.store.replace(&patch).await;

        let mounted = {
            let mut state = self.state.lock();
            state
                .activity
                .end_save(result.as_ref().err().map(ToString::to_string));
            if state.mounted {
                if let Ok(doc) = &result {
                    state.value = Some(doc.clone());
                }
            }
            state.mounted
        };
        match result {
            Ok(doc) => {
                if mounted {
                    self.ui.success(&format!("{} updated!", D::LABEL));
                }
                Ok(doc)
            }
            Err(source) => {
                let action = format!("update {}", D::LABEL.to_lowercase());
                tracing::warn!(document = D::LABEL, error = %source, "save failed");
                if mounted {
                    self.ui.error(&format!("Failed to {action}: {source}"));
                }
                Err(EngineError::Mutation { action, source })
            }
        }
    }
}
