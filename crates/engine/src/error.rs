use folio_core::{CoreError, ValidationErrors};
use folio_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Field-level rejection; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("failed to load {resource}: {source}")]
    Fetch {
        resource: &'static str,
        source: StoreError,
    },

    #[error("failed to {action}: {source}")]
    Mutation { action: String, source: StoreError },

    /// The optimistic order was applied and has since been reconciled.
    #[error("failed to reorder {resource}: {source}")]
    ReorderFailed {
        resource: &'static str,
        source: StoreError,
    },

    #[error("invalid order: {0}")]
    InvalidOrder(#[from] CoreError),

    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("controller is unmounted")]
    Unmounted,
}

impl EngineError {
    /// The store failure behind this error, if any.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Fetch { source, .. }
            | Self::Mutation { source, .. }
            | Self::ReorderFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
