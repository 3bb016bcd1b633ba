pub mod batch;
pub mod bindings;
pub mod controller;
pub mod document;
pub mod error;
pub mod notify;
pub mod preview;
pub mod reconcile;
pub mod status;

pub use batch::{BatchEditor, Slot};
pub use bindings::*;
pub use controller::{CollectionController, Deletion};
pub use document::DocumentController;
pub use error::EngineError;
pub use notify::{ConfirmGate, MemoryNotifier, Notice, Notifier, TracingNotifier, Ui};
pub use preview::{
    AboutPreview, CategoryPreview, PROJECT_PREVIEW_LIMIT, PreviewProjector, Previewable,
    Previewed, ProjectsPreview, SortedView,
};
pub use reconcile::ReconciliationPolicy;
pub use status::Status;
