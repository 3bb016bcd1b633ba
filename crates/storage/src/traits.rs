use async_trait::async_trait;

use folio_core::{Document, Flag, MessageId, Resource, models::ContactMessage};

use crate::error::StoreError;

/// Per-resource CRUD plus batch reorder. The backend is the system of record;
/// it assigns ids and initial order on create.
#[async_trait]
pub trait RemoteStore<E: Resource>: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<E>, StoreError>;

    async fn create(&self, draft: &E::Draft) -> Result<E, StoreError>;

    async fn update(&self, id: &E::Id, patch: &E::Patch) -> Result<E, StoreError>;

    async fn delete(&self, id: &E::Id) -> Result<(), StoreError>;

    /// Idempotent full replacement of the order within `scope`.
    async fn reorder_batch(
        &self,
        scope: &E::Scope,
        ordered_ids: &[E::Id],
    ) -> Result<(), StoreError>;

    async fn toggle_flag(&self, id: &E::Id, flag: Flag) -> Result<E, StoreError> {
        let _ = (id, flag);
        Err(StoreError::Unsupported("toggle"))
    }
}

/// A singleton replaced as a whole.
#[async_trait]
pub trait DocumentStore<D: Document>: Send + Sync {
    async fn fetch(&self) -> Result<D, StoreError>;

    async fn replace(&self, patch: &D::Patch) -> Result<D, StoreError>;
}

/// Contact-form inbox.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn messages(&self) -> Result<Vec<ContactMessage>, StoreError>;

    async fn unread_count(&self) -> Result<usize, StoreError>;

    async fn mark_read(&self, id: &MessageId) -> Result<(), StoreError>;

    async fn mark_all_read(&self) -> Result<(), StoreError>;

    async fn delete_message(&self, id: &MessageId) -> Result<(), StoreError>;
}
