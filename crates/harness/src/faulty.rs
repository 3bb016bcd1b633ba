use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use folio_core::models::ContactMessage;
use folio_core::{Document, Flag, MessageId, Resource};
use folio_storage::{DocumentStore, MessageStore, RemoteStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    FetchAll,
    Create,
    Update,
    Delete,
    Reorder,
    Toggle,
    Fetch,
    Replace,
    Messages,
}

/// Releases reorder requests held by [`FaultyStore::hold_reorders`].
#[derive(Clone)]
pub struct ReorderGate {
    permits: Arc<Semaphore>,
}

impl ReorderGate {
    /// Lets `n` held (or future) reorder requests through.
    pub fn release(&self, n: usize) {
        self.permits.add_permits(n);
    }
}

/// Wraps a store, counting calls per operation and injecting failures.
pub struct FaultyStore<S> {
    inner: S,
    calls: Mutex<HashMap<Op, usize>>,
    failures: Mutex<HashMap<Op, usize>>,
    gate: Mutex<Option<ReorderGate>>,
}

impl<S> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
            gate: Mutex::new(None),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn calls(&self, op: Op) -> usize {
        self.calls.lock().get(&op).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }

    /// The next `times` calls of `op` fail with a network error.
    pub fn fail_next(&self, op: Op, times: usize) {
        *self.failures.lock().entry(op).or_insert(0) += times;
    }

    /// From now on, reorder requests wait until the returned gate releases them.
    pub fn hold_reorders(&self) -> ReorderGate {
        let gate = ReorderGate {
            permits: Arc::new(Semaphore::new(0)),
        };
        *self.gate.lock() = Some(gate.clone());
        gate
    }

    /// Counts the call and decides up front whether it fails.
    fn enter(&self, op: Op) -> Result<(), StoreError> {
        *self.calls.lock().entry(op).or_insert(0) += 1;
        let mut failures = self.failures.lock();
        match failures.get_mut(&op) {
            Some(n) if *n > 0 => {
                *n -= 1;
                Err(StoreError::Network(format!("injected {op:?} failure")))
            }
            _ => Ok(()),
        }
    }

    async fn wait_for_gate(&self) -> Result<(), StoreError> {
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.permits
                .acquire()
                .await
                .map_err(|e| StoreError::Network(e.to_string()))?
                .forget();
        }
        Ok(())
    }
}

#[async_trait]
impl<E, S> RemoteStore<E> for FaultyStore<S>
where
    E: Resource,
    S: RemoteStore<E>,
{
    async fn fetch_all(&self) -> Result<Vec<E>, StoreError> {
        self.enter(Op::FetchAll)?;
        self.inner.fetch_all().await
    }

    async fn create(&self, draft: &E::Draft) -> Result<E, StoreError> {
        self.enter(Op::Create)?;
        self.inner.create(draft).await
    }

    async fn update(&self, id: &E::Id, patch: &E::Patch) -> Result<E, StoreError> {
        self.enter(Op::Update)?;
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: &E::Id) -> Result<(), StoreError> {
        self.enter(Op::Delete)?;
        self.inner.delete(id).await
    }

    async fn reorder_batch(
        &self,
        scope: &E::Scope,
        ordered_ids: &[E::Id],
    ) -> Result<(), StoreError> {
        let verdict = self.enter(Op::Reorder);
        self.wait_for_gate().await?;
        verdict?;
        self.inner.reorder_batch(scope, ordered_ids).await
    }

    async fn toggle_flag(&self, id: &E::Id, flag: Flag) -> Result<E, StoreError> {
        self.enter(Op::Toggle)?;
        self.inner.toggle_flag(id, flag).await
    }
}

#[async_trait]
impl<D, S> DocumentStore<D> for FaultyStore<S>
where
    D: Document,
    S: DocumentStore<D>,
{
    async fn fetch(&self) -> Result<D, StoreError> {
        self.enter(Op::Fetch)?;
        self.inner.fetch().await
    }

    async fn replace(&self, patch: &D::Patch) -> Result<D, StoreError> {
        self.enter(Op::Replace)?;
        self.inner.replace(patch).await
    }
}

#[async_trait]
impl<S: MessageStore> MessageStore for FaultyStore<S> {
    async fn messages(&self) -> Result<Vec<ContactMessage>, StoreError> {
        self.enter(Op::Messages)?;
        self.inner.messages().await
    }

    async fn unread_count(&self) -> Result<usize, StoreError> {
        self.inner.unread_count().await
    }

    async fn mark_read(&self, id: &MessageId) -> Result<(), StoreError> {
        self.enter(Op::Update)?;
        self.inner.mark_read(id).await
    }

    async fn mark_all_read(&self) -> Result<(), StoreError> {
        self.enter(Op::Update)?;
        self.inner.mark_all_read().await
    }

    async fn delete_message(&self, id: &MessageId) -> Result<(), StoreError> {
        self.enter(Op::Delete)?;
        self.inner.delete_message(id).await
    }
}
