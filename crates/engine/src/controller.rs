use std::sync::Arc;

use parking_lot::Mutex;

use folio_core::{Direction, Flag, Resource, Validate, ordering};
use folio_storage::{RemoteStore, StoreError};

use crate::error::EngineError;
use crate::notify::Ui;
use crate::reconcile::ReconciliationPolicy;
use crate::status::{Activity, Status};

/// Outcome of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Deleted,
    /// The confirmation gate said no; nothing was sent.
    Cancelled,
}

struct State<E> {
    items: Vec<E>,
    activity: Activity,
    mounted: bool,
    /// Bumped on every local state transition.
    revision: u64,
    /// A reconciliation reload waiting for in-flight requests to settle.
    reload_pending: bool,
}

/// Client-side owner of one resource's ordered collection.
///
/// `reorder` is the only optimistic operation: the new order is written to
/// local state before the store is contacted. `create`, `update`, `delete`
/// and `toggle` wait for the store and only then touch local state, so a
/// failure leaves it unchanged.
///
/// The handle is cheap to clone; clones share state. Locks are never held
/// across a store call.
pub struct CollectionController<E: Resource> {
    state: Arc<Mutex<State<E>>>,
    store: Arc<dyn RemoteStore<E>>,
    ui: Ui,
    policy: ReconciliationPolicy,
}

impl<E: Resource> Clone for CollectionController<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            store: Arc::clone(&self.store),
            ui: self.ui.clone(),
            policy: self.policy,
        }
    }
}

impl<E: Resource> CollectionController<E> {
    pub fn new(store: Arc<dyn RemoteStore<E>>, ui: Ui) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                items: Vec::new(),
                activity: Activity::default(),
                mounted: true,
                revision: 0,
                reload_pending: false,
            })),
            store,
            ui,
            policy: ReconciliationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ReconciliationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ReconciliationPolicy {
        self.policy
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Every entity, sorted by `order`. Multi-scope collections interleave.
    pub fn items(&self) -> Vec<E> {
        let mut items = self.state.lock().items.clone();
        ordering::sort_by_order(&mut items);
        items
    }

    /// Members of one scope in display order.
    pub fn scope_items(&self, scope: &E::Scope) -> Vec<E> {
        ordering::in_scope(&self.state.lock().items, scope)
    }

    pub fn ids(&self, scope: &E::Scope) -> Vec<E::Id> {
        ordering::ordered_ids(&self.state.lock().items, scope)
    }

    pub fn get(&self, id: &E::Id) -> Option<E> {
        self.state.lock().items.iter().find(|e| e.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    pub fn status(&self) -> Status {
        self.state.lock().activity.status()
    }

    /// True while any request is in flight; conflicting controls disable on this.
    pub fn is_saving(&self) -> bool {
        self.state.lock().activity.in_flight() > 0
    }

    pub fn is_mounted(&self) -> bool {
        self.state.lock().mounted
    }

    /// Detaches the controller. Results that arrive afterwards are dropped
    /// without touching state or notifying.
    pub fn unmount(&self) {
        tracing::debug!(resource = E::PLURAL, "unmounted");
        self.state.lock().mounted = false;
    }

    // ------------------------------------------------------------------
    // Store-backed operations
    // ------------------------------------------------------------------

    /// Replaces local state with the store's collection. The only operation
    /// that overwrites everything.
    pub async fn load(&self) -> Result<(), EngineError> {
        {
            let mut state = self.state.lock();
            if !state.mounted {
                return Err(EngineError::Unmounted);
            }
            state.activity.begin_load();
        }
        tracing::debug!(resource = E::PLURAL, "load");
        let result = self.store.fetch_all().await;

        let mut state = self.state.lock();
        state
            .activity
            .end_load(result.as_ref().err().map(ToString::to_string));
        if !state.mounted {
            return result.map(|_| ()).map_err(|source| EngineError::Fetch {
                resource: E::PLURAL,
                source,
            });
        }
        match result {
            Ok(mut items) => {
                ordering::sort_by_order(&mut items);
                tracing::debug!(resource = E::PLURAL, count = items.len(), "loaded");
                state.items = items;
                state.revision += 1;
                Ok(())
            }
            Err(source) => {
                drop(state);
                tracing::warn!(resource = E::PLURAL, error = %source, "load failed");
                self.ui.error(&format!("Failed to load {}", E::PLURAL));
                Err(EngineError::Fetch {
                    resource: E::PLURAL,
                    source,
                })
            }
        }
    }

    /// Validates, sends, and appends the entity the store returns. Nothing
    /// appears locally until the store confirms.
    pub async fn create(&self, draft: E::Draft) -> Result<E, EngineError> {
        draft.validate()?;
        self.begin_save()?;
        tracing::debug!(resource = E::PLURAL, "create");
        let result = self.store.create(&draft).await;
        let mounted = self.settle(&result, |items, created: &E| items.push(created.clone()));
        let outcome =
            self.report(result, mounted, action::<E>("create"), |_| format!("{} created!", E::LABEL));
        self.run_deferred_reload().await;
        outcome
    }

    /// Replaces the entity in place with the store's version. The local
    /// `order` is kept so a pending reorder is not undone.
    pub async fn update(&self, id: &E::Id, patch: E::Patch) -> Result<E, EngineError> {
        patch.validate()?;
        self.require(id)?;
        self.begin_save()?;
        tracing::debug!(resource = E::PLURAL, %id, "update");
        let result = self.store.update(id, &patch).await;
        let mounted = self.settle(&result, replace_keeping_order);
        let outcome =
            self.report(result, mounted, action::<E>("update"), |_| format!("{} updated!", E::LABEL));
        self.run_deferred_reload().await;
        outcome
    }

    /// Asks the confirmation gate, then deletes and renumbers the scope.
    pub async fn delete(&self, id: &E::Id) -> Result<Deletion, EngineError> {
        let entity = self.require(id)?;
        let prompt = format!(
            "Are you sure you want to delete this {}?",
            E::LABEL.to_lowercase()
        );
        if !self.ui.confirm(&prompt) {
            tracing::debug!(resource = E::PLURAL, %id, "delete cancelled");
            return Ok(Deletion::Cancelled);
        }
        self.begin_save()?;
        tracing::debug!(resource = E::PLURAL, %id, "delete");
        let result = self.store.delete(id).await;
        let scope = entity.scope();
        let mounted = self.settle(&result, |items, _| {
            items.retain(|e| e.id() != id);
            ordering::renumber(items, &scope);
        });
        let outcome = self
            .report(result, mounted, action::<E>("delete"), |_| format!("{} deleted!", E::LABEL))
            .map(|()| Deletion::Deleted);
        self.run_deferred_reload().await;
        outcome
    }

    /// Flips a boolean flag through its dedicated endpoint.
    pub async fn toggle(&self, id: &E::Id, flag: Flag) -> Result<E, EngineError> {
        self.require(id)?;
        self.begin_save()?;
        tracing::debug!(resource = E::PLURAL, %id, flag = flag.as_str(), "toggle");
        let result = self.store.toggle_flag(id, flag).await;
        let mounted = self.settle(&result, replace_keeping_order);
        let action = format!("{} {}", action::<E>("toggle"), flag.as_str());
        let outcome = self.report(result, mounted, action, |updated: &E| match updated.flag(flag) {
            Some(on) => format!("{} {}", E::LABEL, flag.describe(on)),
            None => format!("{} updated!", E::LABEL),
        });
        self.run_deferred_reload().await;
        outcome
    }

    // ------------------------------------------------------------------
    // Ordering
    // ------------------------------------------------------------------

    /// Swaps the member at `index` of `scope` with its neighbour, locally
    /// only. Returns false at either boundary.
    pub fn move_item(&self, scope: &E::Scope, index: usize, direction: Direction) -> bool {
        let mut state = self.state.lock();
        let moved = ordering::move_within(&mut state.items, scope, index, direction);
        if moved {
            state.revision += 1;
        }
        moved
    }

    /// Moves one step and persists the result. No-op without a store call at
    /// either boundary; returns whether anything moved.
    pub async fn shift(
        &self,
        scope: &E::Scope,
        index: usize,
        direction: Direction,
    ) -> Result<bool, EngineError> {
        let ids = ordering::moved_ids(&self.state.lock().items, scope, index, direction);
        match ids {
            Some(ids) => self.reorder(scope, ids).await.map(|()| true),
            None => Ok(false),
        }
    }

    /// Applies `ordered_ids` to local state immediately, then sends the
    /// batch. On failure the reconciliation policy restores server-consistent
    /// state before the error is reported. A reload is held back while other
    /// requests of this controller are in flight and runs when the last one
    /// settles, so it cannot be overtaken by a later reorder.
    ///
    /// `ordered_ids` must be a permutation of the scope's current members; a
    /// mismatch is rejected before anything changes.
    pub async fn reorder(
        &self,
        scope: &E::Scope,
        ordered_ids: Vec<E::Id>,
    ) -> Result<(), EngineError> {
        let (snapshot, revision) = {
            let mut state = self.state.lock();
            if !state.mounted {
                return Err(EngineError::Unmounted);
            }
            let snapshot = state.items.clone();
            ordering::apply_order(&mut state.items, scope, &ordered_ids)?;
            state.revision += 1;
            state.activity.begin_save();
            (snapshot, state.revision)
        };
        tracing::debug!(resource = E::PLURAL, ?scope, count = ordered_ids.len(), "reorder");

        let result = self.store.reorder_batch(scope, &ordered_ids).await;
        let mounted = self.settle(&result, |_, _| {});
        let Err(source) = result else {
            self.run_deferred_reload().await;
            return Ok(());
        };
        if mounted {
            tracing::warn!(resource = E::PLURAL, error = %source, "reorder failed, reconciling");
            self.reconcile(snapshot, revision).await;
            self.state.lock().activity.fail(source.to_string());
            self.ui.error(&format!("Failed to reorder {}", E::PLURAL));
        }
        Err(EngineError::ReorderFailed {
            resource: E::PLURAL,
            source,
        })
    }

    async fn reconcile(&self, snapshot: Vec<E>, revision: u64) {
        if self.policy == ReconciliationPolicy::Revert {
            let mut state = self.state.lock();
            if state.revision == revision {
                state.items = snapshot;
                state.revision += 1;
                return;
            }
            tracing::debug!(resource = E::PLURAL, "state moved on, reverting by reload");
        }
        {
            let mut state = self.state.lock();
            if state.activity.in_flight() > 0 {
                tracing::debug!(resource = E::PLURAL, "reload deferred until requests settle");
                state.reload_pending = true;
                return;
            }
            state.reload_pending = false;
        }
        self.reload_for_reconciliation().await;
    }

    /// Runs a deferred reconciliation reload once nothing is in flight.
    async fn run_deferred_reload(&self) {
        let due = {
            let mut state = self.state.lock();
            let due = state.mounted && state.reload_pending && state.activity.in_flight() == 0;
            if due {
                state.reload_pending = false;
            }
            due
        };
        if due {
            self.reload_for_reconciliation().await;
        }
    }

    async fn reload_for_reconciliation(&self) {
        if let Err(e) = self.load().await {
            tracing::warn!(resource = E::PLURAL, error = %e, "reconciliation reload failed");
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Local-only removal, for cascades mirrored from another collection.
    pub(crate) fn retain_local(&self, keep: impl Fn(&E) -> bool) {
        let mut state = self.state.lock();
        let before = state.items.len();
        state.items.retain(|e| keep(e));
        if state.items.len() != before {
            state.revision += 1;
        }
    }

    fn require(&self, id: &E::Id) -> Result<E, EngineError> {
        self.get(id)
            .ok_or_else(|| EngineError::EntityNotFound(format!("{} {id}", E::LABEL)))
    }

    fn begin_save(&self) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        if !state.mounted {
            return Err(EngineError::Unmounted);
        }
        state.activity.begin_save();
        Ok(())
    }

    /// Ends a save and, while mounted, applies a successful result. Returns
    /// whether the controller was still mounted.
    fn settle<T>(
        &self,
        result: &Result<T, StoreError>,
        apply: impl FnOnce(&mut Vec<E>, &T),
    ) -> bool {
        let mut state = self.state.lock();
        state
            .activity
            .end_save(result.as_ref().err().map(ToString::to_string));
        if !state.mounted {
            tracing::debug!(resource = E::PLURAL, "result dropped after unmount");
            return false;
        }
        if let Ok(value) = result {
            apply(&mut state.items, value);
            state.revision += 1;
        }
        true
    }

    /// Notifies and classifies the result of a non-optimistic mutation.
    fn report<T>(
        &self,
        result: Result<T, StoreError>,
        mounted: bool,
        action: String,
        success: impl FnOnce(&T) -> String,
    ) -> Result<T, EngineError> {
        match result {
            Ok(value) => {
                if mounted {
                    self.ui.success(&success(&value));
                }
                Ok(value)
            }
            Err(source) => {
                tracing::warn!(resource = E::PLURAL, %action, error = %source, "mutation failed");
                if mounted {
                    self.ui.error(&format!("Failed to {action}: {source}"));
                }
                Err(EngineError::Mutation { action, source })
            }
        }
    }
}

/// "create project", "delete skill", ...
fn action<E: Resource>(verb: &str) -> String {
    format!("{verb} {}", E::LABEL.to_lowercase())
}

fn replace_keeping_order<E: Resource>(items: &mut Vec<E>, updated: &E) {
    if let Some(slot) = items.iter_mut().find(|e| e.id() == updated.id()) {
        let order = slot.order();
        *slot = updated.clone();
        slot.set_order(order);
    }
}
