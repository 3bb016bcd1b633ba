/// What to do when the confirming call of an optimistic reorder fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconciliationPolicy {
    /// Reload the whole collection from the store and replace local state.
    #[default]
    Refetch,
    /// Put back the order held before the failed reorder. Falls back to
    /// [`Refetch`](Self::Refetch) when local state has moved on since then.
    Revert,
}
