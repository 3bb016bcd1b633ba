//! Dense-order bookkeeping shared by every ordered collection.
//!
//! A collection is a flat `Vec` that may hold several scopes (skills of many
//! categories). Functions here only ever touch the members of the scope they
//! are given; the vector slots occupied by other scopes are left alone.

use std::collections::{HashMap, HashSet};

use crate::entity::OrderedEntity;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Slot indices of `scope`'s members, sorted by their `order` (stable on ties).
fn ranked_slots<E: OrderedEntity>(items: &[E], scope: &E::Scope) -> Vec<usize> {
    let mut slots: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, e)| &e.scope() == scope)
        .map(|(i, _)| i)
        .collect();
    slots.sort_by_key(|&i| items[i].order());
    slots
}

/// Ids of `scope`'s members in display order.
pub fn ordered_ids<E: OrderedEntity>(items: &[E], scope: &E::Scope) -> Vec<E::Id> {
    ranked_slots(items, scope)
        .into_iter()
        .map(|i| items[i].id().clone())
        .collect()
}

/// Members of `scope` in display order.
pub fn in_scope<E: OrderedEntity>(items: &[E], scope: &E::Scope) -> Vec<E> {
    ranked_slots(items, scope)
        .into_iter()
        .map(|i| items[i].clone())
        .collect()
}

/// True when the members of `scope` carry exactly the orders `0..n`.
pub fn is_dense<E: OrderedEntity>(items: &[E], scope: &E::Scope) -> bool {
    let mut orders: Vec<u32> = items
        .iter()
        .filter(|e| &e.scope() == scope)
        .map(|e| e.order())
        .collect();
    orders.sort_unstable();
    orders.iter().enumerate().all(|(i, &o)| o as usize == i)
}

/// Every scope present in `items`, in first-seen order.
pub fn scopes<E: OrderedEntity>(items: &[E]) -> Vec<E::Scope> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for e in items {
        let s = e.scope();
        if seen.insert(s.clone()) {
            out.push(s);
        }
    }
    out
}

/// Rewrites `scope` so that member `k` of `ids` gets `order = k`.
///
/// `ids` must be a permutation of the scope's current ids; anything else is
/// rejected before any entity is touched.
pub fn apply_order<E: OrderedEntity>(
    items: &mut [E],
    scope: &E::Scope,
    ids: &[E::Id],
) -> Result<(), CoreError> {
    let mut slots: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, e)| &e.scope() == scope)
        .map(|(i, _)| i)
        .collect();
    if ids.len() != slots.len() {
        return Err(CoreError::InvalidOrder(format!(
            "expected {} ids for scope {scope:?}, got {}",
            slots.len(),
            ids.len()
        )));
    }

    let mut by_id: HashMap<E::Id, E> = slots
        .iter()
        .map(|&i| (items[i].id().clone(), items[i].clone()))
        .collect();
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !by_id.contains_key(id) {
            return Err(CoreError::InvalidOrder(format!(
                "{id} is not a member of scope {scope:?}"
            )));
        }
        if !seen.insert(id) {
            return Err(CoreError::InvalidOrder(format!("{id} listed twice")));
        }
    }

    slots.sort_unstable();
    for (k, id) in ids.iter().enumerate() {
        if let Some(mut entity) = by_id.remove(id) {
            entity.set_order(k as u32);
            items[slots[k]] = entity;
        }
    }
    Ok(())
}

/// Restores the dense invariant for `scope` after an insert or removal,
/// keeping the current relative order.
pub fn renumber<E: OrderedEntity>(items: &mut [E], scope: &E::Scope) {
    let ids = ordered_ids(items, scope);
    // ids is a permutation of the scope by construction
    let _ = apply_order(items, scope, &ids);
}

/// The id sequence that results from swapping the member at `index` with its
/// neighbour, or `None` when the move would cross either boundary.
pub fn moved_ids<E: OrderedEntity>(
    items: &[E],
    scope: &E::Scope,
    index: usize,
    direction: Direction,
) -> Option<Vec<E::Id>> {
    let mut ids = ordered_ids(items, scope);
    let neighbour = match direction {
        Direction::Up => index.checked_sub(1)?,
        Direction::Down => index.checked_add(1)?,
    };
    if index >= ids.len() || neighbour >= ids.len() {
        return None;
    }
    ids.swap(index, neighbour);
    Some(ids)
}

/// Swaps the member at `index` with its neighbour in place. Returns false and
/// leaves `items` untouched at either boundary.
pub fn move_within<E: OrderedEntity>(
    items: &mut [E],
    scope: &E::Scope,
    index: usize,
    direction: Direction,
) -> bool {
    match moved_ids(items, scope, index, direction) {
        Some(ids) => apply_order(items, scope, &ids).is_ok(),
        None => false,
    }
}

/// Stable sort by `order`; used to present a settled collection.
pub fn sort_by_order<E: OrderedEntity>(items: &mut [E]) {
    items.sort_by_key(|e| e.order());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        group: u8,
        order: u32,
    }

    impl OrderedEntity for Row {
        type Id = String;
        type Scope = u8;

        fn id(&self) -> &String {
            &self.id
        }
        fn order(&self) -> u32 {
            self.order
        }
        fn set_order(&mut self, order: u32) {
            self.order = order;
        }
        fn scope(&self) -> u8 {
            self.group
        }
    }

    fn row(id: &str, group: u8, order: u32) -> Row {
        Row {
            id: id.to_string(),
            group,
            order,
        }
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn apply_order_rewrites_orders_to_positions() {
        let mut items = vec![row("a", 0, 0), row("b", 0, 1), row("c", 0, 2)];
        apply_order(&mut items, &0, &ids(&["c", "a", "b"])).unwrap();
        assert_eq!(ordered_ids(&items, &0), ids(&["c", "a", "b"]));
        assert_eq!(
            items.iter().map(|r| (r.id.as_str(), r.order)).collect::<Vec<_>>(),
            vec![("c", 0), ("a", 1), ("b", 2)]
        );
        assert!(is_dense(&items, &0));
    }

    #[test]
    fn apply_order_leaves_other_scopes_alone() {
        let mut items = vec![
            row("x", 1, 0),
            row("a", 0, 0),
            row("y", 1, 1),
            row("b", 0, 1),
        ];
        apply_order(&mut items, &0, &ids(&["b", "a"])).unwrap();
        assert_eq!(items[0], row("x", 1, 0));
        assert_eq!(items[2], row("y", 1, 1));
        assert_eq!(ordered_ids(&items, &0), ids(&["b", "a"]));
    }

    #[test]
    fn apply_order_rejects_non_permutations_without_touching_state() {
        let original = vec![row("a", 0, 0), row("b", 0, 1)];
        let mut items = original.clone();
        assert!(apply_order(&mut items, &0, &ids(&["a"])).is_err());
        assert!(apply_order(&mut items, &0, &ids(&["a", "a"])).is_err());
        assert!(apply_order(&mut items, &0, &ids(&["a", "z"])).is_err());
        assert_eq!(items, original);
    }

    #[test]
    fn identical_order_is_idempotent() {
        let original = vec![row("a", 0, 0), row("b", 0, 1), row("c", 0, 2)];
        let mut items = original.clone();
        let current = ordered_ids(&items, &0);
        apply_order(&mut items, &0, &current).unwrap();
        assert_eq!(items, original);
    }

    #[test]
    fn move_is_a_noop_at_boundaries() {
        let original = vec![row("a", 0, 0), row("b", 0, 1), row("c", 0, 2)];
        let mut items = original.clone();
        assert!(!move_within(&mut items, &0, 0, Direction::Up));
        assert!(!move_within(&mut items, &0, 2, Direction::Down));
        assert!(!move_within(&mut items, &0, 7, Direction::Up));
        assert_eq!(items, original);
    }

    #[test]
    fn move_swaps_neighbours_and_stays_dense() {
        let mut items = vec![row("a", 0, 0), row("b", 0, 1), row("c", 0, 2)];
        assert!(move_within(&mut items, &0, 2, Direction::Up));
        assert_eq!(ordered_ids(&items, &0), ids(&["a", "c", "b"]));
        assert!(move_within(&mut items, &0, 0, Direction::Down));
        assert_eq!(ordered_ids(&items, &0), ids(&["c", "a", "b"]));
        assert!(is_dense(&items, &0));
    }

    #[test]
    fn renumber_closes_gaps() {
        let mut items = vec![row("a", 0, 0), row("c", 0, 5), row("b", 0, 2)];
        assert!(!is_dense(&items, &0));
        renumber(&mut items, &0);
        assert!(is_dense(&items, &0));
        assert_eq!(ordered_ids(&items, &0), ids(&["a", "b", "c"]));
    }

    #[test]
    fn empty_scope_is_dense() {
        let items: Vec<Row> = Vec::new();
        assert!(is_dense(&items, &3));
        assert_eq!(moved_ids(&items, &3, 0, Direction::Down), None);
    }

    #[test]
    fn scopes_are_listed_once_in_first_seen_order() {
        let items = vec![row("a", 2, 0), row("b", 1, 0), row("c", 2, 1)];
        assert_eq!(scopes(&items), vec![2, 1]);
    }
}
