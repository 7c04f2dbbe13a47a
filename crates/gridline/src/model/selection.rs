//! Selection state store.
//!
//! `SelectionState` records which rows are selected (set membership plus
//! selection order) and the derived tri-state of each group row. It is pure
//! bookkeeping: policy checks, cascading and notification live in the engine
//! and cascade modules.

use std::collections::{HashMap, HashSet};

use super::row::RowId;

/// Derived selection state of a group row.
///
/// Leaf rows are never `Indeterminate`; their state is plain membership in
/// the selected set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TriState {
    /// No selectable descendant is selected (or, for independent rows, the
    /// row itself is unselected).
    #[default]
    Unselected,
    /// Some but not all selectable descendants are selected.
    Indeterminate,
    /// All selectable descendants are selected.
    Selected,
}

/// The set of currently selected rows plus group tri-state bookkeeping.
#[derive(Default)]
pub(crate) struct SelectionState {
    members: HashSet<RowId>,
    /// Selection order; parallel to `members`.
    order: Vec<RowId>,
    /// Derived tri-state per group row.
    group_states: HashMap<RowId, TriState>,
}

impl SelectionState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a row. Returns `true` if it was not already selected.
    pub(crate) fn insert(&mut self, id: RowId) -> bool {
        if self.members.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    /// Removes a row. Returns `true` if it was selected.
    pub(crate) fn remove(&mut self, id: RowId) -> bool {
        if self.members.remove(&id) {
            self.order.retain(|&r| r != id);
            true
        } else {
            false
        }
    }

    pub(crate) fn contains(&self, id: RowId) -> bool {
        self.members.contains(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Selected rows in the order they were selected.
    pub(crate) fn ordered(&self) -> Vec<RowId> {
        self.order.clone()
    }

    /// Removes every row. Returns the number of rows that were selected.
    pub(crate) fn clear(&mut self) -> usize {
        let count = self.members.len();
        self.members.clear();
        self.order.clear();
        self.group_states.clear();
        count
    }

    /// Drops rows not satisfying the predicate. Returns how many were
    /// dropped.
    pub(crate) fn retain(&mut self, keep: impl Fn(RowId) -> bool) -> usize {
        let before = self.members.len();
        self.members.retain(|&id| keep(id));
        self.order.retain(|&id| keep(id));
        before - self.members.len()
    }

    pub(crate) fn group_state(&self, id: RowId) -> TriState {
        self.group_states.get(&id).copied().unwrap_or_default()
    }

    pub(crate) fn set_group_state(&mut self, id: RowId, state: TriState) {
        if state == TriState::Unselected {
            self.group_states.remove(&id);
        } else {
            self.group_states.insert(id, state);
        }
    }

    pub(crate) fn clear_group_states(&mut self) {
        self.group_states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove() {
        let mut state = SelectionState::new();
        let a = RowId::next();
        let b = RowId::next();

        assert!(state.insert(a));
        assert!(!state.insert(a));
        assert!(state.insert(b));
        assert_eq!(state.len(), 2);
        assert!(state.contains(a));

        assert!(state.remove(a));
        assert!(!state.remove(a));
        assert_eq!(state.ordered(), vec![b]);
    }

    #[test]
    fn test_order_preserved() {
        let mut state = SelectionState::new();
        let ids: Vec<_> = (0..4).map(|_| RowId::next()).collect();
        for &id in ids.iter().rev() {
            state.insert(id);
        }
        let expected: Vec<_> = ids.iter().rev().copied().collect();
        assert_eq!(state.ordered(), expected);
    }

    #[test]
    fn test_clear_reports_count() {
        let mut state = SelectionState::new();
        state.insert(RowId::next());
        state.insert(RowId::next());
        assert_eq!(state.clear(), 2);
        assert!(state.is_empty());
        assert_eq!(state.clear(), 0);
    }

    #[test]
    fn test_retain() {
        let mut state = SelectionState::new();
        let keep = RowId::next();
        let drop = RowId::next();
        state.insert(keep);
        state.insert(drop);

        assert_eq!(state.retain(|id| id == keep), 1);
        assert_eq!(state.ordered(), vec![keep]);
    }

    #[test]
    fn test_group_states_default_unselected() {
        let mut state = SelectionState::new();
        let group = RowId::next();
        assert_eq!(state.group_state(group), TriState::Unselected);

        state.set_group_state(group, TriState::Indeterminate);
        assert_eq!(state.group_state(group), TriState::Indeterminate);

        state.set_group_state(group, TriState::Unselected);
        assert_eq!(state.group_state(group), TriState::Unselected);
    }
}
