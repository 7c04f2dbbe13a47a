//! Row identity and node storage types.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique row IDs.
static ROW_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// A stable identity for one row of the grid.
///
/// IDs are allocated from a process-wide counter and are never reused within
/// a model, so an ID held across a structural change either still names the
/// same row or names nothing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    pub(crate) fn next() -> Self {
        Self(ROW_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Debug for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowId({})", self.0)
    }
}

/// What kind of row a node is.
///
/// Footer rows summarize a group and carry the ID of the group row they
/// belong to; they are never independently selectable (toggling one is
/// redirected to its group).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RowKind {
    /// An ordinary data row.
    Leaf,
    /// A group row with child rows.
    Group,
    /// A total/summary row for the given group.
    Footer(RowId),
}

impl RowKind {
    /// Returns `true` for group rows.
    pub fn is_group(&self) -> bool {
        matches!(self, RowKind::Group)
    }

    /// Returns `true` for footer rows.
    pub fn is_footer(&self) -> bool {
        matches!(self, RowKind::Footer(_))
    }
}

/// A node in the row tree.
pub(crate) struct RowNode<T> {
    pub(crate) id: RowId,
    pub(crate) data: T,
    pub(crate) kind: RowKind,
    pub(crate) parent: Option<RowId>,
    pub(crate) children: Vec<RowId>,
}

impl<T> RowNode<T> {
    pub(crate) fn new(data: T, kind: RowKind, parent: Option<RowId>) -> Self {
        Self {
            id: RowId::next(),
            data,
            kind,
            parent,
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_ids_unique() {
        let a = RowId::next();
        let b = RowId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_kind_predicates() {
        let group = RowId::next();
        assert!(RowKind::Group.is_group());
        assert!(!RowKind::Leaf.is_group());
        assert!(RowKind::Footer(group).is_footer());
        assert!(!RowKind::Group.is_footer());
    }
}
