//! Row registry: the row-model seam the selection engine consumes, and a
//! concrete client-side implementation.
//!
//! `RowModel` is deliberately narrow: ordered access to the currently
//! displayed rows, lookup by id, structural queries (kind, parent, children,
//! filter visibility, page bounds) and structural-change signals. The engine
//! never mutates row data through it.
//!
//! `GridRowModel` stores rows in a tree (groups own their children, footers
//! sit under the group they summarize) and maintains a flattened
//! display-order cache that is rebuilt on every structural change.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use gridline_core::Signal;
use gridline_core::logging::targets;

use super::row::{RowId, RowKind, RowNode};

/// Type alias for a row filter predicate over the host payload.
pub type RowFilterFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

// =============================================================================
// Signals
// =============================================================================

/// Collection of signals emitted by row models.
///
/// All signals are payload-free: listeners re-query the model rather than
/// consuming diffs.
pub struct RowModelSignals {
    /// Emitted after rows have been added.
    pub rows_inserted: Signal<()>,

    /// Emitted after rows have been removed.
    pub rows_removed: Signal<()>,

    /// Emitted after the filter predicate changed (set or cleared).
    pub filter_changed: Signal<()>,

    /// Emitted after the grouping structure changed (groups created,
    /// flattened, or rows reparented).
    pub grouping_changed: Signal<()>,

    /// Emitted after the model has been reset (all rows replaced or cleared).
    pub model_reset: Signal<()>,
}

impl Default for RowModelSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl RowModelSignals {
    /// Creates a new set of row model signals.
    pub fn new() -> Self {
        Self {
            rows_inserted: Signal::new(),
            rows_removed: Signal::new(),
            filter_changed: Signal::new(),
            grouping_changed: Signal::new(),
            model_reset: Signal::new(),
        }
    }
}

// =============================================================================
// RowModel trait
// =============================================================================

/// The interface the selection engine consumes.
///
/// Implementations must keep display indices stable between structural
/// signals: two calls to [`displayed_row`](Self::displayed_row) with no
/// intervening signal see the same ordering.
pub trait RowModel: Send + Sync {
    /// Number of currently displayed rows (after filtering).
    fn displayed_count(&self) -> usize;

    /// The row at the given display index, if in bounds.
    fn displayed_row(&self, index: usize) -> Option<RowId>;

    /// The display index of a row, or `None` if the row is filtered out or
    /// does not exist.
    fn display_index(&self, id: RowId) -> Option<usize>;

    /// Whether the row exists in the model at all (displayed or not).
    fn contains(&self, id: RowId) -> bool;

    /// The kind of the row, or `None` if it does not exist.
    fn kind(&self, id: RowId) -> Option<RowKind>;

    /// The parent group of a row, if any.
    fn parent_of(&self, id: RowId) -> Option<RowId>;

    /// Direct children of a group row, in display order.
    fn children_of(&self, id: RowId) -> Vec<RowId>;

    /// Whether the row passes the currently active filter. Rows pass
    /// trivially when no filter is set.
    fn passes_filter(&self, id: RowId) -> bool;

    /// Every row in the model in tree order, including filtered-out rows.
    fn all_rows(&self) -> Vec<RowId>;

    /// Inclusive display-index range of the current page, or `None` when
    /// pagination is off or the page is empty.
    fn page_bounds(&self) -> Option<(usize, usize)>;

    /// Structural-change signals for this model.
    fn signals(&self) -> &RowModelSignals;
}

// =============================================================================
// Storage
// =============================================================================

/// Internal storage for the client-side row tree.
struct RowStorage<T> {
    nodes: HashMap<RowId, RowNode<T>>,
    root_children: Vec<RowId>,
    /// Flattened display order, rebuilt on structural change.
    displayed: Vec<RowId>,
    /// Reverse lookup into `displayed`.
    display_index: HashMap<RowId, usize>,
    filter: Option<RowFilterFn<T>>,
    page_size: Option<usize>,
    current_page: usize,
}

impl<T> RowStorage<T> {
    fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            root_children: Vec::new(),
            displayed: Vec::new(),
            display_index: HashMap::new(),
            filter: None,
            page_size: None,
            current_page: 0,
        }
    }

    fn add_root(&mut self, data: T, kind: RowKind) -> RowId {
        let node = RowNode::new(data, kind, None);
        let id = node.id;
        self.nodes.insert(id, node);
        self.root_children.push(id);
        id
    }

    fn add_child(&mut self, parent: RowId, data: T, kind: RowKind) -> Option<RowId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let node = RowNode::new(data, kind, Some(parent));
        let id = node.id;
        self.nodes.insert(id, node);
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        Some(id)
    }

    fn remove_subtree(&mut self, id: RowId) -> Option<T> {
        let node = self.nodes.remove(&id)?;
        for child_id in &node.children {
            self.remove_subtree(*child_id);
        }
        Some(node.data)
    }

    fn remove_node(&mut self, id: RowId) -> Option<T> {
        match self.nodes.get(&id).and_then(|n| n.parent) {
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(&parent_id) {
                    parent.children.retain(|&c| c != id);
                }
            }
            None => self.root_children.retain(|&c| c != id),
        }
        self.remove_subtree(id)
    }

    /// Whether a node is visible under the current filter. Groups are
    /// visible when any descendant leaf is; footers follow their group.
    fn node_passes(&self, id: RowId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        match node.kind {
            RowKind::Leaf => match &self.filter {
                Some(filter) => filter(&node.data),
                None => true,
            },
            RowKind::Group => node.children.iter().any(|&c| {
                !matches!(self.nodes.get(&c).map(|n| n.kind), Some(RowKind::Footer(_)))
                    && self.node_passes(c)
            }),
            RowKind::Footer(group) => self.node_passes(group),
        }
    }

    fn rebuild_displayed(&mut self) {
        let mut order = Vec::new();
        let roots = self.root_children.clone();
        for id in roots {
            self.flatten_into(id, &mut order);
        }
        self.display_index = order
            .iter()
            .enumerate()
            .map(|(index, &id)| (id, index))
            .collect();
        self.displayed = order;
    }

    fn flatten_into(&self, id: RowId, out: &mut Vec<RowId>) {
        if !self.node_passes(id) {
            return;
        }
        out.push(id);
        if let Some(node) = self.nodes.get(&id) {
            for &child in &node.children {
                self.flatten_into(child, out);
            }
        }
    }

    fn tree_order_into(&self, id: RowId, out: &mut Vec<RowId>) {
        out.push(id);
        if let Some(node) = self.nodes.get(&id) {
            for &child in &node.children {
                self.tree_order_into(child, out);
            }
        }
    }
}

// =============================================================================
// GridRowModel
// =============================================================================

/// A client-side row model backed by an in-memory tree.
///
/// Rows carry a host payload `T` used by filter predicates and available
/// through [`with_row`](Self::with_row). Structural mutations rebuild the
/// display-order cache and emit the matching signal after the storage lock
/// is released, so slots may re-enter query methods.
///
/// # Example
///
/// ```
/// use gridline::model::GridRowModel;
///
/// let model = GridRowModel::new();
/// let us = model.add_group("United States");
/// model.add_leaf_under(us, "Michael Phelps");
/// model.add_leaf_under(us, "Katie Ledecky");
/// let uk = model.add_group("United Kingdom");
/// model.add_leaf_under(uk, "Tom Daley");
/// ```
pub struct GridRowModel<T> {
    storage: RwLock<RowStorage<T>>,
    signals: RowModelSignals,
}

impl<T: Send + Sync + 'static> Default for GridRowModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> GridRowModel<T> {
    /// Creates a new empty model.
    pub fn new() -> Self {
        Self {
            storage: RwLock::new(RowStorage::new()),
            signals: RowModelSignals::new(),
        }
    }

    /// Adds a leaf row at the root level.
    pub fn add_leaf(&self, data: T) -> RowId {
        let id = {
            let mut storage = self.storage.write();
            let id = storage.add_root(data, RowKind::Leaf);
            storage.rebuild_displayed();
            id
        };
        tracing::trace!(target: targets::MODEL, ?id, "leaf added");
        self.signals.rows_inserted.emit(());
        id
    }

    /// Adds a group row at the root level.
    pub fn add_group(&self, data: T) -> RowId {
        let id = {
            let mut storage = self.storage.write();
            let id = storage.add_root(data, RowKind::Group);
            storage.rebuild_displayed();
            id
        };
        tracing::trace!(target: targets::MODEL, ?id, "group added");
        self.signals.rows_inserted.emit(());
        id
    }

    /// Adds a leaf row under the given group. Returns `None` if the parent
    /// does not exist.
    pub fn add_leaf_under(&self, parent: RowId, data: T) -> Option<RowId> {
        self.add_child_row(parent, data, RowKind::Leaf)
    }

    /// Adds a nested group under the given group. Returns `None` if the
    /// parent does not exist.
    pub fn add_group_under(&self, parent: RowId, data: T) -> Option<RowId> {
        self.add_child_row(parent, data, RowKind::Group)
    }

    /// Adds a footer row summarizing `group`, placed under it after its
    /// other children. Returns `None` if the group does not exist.
    pub fn add_footer(&self, group: RowId, data: T) -> Option<RowId> {
        self.add_child_row(group, data, RowKind::Footer(group))
    }

    fn add_child_row(&self, parent: RowId, data: T, kind: RowKind) -> Option<RowId> {
        let id = {
            let mut storage = self.storage.write();
            let id = storage.add_child(parent, data, kind)?;
            storage.rebuild_displayed();
            id
        };
        tracing::trace!(target: targets::MODEL, ?id, ?kind, "row added");
        self.signals.rows_inserted.emit(());
        Some(id)
    }

    /// Removes a row and its entire subtree. Returns the removed payload.
    pub fn remove_row(&self, id: RowId) -> Option<T> {
        let data = {
            let mut storage = self.storage.write();
            let data = storage.remove_node(id)?;
            storage.rebuild_displayed();
            data
        };
        tracing::trace!(target: targets::MODEL, ?id, "row removed");
        self.signals.rows_removed.emit(());
        Some(data)
    }

    /// Removes every row.
    pub fn clear(&self) {
        {
            let mut storage = self.storage.write();
            storage.nodes.clear();
            storage.root_children.clear();
            storage.rebuild_displayed();
        }
        tracing::trace!(target: targets::MODEL, "model cleared");
        self.signals.model_reset.emit(());
    }

    /// Sets the filter predicate and rebuilds the display order.
    pub fn set_filter<F>(&self, filter: F)
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        {
            let mut storage = self.storage.write();
            storage.filter = Some(Arc::new(filter));
            storage.rebuild_displayed();
        }
        tracing::trace!(target: targets::MODEL, "filter set");
        self.signals.filter_changed.emit(());
    }

    /// Clears the filter predicate.
    pub fn clear_filter(&self) {
        {
            let mut storage = self.storage.write();
            storage.filter = None;
            storage.rebuild_displayed();
        }
        tracing::trace!(target: targets::MODEL, "filter cleared");
        self.signals.filter_changed.emit(());
    }

    /// Enables pagination with the given page size, or disables it with
    /// `None`.
    pub fn set_page_size(&self, size: Option<usize>) {
        let mut storage = self.storage.write();
        storage.page_size = size;
    }

    /// Moves to the given zero-based page.
    pub fn set_current_page(&self, page: usize) {
        let mut storage = self.storage.write();
        storage.current_page = page;
    }

    /// Dissolves a group: its children are spliced into the group's place in
    /// the parent, the group row and its footer are removed. Used when the
    /// host regroups data.
    pub fn flatten_group(&self, id: RowId) -> bool {
        let flattened = {
            let mut storage = self.storage.write();
            let Some(node) = storage.nodes.get(&id) else {
                return false;
            };
            if node.kind != RowKind::Group {
                return false;
            }
            let parent = node.parent;
            let children = node.children.clone();

            // Footers of this group die with it; other children move up.
            let mut kept = Vec::new();
            for child in children {
                let is_footer = matches!(
                    storage.nodes.get(&child).map(|n| n.kind),
                    Some(RowKind::Footer(_))
                );
                if is_footer {
                    storage.remove_subtree(child);
                } else {
                    kept.push(child);
                }
            }

            for &child in &kept {
                if let Some(child_node) = storage.nodes.get_mut(&child) {
                    child_node.parent = parent;
                }
            }

            let siblings = match parent {
                None => &mut storage.root_children,
                Some(parent_id) => match storage.nodes.get_mut(&parent_id) {
                    Some(parent_node) => &mut parent_node.children,
                    None => return false,
                },
            };
            if let Some(position) = siblings.iter().position(|&s| s == id) {
                siblings.splice(position..=position, kept);
            }
            storage.nodes.remove(&id);
            storage.rebuild_displayed();
            true
        };
        if flattened {
            tracing::trace!(target: targets::MODEL, ?id, "group flattened");
            self.signals.grouping_changed.emit(());
        }
        flattened
    }

    /// Runs a closure against the payload of a row.
    pub fn with_row<R>(&self, id: RowId, f: impl FnOnce(&T) -> R) -> Option<R> {
        let storage = self.storage.read();
        storage.nodes.get(&id).map(|node| f(&node.data))
    }
}

impl<T: Send + Sync + 'static> RowModel for GridRowModel<T> {
    fn displayed_count(&self) -> usize {
        self.storage.read().displayed.len()
    }

    fn displayed_row(&self, index: usize) -> Option<RowId> {
        self.storage.read().displayed.get(index).copied()
    }

    fn display_index(&self, id: RowId) -> Option<usize> {
        self.storage.read().display_index.get(&id).copied()
    }

    fn contains(&self, id: RowId) -> bool {
        self.storage.read().nodes.contains_key(&id)
    }

    fn kind(&self, id: RowId) -> Option<RowKind> {
        self.storage.read().nodes.get(&id).map(|n| n.kind)
    }

    fn parent_of(&self, id: RowId) -> Option<RowId> {
        self.storage.read().nodes.get(&id).and_then(|n| n.parent)
    }

    fn children_of(&self, id: RowId) -> Vec<RowId> {
        self.storage
            .read()
            .nodes
            .get(&id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn passes_filter(&self, id: RowId) -> bool {
        self.storage.read().node_passes(id)
    }

    fn all_rows(&self) -> Vec<RowId> {
        let storage = self.storage.read();
        let mut order = Vec::with_capacity(storage.nodes.len());
        for &root in &storage.root_children {
            storage.tree_order_into(root, &mut order);
        }
        order
    }

    fn page_bounds(&self) -> Option<(usize, usize)> {
        let storage = self.storage.read();
        let size = storage.page_size?;
        if size == 0 {
            return None;
        }
        let first = storage.current_page * size;
        if first >= storage.displayed.len() {
            return None;
        }
        let last = (first + size - 1).min(storage.displayed.len() - 1);
        Some((first, last))
    }

    fn signals(&self) -> &RowModelSignals {
        &self.signals
    }
}
