//! Anchor-based range tracking for SHIFT gestures.
//!
//! `RangeContext` holds the range root (the anchor set by the last plain
//! action) and the last materialized span. Extending to a target row computes
//! the inclusive display-index interval between root and target and
//! partitions it against the previous span: rows in the new span are kept,
//! rows that were in the old span but fall outside the new one are discarded.
//!
//! Re-rooting ([`RangeContext::set_root`]) clears the endpoint but keeps the
//! cached span. The next extension therefore discards the remainder of the
//! old span, which is exactly how a plain or modifier action followed by a
//! SHIFT gesture replaces the previous range instead of adding to it.

use std::collections::HashSet;

use super::registry::RowModel;
use super::row::RowId;

/// The rows affected by one range extension.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RangePartition {
    /// Rows inside the new span, in display order.
    pub keep: Vec<RowId>,
    /// Rows from the previous span that fell outside the new one.
    pub discard: Vec<RowId>,
}

impl RangePartition {
    /// Whether the extension touched anything.
    pub fn is_empty(&self) -> bool {
        self.keep.is_empty() && self.discard.is_empty()
    }
}

/// Root and endpoint of the active range, plus the cached span.
#[derive(Default)]
pub struct RangeContext {
    root: Option<RowId>,
    end: Option<RowId>,
    cached: Vec<RowId>,
}

impl RangeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The anchor row, if any.
    pub fn root(&self) -> Option<RowId> {
        self.root
    }

    /// The endpoint of the last extension, if any.
    pub fn end(&self) -> Option<RowId> {
        self.end
    }

    /// Forgets root, endpoint and cached span.
    pub fn reset(&mut self) {
        self.root = None;
        self.end = None;
        self.cached.clear();
    }

    /// Re-roots the range at `id` after a plain (non-SHIFT) action.
    ///
    /// The cached span survives so a following extension can discard it.
    pub fn set_root(&mut self, id: RowId) {
        self.root = Some(id);
        self.end = None;
    }

    /// Extends the range from the root to `target` over the model's current
    /// display order.
    ///
    /// With no usable root (never set, or the root row is no longer
    /// displayed) the extension degrades to a single-row span rooted at the
    /// target. A target that is not displayed yields an empty partition.
    pub fn extend(&mut self, target: RowId, model: &dyn RowModel) -> RangePartition {
        let Some(target_index) = model.display_index(target) else {
            return RangePartition::default();
        };

        let root_index = self.root.and_then(|root| model.display_index(root));
        let Some(root_index) = root_index else {
            self.root = Some(target);
            self.end = Some(target);
            self.cached = vec![target];
            return RangePartition {
                keep: vec![target],
                discard: Vec::new(),
            };
        };

        let (first, last) = if root_index <= target_index {
            (root_index, target_index)
        } else {
            (target_index, root_index)
        };
        let span: Vec<RowId> = (first..=last)
            .filter_map(|index| model.displayed_row(index))
            .collect();

        let span_set: HashSet<RowId> = span.iter().copied().collect();
        let discard: Vec<RowId> = self
            .cached
            .iter()
            .copied()
            .filter(|id| !span_set.contains(id))
            .collect();

        self.cached = span.clone();
        self.end = Some(target);
        RangePartition {
            keep: span,
            discard,
        }
    }
}
