//! The selection engine facade.
//!
//! `SelectionEngine` owns the selection state and range context, interprets
//! gestures against the current configuration, runs the group cascade, and
//! emits one coalesced `selection_changed` notification per settled
//! instruction. Structural model signals (rows removed, regrouped, filter
//! changed, reset) trigger a reconciliation pass that drops dead ids and
//! re-derives tri-states.
//!
//! All mutation happens inside one write-lock critical section; signals are
//! emitted after the lock is released so slots may re-enter the query API.

use parking_lot::RwLock;
use std::sync::Arc;

use gridline_core::Signal;
use gridline_core::logging::targets;

use super::cascade;
use super::config::{GroupSelects, RowSelectionOptions, SelectAllScope, SelectionMode};
use super::interaction::{self, Gesture, Instruction, Modifiers};
use super::range::RangeContext;
use super::registry::RowModel;
use super::row::{RowId, RowKind};
use super::selection::{SelectionState, TriState};

/// Mutable engine state guarded by one lock.
struct EngineState {
    selection: SelectionState,
    range: RangeContext,
}

/// The row selection engine.
///
/// Hosts feed gestures in through [`handle_gesture`](Self::handle_gesture)
/// and [`handle_header_gesture`](Self::handle_header_gesture), or drive
/// selection directly through the command API. Listeners connect to
/// [`selection_changed`](Self::selection_changed) and re-query state; the
/// signal carries no payload.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use gridline::model::{
///     Gesture, GridRowModel, Modifiers, RowSelectionOptions, SelectionEngine,
/// };
///
/// let model = Arc::new(GridRowModel::new());
/// let rows: Vec<_> = (0..5).map(|i| model.add_leaf(i)).collect();
///
/// let engine = SelectionEngine::new(model.clone(), RowSelectionOptions::multi_row());
/// engine.attach();
///
/// engine.handle_gesture(rows[1], Gesture::CheckboxToggle, Modifiers::NONE);
/// engine.handle_gesture(rows[3], Gesture::CheckboxToggle, Modifiers::SHIFT);
/// assert_eq!(engine.selection_count(), 3);
///
/// model.remove_row(rows[2]);
/// assert_eq!(engine.selection_count(), 2);
/// ```
pub struct SelectionEngine {
    model: Arc<dyn RowModel>,
    options: RwLock<RowSelectionOptions>,
    state: RwLock<EngineState>,
    /// Emitted once per settled instruction that changed membership.
    pub selection_changed: Signal<()>,
}

impl SelectionEngine {
    /// Creates an engine over the given row model.
    ///
    /// The options are normalized first; corrections are logged as warnings.
    pub fn new(model: Arc<dyn RowModel>, options: RowSelectionOptions) -> Arc<Self> {
        let (options, issues) = options.normalize();
        for issue in &issues {
            tracing::warn!(target: targets::CONFIG, %issue, "configuration corrected");
        }
        Arc::new(Self {
            model,
            options: RwLock::new(options),
            state: RwLock::new(EngineState {
                selection: SelectionState::new(),
                range: RangeContext::new(),
            }),
            selection_changed: Signal::new(),
        })
    }

    /// Subscribes to the model's structural signals so removals, regrouping,
    /// filter changes and resets reconcile the selection automatically.
    ///
    /// The subscriptions hold only a weak reference back to the engine.
    pub fn attach(self: &Arc<Self>) {
        let signals = self.model.signals();
        for signal in [
            &signals.rows_removed,
            &signals.grouping_changed,
            &signals.filter_changed,
            &signals.model_reset,
        ] {
            let weak = Arc::downgrade(self);
            signal.connect(move |_| {
                if let Some(engine) = weak.upgrade() {
                    engine.reconcile();
                }
            });
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Selected rows, in the order they were selected.
    pub fn selected_rows(&self) -> Vec<RowId> {
        self.state.read().selection.ordered()
    }

    /// Number of selected rows.
    pub fn selection_count(&self) -> usize {
        self.state.read().selection.len()
    }

    /// Whether the row is in the selected set.
    pub fn is_selected(&self, id: RowId) -> bool {
        self.state.read().selection.contains(id)
    }

    /// Tri-state of a row. Group rows report their derived cascade state;
    /// other rows report plain membership and are never indeterminate.
    pub fn group_state(&self, id: RowId) -> TriState {
        let options = self.options.read();
        let state = self.state.read();
        if self.model.kind(id) == Some(RowKind::Group)
            && options.group_selects != GroupSelects::RowSelf
        {
            state.selection.group_state(id)
        } else if state.selection.contains(id) {
            TriState::Selected
        } else {
            TriState::Unselected
        }
    }

    /// State of the header checkbox over its eligible set.
    pub fn header_state(&self) -> TriState {
        let options = self.options.read().clone();
        let state = self.state.read();
        let eligible = self.eligible_rows(&options);
        let selected = eligible
            .iter()
            .filter(|&&id| state.selection.contains(id))
            .count();
        if eligible.is_empty() || selected == 0 {
            TriState::Unselected
        } else if selected == eligible.len() {
            TriState::Selected
        } else {
            TriState::Indeterminate
        }
    }

    /// The current range anchor, if any.
    pub fn range_root(&self) -> Option<RowId> {
        self.state.read().range.root()
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    /// Routes a row gesture through the interaction interpreter.
    pub fn handle_gesture(&self, target: RowId, gesture: Gesture, modifiers: Modifiers) {
        let options = self.options.read().clone();
        let instruction = interaction::interpret(target, gesture, modifiers, &options);
        self.execute(instruction, &options);
    }

    /// Routes a header-checkbox gesture.
    pub fn handle_header_gesture(&self) {
        let options = self.options.read().clone();
        let instruction = interaction::interpret_header(&options);
        self.execute(instruction, &options);
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Selects a row. Non-additive selection clears all other rows first.
    pub fn select(&self, id: RowId, additive: bool) {
        let options = self.options.read().clone();
        let changes = {
            let mut state = self.state.write();
            self.run_select(&mut state, &options, id, additive)
        };
        self.settle(changes);
    }

    /// Deselects a row. No-op if the row is not selected.
    pub fn deselect(&self, id: RowId) {
        let options = self.options.read().clone();
        let changes = {
            let mut state = self.state.write();
            self.run_set(&mut state, &options, id, false)
        };
        self.settle(changes);
    }

    /// Toggles a row additively, like a checkbox gesture.
    pub fn toggle(&self, id: RowId) {
        let options = self.options.read().clone();
        let changes = {
            let mut state = self.state.write();
            self.run_toggle(&mut state, &options, id)
        };
        self.settle(changes);
    }

    /// Bulk-applies an ordered set of rows in one instruction: selects them
    /// (clearing all other rows first when not additive), or deselects them
    /// when `deselect` is true, leaving rows outside the list untouched.
    pub fn set_selected_range(&self, ids: &[RowId], additive: bool, deselect: bool) {
        let options = self.options.read().clone();
        let changes = {
            let mut state = self.state.write();
            let mut changes = 0;
            if !deselect && !additive {
                let keep: Vec<RowId> = ids.to_vec();
                changes += state.selection.retain(|id| keep.contains(&id));
            }
            for &id in ids {
                changes +=
                    cascade::apply_row(&mut state.selection, &*self.model, &options, id, !deselect);
            }
            changes += cascade::refresh_group_states(&mut state.selection, &*self.model, &options);
            changes
        };
        self.settle(changes);
    }

    /// Selects the full eligible set for the configured select-all scope.
    pub fn select_all(&self) {
        let options = self.options.read().clone();
        let changes = {
            let mut state = self.state.write();
            self.run_select_eligible(&mut state, &options)
        };
        self.settle(changes);
    }

    /// Empties the selection and forgets the range anchor.
    pub fn clear_selection(&self) {
        let changes = {
            let mut state = self.state.write();
            let changes = state.selection.clear();
            state.range.reset();
            changes
        };
        self.settle(changes);
    }

    /// Replaces the configuration, reconciling existing selection against
    /// the new mode and policy. Corrections are logged as warnings.
    pub fn set_options(&self, options: RowSelectionOptions) {
        let (options, issues) = options.normalize();
        for issue in &issues {
            tracing::warn!(target: targets::CONFIG, %issue, "configuration corrected");
        }
        *self.options.write() = options.clone();

        let changes = {
            let mut state = self.state.write();
            let mut changes = 0;
            if options.mode == SelectionMode::SingleRow && state.selection.len() > 1 {
                // Keep only the most recently selected row.
                let keep = state.selection.ordered().last().copied();
                changes += state.selection.retain(|id| Some(id) == keep);
            }
            changes += self.run_reconcile(&mut state, &options);
            changes
        };
        self.settle(changes);
    }

    /// Re-validates the selection against the model: ids no longer present
    /// are dropped, the policy is re-evaluated, tri-states recomputed, and a
    /// dangling range anchor cleared. Attached engines run this on every
    /// structural model signal.
    pub fn reconcile(&self) {
        let options = self.options.read().clone();
        let changes = {
            let mut state = self.state.write();
            self.run_reconcile(&mut state, &options)
        };
        self.settle(changes);
    }

    // =========================================================================
    // Instruction execution
    // =========================================================================

    fn execute(&self, instruction: Instruction, options: &RowSelectionOptions) {
        let changes = {
            let mut state = self.state.write();
            match instruction {
                Instruction::None => 0,
                Instruction::Replace(id) => self.run_replace(&mut state, options, id),
                Instruction::ToggleAdditive(id) => self.run_toggle(&mut state, options, id),
                Instruction::DeselectOnly(id) => self.run_deselect_only(&mut state, options, id),
                Instruction::ExtendRange(id) => self.run_extend(&mut state, options, id),
                Instruction::BatchRange(id) => self.run_batch(&mut state, options, id),
                Instruction::HeaderToggle => self.run_header_toggle(&mut state, options),
            }
        };
        self.settle(changes);
    }

    /// Emits `selection_changed` once if anything changed.
    fn settle(&self, changes: usize) {
        if changes > 0 {
            tracing::trace!(target: targets::SELECTION, changes, "selection changed");
            self.selection_changed.emit(());
        }
    }

    /// Resolves footers to the group they summarize.
    fn effective_target(&self, id: RowId) -> Option<RowId> {
        match self.model.kind(id)? {
            RowKind::Footer(group) => {
                if self.model.contains(group) {
                    Some(group)
                } else {
                    None
                }
            }
            _ => Some(id),
        }
    }

    fn run_toggle(
        &self,
        state: &mut EngineState,
        options: &RowSelectionOptions,
        id: RowId,
    ) -> usize {
        let Some(target) = self.effective_target(id) else {
            return 0;
        };

        if options.mode == SelectionMode::SingleRow {
            return self.run_single_toggle(state, options, target);
        }

        let is_cascading_group = self.model.kind(target) == Some(RowKind::Group)
            && options.group_selects != GroupSelects::RowSelf;
        let value = if is_cascading_group {
            cascade::group_toggle_value(state.selection.group_state(target), options.group_selects)
        } else {
            !state.selection.contains(target)
        };

        let mut changes = cascade::apply_row(&mut state.selection, &*self.model, options, target, value);
        changes += cascade::refresh_group_states(&mut state.selection, &*self.model, options);
        if changes > 0 || options.can_select(target) {
            state.range.set_root(target);
        }
        changes
    }

    fn run_single_toggle(
        &self,
        state: &mut EngineState,
        options: &RowSelectionOptions,
        target: RowId,
    ) -> usize {
        if state.selection.contains(target) {
            let changes = usize::from(state.selection.remove(target));
            state.range.set_root(target);
            return changes;
        }
        if !options.can_select(target) {
            return 0;
        }
        let mut changes = state.selection.clear();
        changes += usize::from(state.selection.insert(target));
        state.range.set_root(target);
        changes
    }

    fn run_replace(
        &self,
        state: &mut EngineState,
        options: &RowSelectionOptions,
        id: RowId,
    ) -> usize {
        let Some(target) = self.effective_target(id) else {
            return 0;
        };
        // Clicking a group in cascade modes does not drive the cascade.
        if self.model.kind(target) == Some(RowKind::Group)
            && options.group_selects != GroupSelects::RowSelf
        {
            return 0;
        }
        if !options.can_select(target) {
            return 0;
        }

        let mut changes = state.selection.retain(|r| r == target);
        changes += usize::from(state.selection.insert(target));
        changes += cascade::refresh_group_states(&mut state.selection, &*self.model, options);
        state.range.set_root(target);
        changes
    }

    fn run_deselect_only(
        &self,
        state: &mut EngineState,
        options: &RowSelectionOptions,
        id: RowId,
    ) -> usize {
        let Some(target) = self.effective_target(id) else {
            return 0;
        };
        if !state.selection.contains(target) {
            return 0;
        }
        let mut changes =
            cascade::apply_row(&mut state.selection, &*self.model, options, target, false);
        changes += cascade::refresh_group_states(&mut state.selection, &*self.model, options);
        state.range.set_root(target);
        changes
    }

    fn run_set(
        &self,
        state: &mut EngineState,
        options: &RowSelectionOptions,
        id: RowId,
        value: bool,
    ) -> usize {
        let Some(target) = self.effective_target(id) else {
            return 0;
        };
        let mut changes =
            cascade::apply_row(&mut state.selection, &*self.model, options, target, value);
        changes += cascade::refresh_group_states(&mut state.selection, &*self.model, options);
        if changes > 0 {
            state.range.set_root(target);
        }
        changes
    }

    fn run_select(
        &self,
        state: &mut EngineState,
        options: &RowSelectionOptions,
        id: RowId,
        additive: bool,
    ) -> usize {
        let Some(target) = self.effective_target(id) else {
            return 0;
        };
        // An unselectable target must not disturb the existing selection,
        // so the gate runs before the non-additive clear.
        let cascading_group = self.model.kind(target) == Some(RowKind::Group)
            && options.group_selects != GroupSelects::RowSelf;
        if cascading_group {
            if cascade::selectable_leaves(&*self.model, options, target).is_empty() {
                return 0;
            }
        } else if !options.can_select(target) {
            return 0;
        }

        let mut changes = 0;
        if !additive || options.mode == SelectionMode::SingleRow {
            changes += state.selection.retain(|r| r == target);
        }
        changes += cascade::apply_row(&mut state.selection, &*self.model, options, target, true);
        changes += cascade::refresh_group_states(&mut state.selection, &*self.model, options);
        state.range.set_root(target);
        changes
    }

    fn run_extend(
        &self,
        state: &mut EngineState,
        options: &RowSelectionOptions,
        id: RowId,
    ) -> usize {
        let Some(target) = self.effective_target(id) else {
            return 0;
        };
        let partition = state.range.extend(target, &*self.model);
        let mut changes = 0;
        for row in &partition.keep {
            changes += cascade::apply_row(&mut state.selection, &*self.model, options, *row, true);
        }
        for row in &partition.discard {
            changes += cascade::apply_row(&mut state.selection, &*self.model, options, *row, false);
        }
        changes += cascade::refresh_group_states(&mut state.selection, &*self.model, options);
        changes
    }

    fn run_batch(
        &self,
        state: &mut EngineState,
        options: &RowSelectionOptions,
        id: RowId,
    ) -> usize {
        let Some(target) = self.effective_target(id) else {
            return 0;
        };
        // Batch gestures need a live anchor; without one they do nothing.
        let Some(root) = state.range.root() else {
            return 0;
        };
        if self.model.display_index(root).is_none() {
            return 0;
        }
        // The anchor's own value decides the direction: a selected anchor
        // applies the span additively, a deselected one subtracts it.
        let value = state.selection.contains(root);

        let partition = state.range.extend(target, &*self.model);
        let mut changes = 0;
        for row in &partition.keep {
            changes += cascade::apply_row(&mut state.selection, &*self.model, options, *row, value);
        }
        changes += cascade::refresh_group_states(&mut state.selection, &*self.model, options);
        changes
    }

    fn run_header_toggle(&self, state: &mut EngineState, options: &RowSelectionOptions) -> usize {
        let eligible = self.eligible_rows(options);
        let all_selected = !eligible.is_empty()
            && eligible.iter().all(|&id| state.selection.contains(id));

        if all_selected {
            // A full header checkbox deselects the eligible set; rows
            // outside the configured scope keep their selection.
            let mut changes = 0;
            for id in eligible {
                changes += cascade::apply_row(&mut state.selection, &*self.model, options, id, false);
            }
            changes += cascade::refresh_group_states(&mut state.selection, &*self.model, options);
            state.range.reset();
            changes
        } else {
            // Empty or indeterminate transitions to full-select.
            self.run_select_eligible(state, options)
        }
    }

    fn run_select_eligible(
        &self,
        state: &mut EngineState,
        options: &RowSelectionOptions,
    ) -> usize {
        let mut changes = 0;
        for id in self.eligible_rows(options) {
            changes += cascade::apply_row(&mut state.selection, &*self.model, options, id, true);
        }
        changes += cascade::refresh_group_states(&mut state.selection, &*self.model, options);
        changes
    }

    /// The rows the header checkbox and `select_all` operate on, per the
    /// configured scope. Footers are never eligible; groups are eligible
    /// only as independent rows (cascade modes derive their state).
    fn eligible_rows(&self, options: &RowSelectionOptions) -> Vec<RowId> {
        let candidates: Vec<RowId> = match options.select_all {
            SelectAllScope::All => self.model.all_rows(),
            SelectAllScope::Filtered => self
                .model
                .all_rows()
                .into_iter()
                .filter(|&id| self.model.passes_filter(id))
                .collect(),
            SelectAllScope::CurrentPage => {
                let (first, last) = match self.model.page_bounds() {
                    Some(bounds) => bounds,
                    None => {
                        let count = self.model.displayed_count();
                        if count == 0 {
                            return Vec::new();
                        }
                        (0, count - 1)
                    }
                };
                (first..=last)
                    .filter_map(|index| self.model.displayed_row(index))
                    .collect()
            }
        };

        candidates
            .into_iter()
            .filter(|&id| match self.model.kind(id) {
                Some(RowKind::Leaf) => options.can_select(id),
                Some(RowKind::Group) => {
                    options.group_selects == GroupSelects::RowSelf && options.can_select(id)
                }
                _ => false,
            })
            .collect()
    }

    fn run_reconcile(&self, state: &mut EngineState, options: &RowSelectionOptions) -> usize {
        let model = &*self.model;
        if state.selection.is_empty() && state.range.root().is_none() {
            return 0;
        }
        let mut changes = state.selection.retain(|id| model.contains(id));

        // Re-evaluate the policy for surviving rows. Groups in cascade
        // modes are derived and re-synced below instead.
        let cascade_groups = options.group_selects != GroupSelects::RowSelf;
        changes += state.selection.retain(|id| {
            if cascade_groups && model.kind(id) == Some(RowKind::Group) {
                true
            } else {
                options.can_select(id)
            }
        });

        changes += cascade::refresh_group_states(&mut state.selection, model, options);

        if let Some(root) = state.range.root()
            && (!model.contains(root) || !options.can_select(root))
        {
            state.range.reset();
        }
        changes
    }
}
