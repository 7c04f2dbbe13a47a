//! Group cascade resolution.
//!
//! Applies selection values through group hierarchies and re-derives group
//! tri-states from their selectable descendants. Under
//! [`GroupSelects::RowSelf`] groups are ordinary rows and none of the
//! cascading here applies; the cascade modes fan group toggles out over
//! descendant leaves and keep each group's own set membership in sync with
//! its derived tri-state (a fully-selected group is itself a member of the
//! selected set).

use gridline_core::logging::targets;

use super::config::{GroupSelects, RowSelectionOptions};
use super::registry::RowModel;
use super::row::{RowId, RowKind};
use super::selection::{SelectionState, TriState};

/// Applies `value` to one row, fanning out over descendants for group rows
/// in cascade modes. Returns the number of membership changes.
///
/// Footer rows redirect to the group they summarize. Selecting a row the
/// policy rejects is a silent no-op; unselectable descendants are skipped
/// without blocking the rest of the cascade. Group tri-states are not
/// recomputed here; callers follow up with [`refresh_group_states`].
pub(crate) fn apply_row(
    state: &mut SelectionState,
    model: &dyn RowModel,
    options: &RowSelectionOptions,
    id: RowId,
    value: bool,
) -> usize {
    let Some(kind) = model.kind(id) else {
        return 0;
    };
    match kind {
        RowKind::Footer(group) => apply_row(state, model, options, group, value),
        RowKind::Group if options.group_selects != GroupSelects::RowSelf => {
            let leaves = selectable_leaves(model, options, id);
            tracing::trace!(
                target: targets::SELECTION,
                ?id,
                value,
                leaf_count = leaves.len(),
                "cascading group"
            );
            let mut changes = 0;
            for leaf in leaves {
                changes += set_membership(state, options, leaf, value);
            }
            changes
        }
        _ => set_membership(state, options, id, value),
    }
}

fn set_membership(
    state: &mut SelectionState,
    options: &RowSelectionOptions,
    id: RowId,
    value: bool,
) -> usize {
    if value {
        if !options.can_select(id) {
            return 0;
        }
        usize::from(state.insert(id))
    } else {
        usize::from(state.remove(id))
    }
}

/// Selectable descendant leaves of a group, restricted to filtered rows
/// under [`GroupSelects::FilteredDescendants`].
pub(crate) fn selectable_leaves(
    model: &dyn RowModel,
    options: &RowSelectionOptions,
    group: RowId,
) -> Vec<RowId> {
    let filtered_only = options.group_selects == GroupSelects::FilteredDescendants;
    let mut leaves = Vec::new();
    collect_leaves(model, options, group, filtered_only, &mut leaves);
    leaves
}

fn collect_leaves(
    model: &dyn RowModel,
    options: &RowSelectionOptions,
    id: RowId,
    filtered_only: bool,
    out: &mut Vec<RowId>,
) {
    for child in model.children_of(id) {
        match model.kind(child) {
            Some(RowKind::Leaf) => {
                if (!filtered_only || model.passes_filter(child)) && options.can_select(child) {
                    out.push(child);
                }
            }
            Some(RowKind::Group) => collect_leaves(model, options, child, filtered_only, out),
            _ => {}
        }
    }
}

/// The value a direct group toggle applies to its descendants, given the
/// group's current tri-state.
///
/// The two cascade modes resolve an indeterminate group differently:
/// `Descendants` completes the selection, `FilteredDescendants` clears it.
pub(crate) fn group_toggle_value(current: TriState, group_selects: GroupSelects) -> bool {
    match group_selects {
        GroupSelects::FilteredDescendants => current == TriState::Unselected,
        _ => current != TriState::Selected,
    }
}

/// Recomputes every group's tri-state from its selectable descendants and,
/// in cascade modes, syncs group set membership with the derived state.
/// Returns the number of membership changes.
pub(crate) fn refresh_group_states(
    state: &mut SelectionState,
    model: &dyn RowModel,
    options: &RowSelectionOptions,
) -> usize {
    if options.group_selects == GroupSelects::RowSelf {
        // Groups are independent rows; their state is plain membership.
        state.clear_group_states();
        return 0;
    }

    let mut changes = 0;
    for id in model.all_rows() {
        if model.kind(id) != Some(RowKind::Group) {
            continue;
        }
        let leaves = selectable_leaves(model, options, id);
        let selected = leaves.iter().filter(|&&leaf| state.contains(leaf)).count();
        let derived = if leaves.is_empty() || selected == 0 {
            TriState::Unselected
        } else if selected == leaves.len() {
            TriState::Selected
        } else {
            TriState::Indeterminate
        };
        state.set_group_state(id, derived);

        // A fully-selected group is itself part of the selected set, even
        // when the policy would reject selecting it directly.
        let member = derived == TriState::Selected;
        if member {
            changes += usize::from(state.insert(id));
        } else {
            changes += usize::from(state.remove(id));
        }
    }
    changes
}
