//! Gesture classification.
//!
//! `interpret` maps a (gesture, modifiers, target) tuple plus the current
//! configuration onto a state-transition [`Instruction`]. It is a pure
//! function so the whole decision table is unit-testable without an engine.

use super::config::{ClickSelection, RowSelectionOptions, SelectionMode};
use super::row::RowId;

/// The kind of user gesture reaching the selection engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// A row's selection checkbox was toggled.
    CheckboxToggle,
    /// A row was clicked outside its checkbox.
    RowClick,
    /// The header select-all checkbox was toggled.
    HeaderCheckbox,
}

/// Modifier keys held during a gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        meta: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        meta: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        meta: false,
    };
    pub const META: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        meta: true,
    };
    pub const SHIFT_CTRL: Modifiers = Modifiers {
        shift: true,
        ctrl: true,
        meta: false,
    };
    pub const SHIFT_META: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        meta: true,
    };

    /// CTRL and meta both act as the toggle modifier.
    pub fn has_toggle(&self) -> bool {
        self.ctrl || self.meta
    }

    /// SHIFT combined with the toggle modifier forms the batch gesture.
    pub fn is_batch(&self) -> bool {
        self.shift && self.has_toggle()
    }
}

/// A state-transition instruction for the selection engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Nothing to do.
    None,
    /// Clear everything else, select this row.
    Replace(RowId),
    /// Toggle this row without touching others.
    ToggleAdditive(RowId),
    /// Deselect this row if selected; never select.
    DeselectOnly(RowId),
    /// Extend the range from the anchor to this row (select the span,
    /// deselect what fell out of the previous one).
    ExtendRange(RowId),
    /// Apply the span between anchor and this row with the anchor's current
    /// selected value; rows outside the span are untouched.
    BatchRange(RowId),
    /// Select or clear the header checkbox's eligible set.
    HeaderToggle,
}

/// Classifies a row gesture. Header gestures route to [`interpret_header`]
/// and ignore the target.
pub fn interpret(
    target: RowId,
    gesture: Gesture,
    modifiers: Modifiers,
    options: &RowSelectionOptions,
) -> Instruction {
    match gesture {
        Gesture::HeaderCheckbox => interpret_header(options),
        Gesture::CheckboxToggle => interpret_checkbox(target, modifiers, options),
        Gesture::RowClick => interpret_click(target, modifiers, options),
    }
}

/// Classifies a header-checkbox gesture.
pub fn interpret_header(options: &RowSelectionOptions) -> Instruction {
    if options.mode == SelectionMode::MultiRow && options.header_checkbox {
        Instruction::HeaderToggle
    } else {
        Instruction::None
    }
}

fn interpret_checkbox(
    target: RowId,
    modifiers: Modifiers,
    options: &RowSelectionOptions,
) -> Instruction {
    // Single-row mode ignores range modifiers; a re-toggle still deselects.
    if options.mode == SelectionMode::SingleRow {
        return Instruction::ToggleAdditive(target);
    }
    if modifiers.is_batch() {
        Instruction::BatchRange(target)
    } else if modifiers.shift {
        Instruction::ExtendRange(target)
    } else {
        // Checkbox toggles are additive with or without the toggle modifier.
        Instruction::ToggleAdditive(target)
    }
}

fn interpret_click(
    target: RowId,
    modifiers: Modifiers,
    options: &RowSelectionOptions,
) -> Instruction {
    match options.click_selection {
        ClickSelection::Disabled => Instruction::None,
        ClickSelection::DeselectionOnly => {
            if modifiers.has_toggle() && !modifiers.shift {
                Instruction::DeselectOnly(target)
            } else {
                Instruction::None
            }
        }
        ClickSelection::Enabled => {
            if options.mode == SelectionMode::SingleRow {
                // Clicks in single-row mode are select-only replaces.
                return Instruction::Replace(target);
            }
            if modifiers.is_batch() {
                Instruction::BatchRange(target)
            } else if modifiers.shift {
                Instruction::ExtendRange(target)
            } else if modifiers.has_toggle() {
                Instruction::ToggleAdditive(target)
            } else if options.enable_selection_without_keys {
                Instruction::ToggleAdditive(target)
            } else {
                Instruction::Replace(target)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> RowId {
        RowId::next()
    }

    #[test]
    fn test_checkbox_multi_row() {
        let options = RowSelectionOptions::multi_row();
        let t = target();

        assert_eq!(
            interpret(t, Gesture::CheckboxToggle, Modifiers::NONE, &options),
            Instruction::ToggleAdditive(t)
        );
        assert_eq!(
            interpret(t, Gesture::CheckboxToggle, Modifiers::CTRL, &options),
            Instruction::ToggleAdditive(t)
        );
        assert_eq!(
            interpret(t, Gesture::CheckboxToggle, Modifiers::SHIFT, &options),
            Instruction::ExtendRange(t)
        );
        assert_eq!(
            interpret(t, Gesture::CheckboxToggle, Modifiers::SHIFT_META, &options),
            Instruction::BatchRange(t)
        );
    }

    #[test]
    fn test_checkbox_single_row_collapses_modifiers() {
        let options = RowSelectionOptions::single_row();
        let t = target();

        for modifiers in [
            Modifiers::NONE,
            Modifiers::SHIFT,
            Modifiers::CTRL,
            Modifiers::SHIFT_CTRL,
        ] {
            assert_eq!(
                interpret(t, Gesture::CheckboxToggle, modifiers, &options),
                Instruction::ToggleAdditive(t)
            );
        }
    }

    #[test]
    fn test_click_disabled_is_noop() {
        let options = RowSelectionOptions::multi_row();
        let t = target();

        for modifiers in [Modifiers::NONE, Modifiers::CTRL, Modifiers::SHIFT] {
            assert_eq!(
                interpret(t, Gesture::RowClick, modifiers, &options),
                Instruction::None
            );
        }
    }

    #[test]
    fn test_click_enabled_multi_row() {
        let options =
            RowSelectionOptions::multi_row().with_click_selection(ClickSelection::Enabled);
        let t = target();

        assert_eq!(
            interpret(t, Gesture::RowClick, Modifiers::NONE, &options),
            Instruction::Replace(t)
        );
        assert_eq!(
            interpret(t, Gesture::RowClick, Modifiers::META, &options),
            Instruction::ToggleAdditive(t)
        );
        assert_eq!(
            interpret(t, Gesture::RowClick, Modifiers::SHIFT, &options),
            Instruction::ExtendRange(t)
        );
        assert_eq!(
            interpret(t, Gesture::RowClick, Modifiers::SHIFT_CTRL, &options),
            Instruction::BatchRange(t)
        );
    }

    #[test]
    fn test_click_without_keys_toggles() {
        let options = RowSelectionOptions::multi_row()
            .with_click_selection(ClickSelection::Enabled)
            .with_selection_without_keys();
        let t = target();

        assert_eq!(
            interpret(t, Gesture::RowClick, Modifiers::NONE, &options),
            Instruction::ToggleAdditive(t)
        );
    }

    #[test]
    fn test_click_deselection_only() {
        let options =
            RowSelectionOptions::multi_row().with_click_selection(ClickSelection::DeselectionOnly);
        let t = target();

        assert_eq!(
            interpret(t, Gesture::RowClick, Modifiers::CTRL, &options),
            Instruction::DeselectOnly(t)
        );
        assert_eq!(
            interpret(t, Gesture::RowClick, Modifiers::NONE, &options),
            Instruction::None
        );
        assert_eq!(
            interpret(t, Gesture::RowClick, Modifiers::SHIFT_CTRL, &options),
            Instruction::None
        );
    }

    #[test]
    fn test_click_single_row_is_replace() {
        let options =
            RowSelectionOptions::single_row().with_click_selection(ClickSelection::Enabled);
        let t = target();

        for modifiers in [Modifiers::NONE, Modifiers::SHIFT, Modifiers::CTRL] {
            assert_eq!(
                interpret(t, Gesture::RowClick, modifiers, &options),
                Instruction::Replace(t)
            );
        }
    }

    #[test]
    fn test_header_requires_multi_row_checkbox() {
        let t = target();
        let options = RowSelectionOptions::multi_row();
        assert_eq!(
            interpret(t, Gesture::HeaderCheckbox, Modifiers::NONE, &options),
            Instruction::HeaderToggle
        );

        let mut options = RowSelectionOptions::multi_row();
        options.header_checkbox = false;
        assert_eq!(interpret_header(&options), Instruction::None);

        let (options, _) = RowSelectionOptions::single_row().normalize();
        assert_eq!(interpret_header(&options), Instruction::None);
    }
}
