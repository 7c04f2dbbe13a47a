//! Selection configuration surface.
//!
//! `RowSelectionOptions` mirrors the option set a host grid exposes for row
//! selection. Options are validated by [`RowSelectionOptions::normalize`],
//! which never fails: conflicting combinations are corrected to the nearest
//! valid configuration and reported as [`ConfigIssue`]s for the caller to
//! log.

use std::fmt;
use std::sync::Arc;

use super::row::RowId;

/// Predicate deciding whether a row may be selected.
///
/// `None` on the options struct means every row is selectable. The engine
/// calls the predicate before every mutating operation and re-evaluates it
/// for already-selected rows when the configuration changes.
pub type RowSelectableFn = Arc<dyn Fn(RowId) -> bool + Send + Sync>;

/// How many rows may be selected at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMode {
    /// At most one row selected at a time.
    SingleRow,
    /// Arbitrary sets with range support.
    MultiRow,
}

/// Whether clicking a row (outside its checkbox) affects selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClickSelection {
    /// Clicks never change selection; only checkboxes do.
    #[default]
    Disabled,
    /// Clicks select; modifier clicks toggle and form ranges.
    Enabled,
    /// Clicks may deselect already-selected rows but never select.
    DeselectionOnly,
}

/// How selecting a group row relates to its descendants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GroupSelects {
    /// The group row is an ordinary independently-selectable row.
    #[default]
    RowSelf,
    /// Toggling a group cascades over all descendant leaves.
    Descendants,
    /// Like `Descendants`, restricted to leaves passing the current filter.
    FilteredDescendants,
}

/// Which rows the header checkbox selects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectAllScope {
    /// Every selectable row, regardless of paging and filtering.
    #[default]
    All,
    /// Only rows on the current page.
    CurrentPage,
    /// Only rows passing the current filter.
    Filtered,
}

/// Where selection checkboxes are rendered. Carried for hosts; the engine
/// does not interpret it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckboxLocation {
    /// In the dedicated selection column.
    #[default]
    SelectionColumn,
    /// Merged into the auto group column.
    AutoGroupColumn,
}

/// A correction applied while normalizing the configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigIssue {
    /// `group_selects` other than `RowSelf` has no meaning in single-row
    /// mode and was reset.
    GroupSelectsRequiresMultiRow,
    /// The header checkbox cannot select multiple rows in single-row mode
    /// and was disabled.
    HeaderCheckboxRequiresMultiRow,
    /// `enable_selection_without_keys` implies additive clicks and was
    /// disabled in single-row mode.
    SelectionWithoutKeysRequiresMultiRow,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigIssue::GroupSelectsRequiresMultiRow => {
                write!(
                    f,
                    "group_selects has no effect in single-row mode; using RowSelf"
                )
            }
            ConfigIssue::HeaderCheckboxRequiresMultiRow => {
                write!(
                    f,
                    "header_checkbox has no effect in single-row mode; disabled"
                )
            }
            ConfigIssue::SelectionWithoutKeysRequiresMultiRow => {
                write!(
                    f,
                    "enable_selection_without_keys has no effect in single-row mode; disabled"
                )
            }
        }
    }
}

/// The full recognized row-selection option surface.
#[derive(Clone)]
pub struct RowSelectionOptions {
    /// Single- or multi-row selection.
    pub mode: SelectionMode,
    /// Whether per-row checkboxes are shown.
    pub checkboxes: bool,
    /// Whether the header select-all checkbox is shown.
    pub header_checkbox: bool,
    /// Click behavior outside checkboxes.
    pub click_selection: ClickSelection,
    /// Plain clicks toggle additively, as if a modifier were held.
    pub enable_selection_without_keys: bool,
    /// Group cascade behavior.
    pub group_selects: GroupSelects,
    /// Scope of the header checkbox.
    pub select_all: SelectAllScope,
    /// Selectability policy; `None` means always selectable.
    pub is_row_selectable: Option<RowSelectableFn>,
    /// Checkbox rendering location, for hosts.
    pub checkbox_location: CheckboxLocation,
}

impl RowSelectionOptions {
    /// Single-row defaults: checkboxes on, no click selection.
    pub fn single_row() -> Self {
        Self {
            mode: SelectionMode::SingleRow,
            checkboxes: true,
            header_checkbox: false,
            click_selection: ClickSelection::Disabled,
            enable_selection_without_keys: false,
            group_selects: GroupSelects::RowSelf,
            select_all: SelectAllScope::All,
            is_row_selectable: None,
            checkbox_location: CheckboxLocation::SelectionColumn,
        }
    }

    /// Multi-row defaults: checkboxes and header checkbox on, no click
    /// selection.
    pub fn multi_row() -> Self {
        Self {
            mode: SelectionMode::MultiRow,
            checkboxes: true,
            header_checkbox: true,
            click_selection: ClickSelection::Disabled,
            enable_selection_without_keys: false,
            group_selects: GroupSelects::RowSelf,
            select_all: SelectAllScope::All,
            is_row_selectable: None,
            checkbox_location: CheckboxLocation::SelectionColumn,
        }
    }

    /// Sets the click behavior.
    pub fn with_click_selection(mut self, click_selection: ClickSelection) -> Self {
        self.click_selection = click_selection;
        self
    }

    /// Sets the group cascade behavior.
    pub fn with_group_selects(mut self, group_selects: GroupSelects) -> Self {
        self.group_selects = group_selects;
        self
    }

    /// Sets the header checkbox scope.
    pub fn with_select_all(mut self, scope: SelectAllScope) -> Self {
        self.select_all = scope;
        self
    }

    /// Enables additive plain clicks.
    pub fn with_selection_without_keys(mut self) -> Self {
        self.enable_selection_without_keys = true;
        self
    }

    /// Sets the selectability policy.
    pub fn with_row_selectable<F>(mut self, policy: F) -> Self
    where
        F: Fn(RowId) -> bool + Send + Sync + 'static,
    {
        self.is_row_selectable = Some(Arc::new(policy));
        self
    }

    /// Whether the row may be selected under the current policy.
    pub fn can_select(&self, id: RowId) -> bool {
        match &self.is_row_selectable {
            Some(policy) => policy(id),
            None => true,
        }
    }

    /// Corrects conflicting option combinations, returning the issues found.
    ///
    /// Never fails: the result is always a valid configuration.
    pub fn normalize(mut self) -> (Self, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        if self.mode == SelectionMode::SingleRow {
            if self.group_selects != GroupSelects::RowSelf {
                self.group_selects = GroupSelects::RowSelf;
                issues.push(ConfigIssue::GroupSelectsRequiresMultiRow);
            }
            if self.header_checkbox {
                self.header_checkbox = false;
                issues.push(ConfigIssue::HeaderCheckboxRequiresMultiRow);
            }
            if self.enable_selection_without_keys {
                self.enable_selection_without_keys = false;
                issues.push(ConfigIssue::SelectionWithoutKeysRequiresMultiRow);
            }
        }
        (self, issues)
    }
}

impl fmt::Debug for RowSelectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowSelectionOptions")
            .field("mode", &self.mode)
            .field("checkboxes", &self.checkboxes)
            .field("header_checkbox", &self.header_checkbox)
            .field("click_selection", &self.click_selection)
            .field(
                "enable_selection_without_keys",
                &self.enable_selection_without_keys,
            )
            .field("group_selects", &self.group_selects)
            .field("select_all", &self.select_all)
            .field(
                "is_row_selectable",
                &self.is_row_selectable.as_ref().map(|_| "<policy>"),
            )
            .field("checkbox_location", &self.checkbox_location)
            .finish()
    }
}
