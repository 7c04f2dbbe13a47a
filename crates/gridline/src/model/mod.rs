//! Row model and selection engine.
//!
//! This module contains everything the selection engine needs from a grid:
//!
//! - [`row`]: row identity ([`RowId`]) and node storage ([`RowKind`])
//! - [`registry`]: the [`RowModel`] trait the engine consumes and
//!   [`GridRowModel`], the concrete client-side implementation
//! - [`config`]: the [`RowSelectionOptions`] configuration surface
//! - [`selection`]: the selection state store and group [`TriState`]s
//! - [`range`]: anchor-based range tracking for SHIFT gestures
//! - [`interaction`]: gesture + modifier classification
//! - [`cascade`]: group cascade and tri-state derivation
//! - [`engine`]: the [`SelectionEngine`] facade tying it all together

pub mod cascade;
pub mod config;
pub mod engine;
pub mod interaction;
pub mod range;
pub mod registry;
pub mod row;
pub mod selection;

pub use config::{
    CheckboxLocation, ClickSelection, ConfigIssue, GroupSelects, RowSelectableFn,
    RowSelectionOptions, SelectAllScope, SelectionMode,
};
pub use engine::SelectionEngine;
pub use interaction::{Gesture, Instruction, Modifiers};
pub use range::{RangeContext, RangePartition};
pub use registry::{GridRowModel, RowFilterFn, RowModel, RowModelSignals};
pub use row::{RowId, RowKind};
pub use selection::TriState;
