//! Gridline: row selection engine for interactive data grids.
//!
//! Gridline decides, given a stream of user gestures (checkbox toggles, row
//! clicks, modifier keys, the header checkbox) and structural events
//! (grouping, filtering, paging, data reload), which rows of a grid are
//! currently selected. It covers:
//!
//! - **Row model**: a narrow [`model::RowModel`] trait for feeding rows to the
//!   engine, plus [`model::GridRowModel`], a concrete client-side tree with
//!   filtering, grouping and pagination
//! - **Selection engine**: [`model::SelectionEngine`], interpreting gestures
//!   into selection mutations with anchor-based ranges and group cascading
//! - **Configuration**: [`model::RowSelectionOptions`] mirroring the
//!   recognized grid option surface, validated with warning fallbacks
//!
//! Rendering is out of scope: hosts forward gestures in and listen on
//! `selection_changed` to re-query state.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gridline::model::{
//!     Gesture, GridRowModel, Modifiers, RowSelectionOptions, SelectionEngine,
//! };
//!
//! let model = Arc::new(GridRowModel::new());
//! let a = model.add_leaf("alpha");
//! let b = model.add_leaf("beta");
//! let c = model.add_leaf("gamma");
//!
//! let engine = SelectionEngine::new(model.clone(), RowSelectionOptions::multi_row());
//! engine.attach();
//!
//! engine.handle_gesture(a, Gesture::CheckboxToggle, Modifiers::NONE);
//! engine.handle_gesture(c, Gesture::CheckboxToggle, Modifiers::SHIFT);
//! assert_eq!(engine.selected_rows(), vec![a, b, c]);
//! ```

pub mod model;

pub use gridline_core::{ConnectionGuard, ConnectionId, Signal};
