//! Logging facilities for Gridline.
//!
//! Gridline uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! High-frequency paths (signal emission, selection mutation) log at `trace`
//! level; configuration fallbacks log at `warn`. Use the constants in
//! [`targets`] with `tracing` directives to filter by subsystem, for example
//! `RUST_LOG=gridline::selection=trace`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "gridline_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "gridline_core::signal";
    /// Row model target.
    pub const MODEL: &str = "gridline::model";
    /// Selection engine target.
    pub const SELECTION: &str = "gridline::selection";
    /// Configuration validation target.
    pub const CONFIG: &str = "gridline::config";
}
