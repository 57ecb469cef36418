//! Logging facilities for Fieldscape.
//!
//! Fieldscape uses the `tracing` crate for instrumentation. The library
//! never installs a subscriber; to see logs, install one in the
//! application:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! Mutating operations log at `debug` level (tracking changes, visibility
//! writes, theme matches); structural bookkeeping logs at `trace`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem, e.g.
/// `RUST_LOG=fieldscape::layertree::proxy=debug`.
pub mod targets {
    /// Hierarchy mutations (nodes added/removed).
    pub const LAYER_TREE: &str = "fieldscape::layertree";
    /// Proxy operations: visibility writes, tracking, theme resolution.
    pub const PROXY: &str = "fieldscape::layertree::proxy";
    /// Signal emission diagnostics from the core crate.
    pub const SIGNAL: &str = "fieldscape_core::signal";
}
