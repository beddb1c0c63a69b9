//! Logging facilities for the widget drawer.
//!
//! The drawer uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("widget_drawer=debug")
//!     .init();
//! ```
//!
//! Nothing in these crates installs a subscriber on its own.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "widget_drawer_core::signal";
    /// Entry store target.
    pub const STORE: &str = "widget_drawer::store";
    /// Edit mode and selection target.
    pub const SELECTION: &str = "widget_drawer::selection";
    /// List presenter target.
    pub const PRESENTER: &str = "widget_drawer::presenter";
    /// Notification scope / deferred mutation target.
    pub const NOTIFY: &str = "widget_drawer::notify";
    /// Drawer session target.
    pub const SESSION: &str = "widget_drawer::session";
}
