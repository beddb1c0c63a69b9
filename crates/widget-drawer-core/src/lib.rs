//! Observer plumbing for the widget drawer.
//!
//! This crate provides the notification primitives shared by every drawer
//! component:
//!
//! - **Signal/Slot System**: Type-safe, synchronous change broadcasting
//! - **Property System**: Change-detecting values, optionally observable with
//!   replay of the latest value
//! - **Logging**: `tracing` targets for filtering drawer logs by subsystem
//!
//! # Signal/Slot Example
//!
//! ```
//! use widget_drawer_core::Signal;
//!
//! let selection_changed = Signal::<Option<i32>>::new();
//!
//! let conn_id = selection_changed.connect(|selected| {
//!     println!("Selected: {:?}", selected);
//! });
//!
//! selection_changed.emit(Some(5));
//! selection_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod property;
pub mod signal;

pub use property::{ObservableProperty, Property};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
