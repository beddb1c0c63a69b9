//! Widget drawer state core.
//!
//! The drawer is a scrollable panel of hosted widgets with a protected header
//! slot, per-entry size offsets and an edit mode that reveals per-entry
//! selection controls. This crate holds all of its state and coordination
//! logic; inflating views, measuring widgets and drawing are left to a
//! [`WidgetHost`] and a display surface.
//!
//! # Components
//!
//! - [`size`]: Rendered-height arithmetic for size offsets
//! - [`EntryStore`]: Ordered slots, stable ids, insert/remove notifications
//! - [`SelectionController`]: Edit mode and the selected id
//! - [`ListPresenter`]: Per-slot presentation and display-surface signals
//! - [`WidgetDrawer`]: A session wiring the above together
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐
//! │ EntryStore  │     │ SelectionControl │
//! └──────┬──────┘     └────────┬─────────┘
//!        │ inserted/removed    │ editing/selection
//!        └─────────┬───────────┘
//!                  v
//!          ┌───────────────┐     ┌────────────┐
//!          │ ListPresenter │<────│ WidgetHost │
//!          └───────┬───────┘     └────────────┘
//!                  │ item_* / selection_*
//!                  v
//!           display surface
//! ```
//!
//! # Example
//!
//! ```
//! use widget_drawer::{WidgetDrawer, WidgetEntry, WidgetHost, WidgetId};
//!
//! struct Host;
//!
//! impl WidgetHost for Host {
//!     type View = String;
//!     fn create_view(&self, id: WidgetId) -> String { format!("widget {}", id) }
//!     fn natural_height(&self, _id: WidgetId) -> i32 { 180 }
//! }
//!
//! let drawer = WidgetDrawer::new(Host);
//! drawer.presenter().signals().item_inserted.connect(|(index, id)| {
//!     println!("inserted {} at {}", id, index);
//! });
//!
//! drawer.add(WidgetEntry::new(5)).unwrap();
//! drawer.set_editing(true);
//! drawer.select(WidgetId(5));
//! assert!(drawer.presenter().presentation_at(1).unwrap().is_selected);
//! ```

pub mod config;
pub mod drawer;
pub mod entry;
pub mod error;
pub mod host;
pub mod notify;
pub mod presenter;
pub mod selection;
pub mod size;
pub mod store;

pub use config::DrawerConfig;
pub use drawer::WidgetDrawer;
pub use entry::{SizeOffset, Slot, WidgetEntry, WidgetId};
pub use error::{DrawerError, Result};
pub use host::WidgetHost;
pub use notify::NotifyScope;
pub use presenter::{ListPresenter, Presentation, PresenterSignals, ViewKind};
pub use selection::SelectionController;
pub use size::{rendered_height, SIZE_DEFAULT, SIZE_MAX, SIZE_MIN, SIZE_STEP};
pub use store::{EntryStore, StoreSignals};

pub use widget_drawer_core::{ConnectionGuard, ConnectionId, Signal};
