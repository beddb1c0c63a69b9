//! Edit mode and selection state.
//!
//! [`SelectionController`] tracks whether the drawer is in edit mode and
//! which entry (if any) is selected.
//!
//! # State Machine
//!
//! ```text
//!              set_editing(true)
//!  NotEditing ──────────────────> Editing
//!      ^                             │
//!      └─────────────────────────────┘
//!       set_editing(false), clears selection
//! ```
//!
//! `select` is accepted in both states. A selection made while not editing is
//! stored, and shows up once editing is turned on again; only leaving edit
//! mode clears it.
//!
//! Observers may change the selection or edit mode from a callback. The write
//! takes effect after the notification round that invoked them completes.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use widget_drawer::{NotifyScope, SelectionController, WidgetId};
//!
//! let selection = SelectionController::new(Arc::new(NotifyScope::new()));
//! selection.set_editing(true);
//! selection.select(WidgetId(5));
//! assert_eq!(selection.selected_id(), Some(WidgetId(5)));
//!
//! selection.set_editing(false);
//! assert_eq!(selection.selected_id(), None);
//! ```

use std::sync::Arc;

use widget_drawer_core::logging::targets;
use widget_drawer_core::{ConnectionId, ObservableProperty, Signal};

use crate::entry::WidgetId;
use crate::notify::NotifyScope;

/// Owns edit mode and the selected entry id.
///
/// # Signals
///
/// - `editing_changed`: Emitted with the new edit-mode flag
/// - `selection_changed`: Emitted with the new selected id
///
/// Both carry only the new value and fire only when it actually changes.
///
/// Writes made from an observer while a notification round is in flight are
/// queued on the shared [`NotifyScope`] and applied once that round ends, so
/// every subscriber sees the values in the order they were set.
pub struct SelectionController {
    inner: Arc<SelectionState>,
}

struct SelectionState {
    editing: ObservableProperty<bool>,
    selected: ObservableProperty<Option<WidgetId>>,
    notify: Arc<NotifyScope>,
}

impl SelectionState {
    fn apply_editing(&self, editing: bool) {
        let _round = self.notify.enter();
        let changed = self.editing.set_silent(editing);
        if !editing {
            self.selected.set(None);
        }
        if changed {
            tracing::debug!(target: targets::SELECTION, editing, "edit mode changed");
            self.editing.notify();
        }
    }

    fn apply_selected(&self, id: Option<WidgetId>) {
        let _round = self.notify.enter();
        if self.selected.set(id) {
            tracing::debug!(target: targets::SELECTION, selected = ?id, "selection changed");
        }
    }
}

impl SelectionController {
    /// Creates a controller that is not editing and has no selection.
    pub fn new(notify: Arc<NotifyScope>) -> Self {
        Self {
            inner: Arc::new(SelectionState {
                editing: ObservableProperty::new(false),
                selected: ObservableProperty::new(None),
                notify,
            }),
        }
    }

    /// Returns `true` while edit mode is on.
    pub fn is_editing(&self) -> bool {
        self.inner.editing.get()
    }

    /// The selected entry id, if any.
    pub fn selected_id(&self) -> Option<WidgetId> {
        self.inner.selected.get()
    }

    /// Turns edit mode on or off.
    ///
    /// Turning it off always clears the selection, even when edit mode was
    /// already off. The selection notification (if any) is delivered before
    /// the edit-mode notification.
    pub fn set_editing(&self, editing: bool) {
        self.schedule("set_editing", move |state| state.apply_editing(editing));
    }

    /// Selects `id`.
    ///
    /// The id is not validated; selecting an id that is not (or no longer)
    /// in the drawer simply matches no entry.
    pub fn select(&self, id: WidgetId) {
        self.schedule("select", move |state| state.apply_selected(Some(id)));
    }

    /// Clears the selection without leaving edit mode.
    pub fn clear_selection(&self) {
        self.schedule("clear_selection", |state| state.apply_selected(None));
    }

    /// Selects `id` only while editing, as a tap on an entry or its selection
    /// indicator does. Returns `true` if the tap was applied.
    pub fn select_if_editing(&self, id: WidgetId) -> bool {
        if self.is_editing() {
            self.select(id);
            true
        } else {
            tracing::trace!(target: targets::SELECTION, %id, "tap ignored outside edit mode");
            false
        }
    }

    /// Subscribes to edit-mode changes, optionally replaying the current value.
    pub fn subscribe_editing<F>(&self, replay: bool, slot: F) -> ConnectionId
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.inner.editing.subscribe(replay, slot)
    }

    /// Subscribes to selection changes, optionally replaying the current value.
    pub fn subscribe_selection<F>(&self, replay: bool, slot: F) -> ConnectionId
    where
        F: Fn(&Option<WidgetId>) + Send + Sync + 'static,
    {
        self.inner.selected.subscribe(replay, slot)
    }

    /// The edit-mode change signal.
    pub fn editing_changed(&self) -> &Signal<bool> {
        self.inner.editing.changed()
    }

    /// The selection change signal.
    pub fn selection_changed(&self) -> &Signal<Option<WidgetId>> {
        self.inner.selected.changed()
    }

    /// Applies `write` now, or after the current notification round.
    fn schedule<F>(&self, op: &'static str, write: F)
    where
        F: FnOnce(&SelectionState) + Send + 'static,
    {
        if self.inner.notify.is_notifying() {
            tracing::debug!(target: targets::SELECTION, op, "queued until notification round ends");
        }
        let state = self.inner.clone();
        self.inner.notify.defer(move || write(&state));
    }
}

impl std::fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionController")
            .field("editing", &self.is_editing())
            .field("selected", &self.selected_id())
            .finish()
    }
}
