//! Per-slot presentation for a display surface.
//!
//! [`ListPresenter`] answers "what should the slot at index N look like right
//! now" and turns store and selection changes into the narrowest update
//! notifications it can, so a display surface only re-renders affected items.
//!
//! # Binding
//!
//! A display surface binds an entry when it attaches a view to it and unbinds
//! it when the view is recycled. The presenter keeps one record per bound
//! entry id, however many times the entry is rebound, and drops the record
//! when the entry is unbound or removed from the store. Per-item selection
//! notifications are only emitted for bound entries:
//!
//! - selection changes emit `selection_check_changed` for the bound entries
//!   whose checked state flipped
//! - edit-mode changes emit `selection_visibility_changed` for every bound
//!   entry; heights and spans are unaffected
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use widget_drawer::{
//!     DrawerConfig, EntryStore, ListPresenter, NotifyScope, SelectionController,
//!     ViewKind, WidgetEntry, WidgetHost, WidgetId,
//! };
//!
//! struct FixedHost;
//!
//! impl WidgetHost for FixedHost {
//!     type View = WidgetId;
//!     fn create_view(&self, id: WidgetId) -> WidgetId { id }
//!     fn natural_height(&self, _id: WidgetId) -> i32 { 200 }
//! }
//!
//! let notify = Arc::new(NotifyScope::new());
//! let store = Arc::new(EntryStore::new(notify.clone()));
//! let selection = Arc::new(SelectionController::new(notify));
//! let presenter = ListPresenter::new(
//!     store.clone(),
//!     selection,
//!     Arc::new(FixedHost),
//!     DrawerConfig::default(),
//! );
//!
//! store.add(WidgetEntry::new(7)).unwrap();
//! let item = presenter.presentation_at(1).unwrap();
//! assert_eq!(item.view_kind, ViewKind::Widget);
//! assert_eq!(item.rendered_height, Some(200));
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use widget_drawer_core::logging::targets;
use widget_drawer_core::{ConnectionGuard, ConnectionId, Signal};

use crate::config::DrawerConfig;
use crate::entry::{Slot, WidgetId};
use crate::error::{DrawerError, Result};
use crate::host::WidgetHost;
use crate::selection::SelectionController;
use crate::size::rendered_height;
use crate::store::EntryStore;

/// Which kind of view a slot needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// The header slot at index 0.
    Header,
    /// A hosted widget.
    Widget,
}

/// How a slot should be displayed right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    /// Header or widget.
    pub view_kind: ViewKind,
    /// The slot's stable id.
    pub id: WidgetId,
    /// Whether the entry's id is the selected id.
    ///
    /// This follows the stored selection even outside edit mode; use
    /// `selection_visible` to decide whether to show the indicator at all.
    pub is_selected: bool,
    /// Whether the selection indicator is shown (edit mode is on).
    pub selection_visible: bool,
    /// Height in pixels. `None` for the header, whose height is the display
    /// surface's own business.
    pub rendered_height: Option<i32>,
    /// Whether the slot spans all columns.
    pub is_full_span: bool,
    /// Number of columns the slot covers.
    pub span_columns: usize,
}

/// Signals a display surface listens to.
pub struct PresenterSignals {
    /// A slot was inserted. Args: (index, id)
    pub item_inserted: Signal<(usize, WidgetId)>,

    /// A slot was removed. Args: (index it occupied, id)
    pub item_removed: Signal<(usize, WidgetId)>,

    /// A slot's height or span changed and needs relayout. Args: (index, id)
    pub item_changed: Signal<(usize, WidgetId)>,

    /// Edit mode changed. Args: new value
    pub editing_changed: Signal<bool>,

    /// The selected id changed. Args: new value
    pub selection_changed: Signal<Option<WidgetId>>,

    /// A bound entry's checked state flipped. Args: (index, id, checked)
    pub selection_check_changed: Signal<(usize, WidgetId, bool)>,

    /// A bound entry's selection indicator should show or hide.
    /// Args: (index, id, visible)
    pub selection_visibility_changed: Signal<(usize, WidgetId, bool)>,
}

impl Default for PresenterSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenterSignals {
    /// Creates a new set of presenter signals.
    pub fn new() -> Self {
        Self {
            item_inserted: Signal::new(),
            item_removed: Signal::new(),
            item_changed: Signal::new(),
            editing_changed: Signal::new(),
            selection_changed: Signal::new(),
            selection_check_changed: Signal::new(),
            selection_visibility_changed: Signal::new(),
        }
    }

    /// Drops every display-surface subscriber.
    pub fn disconnect_all(&self) {
        self.item_inserted.disconnect_all();
        self.item_removed.disconnect_all();
        self.item_changed.disconnect_all();
        self.editing_changed.disconnect_all();
        self.selection_changed.disconnect_all();
        self.selection_check_changed.disconnect_all();
        self.selection_visibility_changed.disconnect_all();
    }
}

/// Composes the store, selection and widget host into per-slot presentation.
pub struct ListPresenter<H: WidgetHost> {
    store: Arc<EntryStore>,
    selection: Arc<SelectionController>,
    host: Arc<H>,
    config: DrawerConfig,
    bound: Mutex<HashSet<WidgetId>>,
    last_selected: Mutex<Option<WidgetId>>,
    signals: PresenterSignals,
    connections: Mutex<Vec<ConnectionGuard>>,
}

impl<H: WidgetHost> ListPresenter<H> {
    /// Creates a presenter and subscribes it to the store and selection.
    ///
    /// The subscriptions hold only weak references to the presenter and are
    /// released when it is dropped or [`detach`](Self::detach)ed.
    pub fn new(
        store: Arc<EntryStore>,
        selection: Arc<SelectionController>,
        host: Arc<H>,
        config: DrawerConfig,
    ) -> Arc<Self> {
        let presenter = Arc::new(Self {
            last_selected: Mutex::new(selection.selected_id()),
            store,
            selection,
            host,
            config,
            bound: Mutex::new(HashSet::new()),
            signals: PresenterSignals::new(),
            connections: Mutex::new(Vec::new()),
        });
        presenter.attach();
        presenter
    }

    fn attach(self: &Arc<Self>) {
        let store_signals = self.store.signals();
        let weak = Arc::downgrade(self);

        let guards = vec![
            store_signals.inserted.connect_scoped(Self::forward(
                &weak,
                |p: &Self, &(index, id): &(usize, WidgetId)| {
                    p.signals.item_inserted.emit((index, id));
                },
            )),
            store_signals.removed.connect_scoped(Self::forward(
                &weak,
                |p: &Self, &(index, id): &(usize, WidgetId)| {
                    p.release(id);
                    p.signals.item_removed.emit((index, id));
                },
            )),
            store_signals.changed.connect_scoped(Self::forward(
                &weak,
                |p: &Self, &(index, id): &(usize, WidgetId)| {
                    p.signals.item_changed.emit((index, id));
                },
            )),
            self.selection.editing_changed().connect_scoped(Self::forward(
                &weak,
                |p: &Self, &editing: &bool| p.on_editing_changed(editing),
            )),
            self.selection.selection_changed().connect_scoped(Self::forward(
                &weak,
                |p: &Self, &selected: &Option<WidgetId>| p.on_selection_changed(selected),
            )),
        ];

        *self.connections.lock() = guards;
    }

    /// Wraps a handler so it runs only while the presenter is alive.
    fn forward<Args, F>(weak: &Weak<Self>, handler: F) -> impl Fn(&Args) + Send + Sync + 'static
    where
        Args: 'static,
        F: Fn(&Self, &Args) + Send + Sync + 'static,
    {
        let weak = weak.clone();
        move |args: &Args| {
            if let Some(presenter) = weak.upgrade() {
                handler(&*presenter, args);
            }
        }
    }

    /// Releases the presenter's subscriptions to the store and selection.
    ///
    /// Subscribers to the presenter's own signals are dropped too. After
    /// this, the presenter still answers queries but emits nothing.
    pub fn detach(&self) {
        let released = std::mem::take(&mut *self.connections.lock());
        tracing::debug!(target: targets::PRESENTER, count = released.len(), "detaching presenter");
        drop(released);
        self.signals.disconnect_all();
        self.bound.lock().clear();
    }

    /// Returns the signals a display surface listens to.
    pub fn signals(&self) -> &PresenterSignals {
        &self.signals
    }

    /// The configuration this presenter lays out with.
    pub fn config(&self) -> &DrawerConfig {
        &self.config
    }

    /// Number of slots, including the header.
    pub fn item_count(&self) -> usize {
        self.store.len()
    }

    /// The stable id of the slot at `index`.
    pub fn id_at(&self, index: usize) -> Option<WidgetId> {
        self.store.get(index).map(|slot| slot.id())
    }

    /// The view kind needed for the slot at `index`.
    pub fn view_kind_at(&self, index: usize) -> Option<ViewKind> {
        self.store.get(index).map(|slot| match slot {
            Slot::Header => ViewKind::Header,
            Slot::Widget(_) => ViewKind::Widget,
        })
    }

    /// Computes how the slot at `index` should be displayed.
    pub fn presentation_at(&self, index: usize) -> Result<Presentation> {
        let slot = self.slot_at(index)?;
        Ok(self.present(slot))
    }

    /// Creates the hosted view for the widget at `index`.
    pub fn create_view(&self, index: usize) -> Result<H::View> {
        match self.slot_at(index)? {
            Slot::Header => Err(DrawerError::InvalidOperation(
                "the header view is provided by the display surface",
            )),
            Slot::Widget(entry) => Ok(self.host.create_view(entry.id)),
        }
    }

    /// Binds the slot at `index` and returns its presentation.
    ///
    /// Binding the same entry again only refreshes the presentation. The
    /// header is never tracked, since it has no per-item selection state.
    pub fn bind(&self, index: usize) -> Result<Presentation> {
        let slot = self.slot_at(index)?;
        if let Slot::Widget(entry) = slot {
            if self.bound.lock().insert(entry.id) {
                tracing::trace!(target: targets::PRESENTER, id = %entry.id, index, "entry bound");
            }
        }
        Ok(self.present(slot))
    }

    /// Releases the binding for `id`. Returns `true` if it was bound.
    pub fn unbind(&self, id: WidgetId) -> bool {
        self.release(id)
    }

    /// Returns `true` if the entry with `id` is currently bound.
    pub fn is_bound(&self, id: WidgetId) -> bool {
        self.bound.lock().contains(&id)
    }

    /// Number of bound entries.
    pub fn bound_count(&self) -> usize {
        self.bound.lock().len()
    }

    /// Handles a tap on the slot at `index` (its body or its selection
    /// indicator): selects it while editing, otherwise does nothing.
    ///
    /// Returns `true` if the selection was set.
    pub fn tap(&self, index: usize) -> bool {
        match self.store.get(index) {
            Some(Slot::Widget(entry)) => self.selection.select_if_editing(entry.id),
            _ => false,
        }
    }

    /// Subscribes to edit-mode changes.
    ///
    /// With `replay_on_subscribe` configured, the current value is delivered
    /// before this returns.
    pub fn subscribe_editing<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        if self.config.replay_on_subscribe() {
            slot(&self.selection.is_editing());
        }
        self.signals.editing_changed.connect(slot)
    }

    /// Subscribes to selection changes.
    ///
    /// With `replay_on_subscribe` configured, the current value is delivered
    /// before this returns.
    pub fn subscribe_selection<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Option<WidgetId>) + Send + Sync + 'static,
    {
        if self.config.replay_on_subscribe() {
            slot(&self.selection.selected_id());
        }
        self.signals.selection_changed.connect(slot)
    }

    fn slot_at(&self, index: usize) -> Result<Slot> {
        self.store.get(index).ok_or_else(|| DrawerError::IndexOutOfRange {
            index,
            len: self.store.len(),
        })
    }

    fn present(&self, slot: Slot) -> Presentation {
        match slot {
            Slot::Header => Presentation {
                view_kind: ViewKind::Header,
                id: WidgetId::HEADER,
                is_selected: false,
                selection_visible: false,
                rendered_height: None,
                is_full_span: true,
                span_columns: self.config.column_count(),
            },
            Slot::Widget(entry) => {
                let natural = self.host.natural_height(entry.id);
                Presentation {
                    view_kind: ViewKind::Widget,
                    id: entry.id,
                    is_selected: self.selection.selected_id() == Some(entry.id),
                    selection_visible: self.selection.is_editing(),
                    rendered_height: Some(rendered_height(natural, entry.size_offset)),
                    is_full_span: entry.is_full_width,
                    span_columns: if entry.is_full_width {
                        self.config.column_count()
                    } else {
                        1
                    },
                }
            }
        }
    }

    fn release(&self, id: WidgetId) -> bool {
        let released = self.bound.lock().remove(&id);
        if released {
            tracing::trace!(target: targets::PRESENTER, %id, "entry unbound");
        }
        released
    }

    /// Bound entries with their current index, in display order.
    fn bound_indices<I>(&self, ids: I) -> Vec<(usize, WidgetId)>
    where
        I: IntoIterator<Item = WidgetId>,
    {
        let mut indexed: Vec<_> = ids
            .into_iter()
            .filter_map(|id| self.store.index_of(id).map(|index| (index, id)))
            .collect();
        indexed.sort_unstable();
        indexed
    }

    fn on_editing_changed(&self, editing: bool) {
        self.signals.editing_changed.emit(editing);

        let bound: Vec<_> = self.bound.lock().iter().copied().collect();
        for (index, id) in self.bound_indices(bound) {
            self.signals
                .selection_visibility_changed
                .emit((index, id, editing));
        }
    }

    fn on_selection_changed(&self, selected: Option<WidgetId>) {
        let previous = std::mem::replace(&mut *self.last_selected.lock(), selected);
        self.signals.selection_changed.emit(selected);

        let affected: Vec<_> = {
            let bound = self.bound.lock();
            [previous, selected]
                .into_iter()
                .flatten()
                .filter(|id| bound.contains(id))
                .collect::<HashSet<_>>()
                .into_iter()
                .collect()
        };
        for (index, id) in self.bound_indices(affected) {
            self.signals
                .selection_check_changed
                .emit((index, id, selected == Some(id)));
        }
    }
}

impl<H: WidgetHost> std::fmt::Debug for ListPresenter<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListPresenter")
            .field("item_count", &self.item_count())
            .field("bound", &self.bound_count())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
