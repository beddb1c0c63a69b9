//! Drawer session.
//!
//! A [`WidgetDrawer`] is one drawer session: it creates the store (header
//! only), the selection controller (not editing, nothing selected) and the
//! presenter, all sharing one [`NotifyScope`]. Dropping the session releases
//! every subscription the presenter made; nothing is persisted.

use std::sync::Arc;

use widget_drawer_core::logging::targets;

use crate::config::DrawerConfig;
use crate::entry::{SizeOffset, WidgetEntry, WidgetId};
use crate::error::Result;
use crate::host::WidgetHost;
use crate::notify::NotifyScope;
use crate::presenter::ListPresenter;
use crate::selection::SelectionController;
use crate::store::EntryStore;

/// One drawer session and the components it wires together.
///
/// # Example
///
/// ```
/// use widget_drawer::{WidgetDrawer, WidgetEntry, WidgetHost, WidgetId};
///
/// struct Host;
///
/// impl WidgetHost for Host {
///     type View = ();
///     fn create_view(&self, _id: WidgetId) {}
///     fn natural_height(&self, _id: WidgetId) -> i32 { 120 }
/// }
///
/// let drawer = WidgetDrawer::new(Host);
/// drawer.add(WidgetEntry::new(5)).unwrap();
/// assert_eq!(drawer.presenter().item_count(), 2);
///
/// drawer.remove_by_id(WidgetId(5)).unwrap();
/// assert!(drawer.remove_by_id(WidgetId(5)).is_err());
/// assert_eq!(drawer.presenter().item_count(), 1);
/// ```
pub struct WidgetDrawer<H: WidgetHost> {
    notify: Arc<NotifyScope>,
    store: Arc<EntryStore>,
    selection: Arc<SelectionController>,
    presenter: Arc<ListPresenter<H>>,
}

impl<H: WidgetHost> WidgetDrawer<H> {
    /// Starts a session with the default configuration.
    pub fn new(host: H) -> Self {
        Self::with_config(host, DrawerConfig::default())
    }

    /// Starts a session with `config`.
    pub fn with_config(host: H, config: DrawerConfig) -> Self {
        let notify = Arc::new(NotifyScope::new());
        let store = Arc::new(EntryStore::new(notify.clone()));
        let selection = Arc::new(SelectionController::new(notify.clone()));
        let presenter = ListPresenter::new(
            store.clone(),
            selection.clone(),
            Arc::new(host),
            config,
        );
        tracing::debug!(target: targets::SESSION, ?config, "drawer session started");

        Self {
            notify,
            store,
            selection,
            presenter,
        }
    }

    /// The entry store.
    pub fn store(&self) -> &Arc<EntryStore> {
        &self.store
    }

    /// The edit-mode and selection controller.
    pub fn selection(&self) -> &Arc<SelectionController> {
        &self.selection
    }

    /// The presenter a display surface binds to.
    pub fn presenter(&self) -> &Arc<ListPresenter<H>> {
        &self.presenter
    }

    /// Runs `f` once no notification is being delivered.
    ///
    /// Observers use this to mutate the drawer in response to a
    /// notification; calling a mutating method directly from a callback
    /// fails with [`DrawerError::ReentrantMutation`](crate::DrawerError::ReentrantMutation).
    pub fn defer<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.notify.defer(f);
    }

    /// See [`EntryStore::add`].
    pub fn add(&self, entry: WidgetEntry) -> Result<usize> {
        self.store.add(entry)
    }

    /// See [`EntryStore::add_all`].
    pub fn add_all<I>(&self, entries: I) -> Vec<Result<usize>>
    where
        I: IntoIterator<Item = WidgetEntry>,
    {
        self.store.add_all(entries)
    }

    /// See [`EntryStore::remove_by_id`].
    pub fn remove_by_id(&self, id: WidgetId) -> Result<WidgetEntry> {
        self.store.remove_by_id(id)
    }

    /// See [`EntryStore::remove_at`].
    pub fn remove_at(&self, index: usize) -> Result<WidgetEntry> {
        self.store.remove_at(index)
    }

    /// See [`EntryStore::set_size_offset`].
    pub fn set_size_offset(&self, id: WidgetId, size_offset: SizeOffset) -> Result<bool> {
        self.store.set_size_offset(id, size_offset)
    }

    /// See [`SelectionController::set_editing`].
    pub fn set_editing(&self, editing: bool) {
        self.selection.set_editing(editing);
    }

    /// See [`SelectionController::is_editing`].
    pub fn is_editing(&self) -> bool {
        self.selection.is_editing()
    }

    /// See [`SelectionController::select`].
    pub fn select(&self, id: WidgetId) {
        self.selection.select(id);
    }

    /// See [`SelectionController::selected_id`].
    pub fn selected_id(&self) -> Option<WidgetId> {
        self.selection.selected_id()
    }

    /// The selected entry, if the selected id is in the drawer.
    pub fn selected_entry(&self) -> Option<WidgetEntry> {
        self.selected_id().and_then(|id| self.store.entry(id))
    }
}

impl<H: WidgetHost> Drop for WidgetDrawer<H> {
    fn drop(&mut self) {
        self.presenter.detach();
        tracing::debug!(target: targets::SESSION, "drawer session ended");
    }
}

impl<H: WidgetHost> std::fmt::Debug for WidgetDrawer<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetDrawer")
            .field("store", &self.store)
            .field("selection", &self.selection)
            .field("presenter", &self.presenter)
            .finish()
    }
}
