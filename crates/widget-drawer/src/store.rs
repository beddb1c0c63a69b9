//! Ordered collection of drawer slots.
//!
//! `EntryStore` owns the widget entries in display order. Slot 0 is always
//! the header: it is not stored as an entry at all, so it cannot be removed,
//! replaced or moved, and every widget entry sits at `position + 1`.
//!
//! Mutations emit [`StoreSignals`] after the store lock is released, carrying
//! the affected index and the entry's stable id.

use std::sync::Arc;

use parking_lot::RwLock;
use widget_drawer_core::logging::targets;
use widget_drawer_core::Signal;

use crate::entry::{SizeOffset, Slot, WidgetEntry, WidgetId};
use crate::error::{DrawerError, Result};
use crate::notify::NotifyScope;

/// Number of slots before the first widget entry.
const HEADER_SLOTS: usize = 1;

/// Signals emitted by [`EntryStore`].
pub struct StoreSignals {
    /// Emitted after an entry was appended. Args: (index, id)
    pub inserted: Signal<(usize, WidgetId)>,

    /// Emitted after an entry was removed. Args: (index it occupied, id)
    pub removed: Signal<(usize, WidgetId)>,

    /// Emitted after an entry's size offset or span changed. Args: (index, id)
    pub changed: Signal<(usize, WidgetId)>,
}

impl Default for StoreSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreSignals {
    /// Creates a new set of store signals.
    pub fn new() -> Self {
        Self {
            inserted: Signal::new(),
            removed: Signal::new(),
            changed: Signal::new(),
        }
    }
}

/// The drawer's ordered list: a header slot followed by widget entries.
pub struct EntryStore {
    entries: RwLock<Vec<WidgetEntry>>,
    signals: StoreSignals,
    notify: Arc<NotifyScope>,
}

impl EntryStore {
    /// Creates a store holding only the header.
    pub fn new(notify: Arc<NotifyScope>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            signals: StoreSignals::new(),
            notify,
        }
    }

    /// Returns the store's signals.
    pub fn signals(&self) -> &StoreSignals {
        &self.signals
    }

    /// Number of slots, including the header.
    pub fn len(&self) -> usize {
        self.entries.read().len() + HEADER_SLOTS
    }

    /// Returns `true` if the store holds no widget entries.
    ///
    /// The header is always present, so `len()` is never zero.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns the slot at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<Slot> {
        if index == 0 {
            return Some(Slot::Header);
        }
        self.entries
            .read()
            .get(index - HEADER_SLOTS)
            .copied()
            .map(Slot::Widget)
    }

    /// Returns the index of the slot with `id`.
    ///
    /// The header sentinel always resolves to index 0.
    pub fn index_of(&self, id: WidgetId) -> Option<usize> {
        if id.is_header() {
            return Some(0);
        }
        Self::position(&self.entries.read(), id).map(|pos| pos + HEADER_SLOTS)
    }

    /// Returns `true` if a slot with `id` exists (the header always does).
    pub fn contains(&self, id: WidgetId) -> bool {
        self.index_of(id).is_some()
    }

    /// Returns a copy of the widget entry with `id`.
    pub fn entry(&self, id: WidgetId) -> Option<WidgetEntry> {
        self.entries.read().iter().find(|e| e.id == id).copied()
    }

    /// Returns a snapshot of all widget entries in display order.
    pub fn entries(&self) -> Vec<WidgetEntry> {
        self.entries.read().clone()
    }

    /// Appends an entry, returning its index.
    pub fn add(&self, entry: WidgetEntry) -> Result<usize> {
        self.notify.ensure_idle()?;

        let index = {
            let mut entries = self.entries.write();
            if entry.id.is_header() || Self::position(&entries, entry.id).is_some() {
                tracing::debug!(target: targets::STORE, id = %entry.id, "duplicate id rejected");
                return Err(DrawerError::DuplicateId(entry.id));
            }
            entries.push(entry);
            entries.len() - 1 + HEADER_SLOTS
        };

        tracing::debug!(target: targets::STORE, id = %entry.id, index, "entry inserted");
        let _round = self.notify.enter();
        self.signals.inserted.emit((index, entry.id));
        Ok(index)
    }

    /// Appends entries in order, reporting the outcome of each.
    ///
    /// A failing entry does not undo earlier insertions or stop later ones.
    pub fn add_all<I>(&self, entries: I) -> Vec<Result<usize>>
    where
        I: IntoIterator<Item = WidgetEntry>,
    {
        entries.into_iter().map(|entry| self.add(entry)).collect()
    }

    /// Removes the entry with `id`, returning it.
    pub fn remove_by_id(&self, id: WidgetId) -> Result<WidgetEntry> {
        self.notify.ensure_idle()?;
        if id.is_header() {
            tracing::debug!(target: targets::STORE, "header removal rejected");
            return Err(DrawerError::header_protected());
        }

        let (index, removed) = {
            let mut entries = self.entries.write();
            let pos = Self::position(&entries, id)
                .ok_or(DrawerError::NotFound(id))
                .inspect_err(|err| tracing::debug!(target: targets::STORE, %err, "remove rejected"))?;
            (pos + HEADER_SLOTS, entries.remove(pos))
        };

        self.emit_removed(index, removed);
        Ok(removed)
    }

    /// Removes the entry at `index`, returning it.
    ///
    /// Index 0 is the header and is always rejected.
    pub fn remove_at(&self, index: usize) -> Result<WidgetEntry> {
        self.notify.ensure_idle()?;

        let removed = {
            let mut entries = self.entries.write();
            let len = entries.len() + HEADER_SLOTS;
            if index < HEADER_SLOTS || index >= len {
                tracing::debug!(target: targets::STORE, index, len, "remove rejected");
                return Err(DrawerError::IndexOutOfRange { index, len });
            }
            entries.remove(index - HEADER_SLOTS)
        };

        self.emit_removed(index, removed);
        Ok(removed)
    }

    /// Sets the size offset of the entry with `id`.
    ///
    /// Returns `true` if the offset changed.
    pub fn set_size_offset(&self, id: WidgetId, size_offset: SizeOffset) -> Result<bool> {
        self.update(id, |entry| {
            let changed = entry.size_offset != size_offset;
            entry.size_offset = size_offset;
            changed
        })
    }

    /// Makes the entry with `id` one step taller, up to the maximum.
    pub fn grow(&self, id: WidgetId) -> Result<bool> {
        self.update(id, |entry| {
            let next = entry.size_offset.grow();
            let changed = next != entry.size_offset;
            entry.size_offset = next;
            changed
        })
    }

    /// Makes the entry with `id` one step shorter, down to the minimum.
    pub fn shrink(&self, id: WidgetId) -> Result<bool> {
        self.update(id, |entry| {
            let next = entry.size_offset.shrink();
            let changed = next != entry.size_offset;
            entry.size_offset = next;
            changed
        })
    }

    /// Sets whether the entry with `id` spans all columns.
    ///
    /// Returns `true` if the flag changed.
    pub fn set_full_width(&self, id: WidgetId, is_full_width: bool) -> Result<bool> {
        self.update(id, |entry| {
            let changed = entry.is_full_width != is_full_width;
            entry.is_full_width = is_full_width;
            changed
        })
    }

    /// Applies `f` to the entry with `id`, emitting `changed` if it reports a change.
    fn update<F>(&self, id: WidgetId, f: F) -> Result<bool>
    where
        F: FnOnce(&mut WidgetEntry) -> bool,
    {
        self.notify.ensure_idle()?;
        if id.is_header() {
            return Err(DrawerError::header_protected());
        }

        let (index, changed) = {
            let mut entries = self.entries.write();
            let pos = Self::position(&entries, id).ok_or(DrawerError::NotFound(id))?;
            (pos + HEADER_SLOTS, f(&mut entries[pos]))
        };

        if changed {
            tracing::debug!(target: targets::STORE, %id, index, "entry changed");
            let _round = self.notify.enter();
            self.signals.changed.emit((index, id));
        }
        Ok(changed)
    }

    fn emit_removed(&self, index: usize, removed: WidgetEntry) {
        tracing::debug!(target: targets::STORE, id = %removed.id, index, "entry removed");
        let _round = self.notify.enter();
        self.signals.removed.emit((index, removed.id));
    }

    fn position(entries: &[WidgetEntry], id: WidgetId) -> Option<usize> {
        entries.iter().position(|e| e.id == id)
    }
}

impl std::fmt::Debug for EntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStore")
            .field("entries", &*self.entries.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn store() -> EntryStore {
        EntryStore::new(Arc::new(NotifyScope::new()))
    }

    fn ids(store: &EntryStore) -> Vec<WidgetId> {
        (0..store.len())
            .filter_map(|i| store.get(i))
            .map(|slot| slot.id())
            .collect()
    }

    #[test]
    fn test_new_store_holds_only_header() {
        let store = store();
        assert_eq!(store.len(), 1);
        assert!(store.is_empty());
        assert_eq!(store.get(0), Some(Slot::Header));
        assert_eq!(store.get(1), None);
        assert_eq!(store.index_of(WidgetId::HEADER), Some(0));
    }

    #[test]
    fn test_add_appends_and_emits_index() {
        let store = store();
        let received = Arc::new(Mutex::new(Vec::new()));

        let recv = received.clone();
        store.signals().inserted.connect(move |&(index, id)| {
            recv.lock().push((index, id));
        });

        assert_eq!(store.add(WidgetEntry::new(5)), Ok(1));
        assert_eq!(store.add(WidgetEntry::new(7)), Ok(2));

        assert_eq!(*received.lock(), vec![(1, WidgetId(5)), (2, WidgetId(7))]);
        assert_eq!(ids(&store), vec![WidgetId::HEADER, WidgetId(5), WidgetId(7)]);
    }

    #[test]
    fn test_duplicate_add_leaves_store_unchanged() {
        let store = store();
        store.add(WidgetEntry::new(1)).unwrap();
        store.add(WidgetEntry::new(2)).unwrap();
        let before = store.entries();

        let emitted = Arc::new(Mutex::new(Vec::new()));
        let recv = emitted.clone();
        store.signals().inserted.connect(move |&args| recv.lock().push(("inserted", args)));
        let recv = emitted.clone();
        store.signals().removed.connect(move |&args| recv.lock().push(("removed", args)));
        let recv = emitted.clone();
        store.signals().changed.connect(move |&args| recv.lock().push(("changed", args)));

        let dup = WidgetEntry::new(1).with_full_width(true);
        assert_eq!(store.add(dup), Err(DrawerError::DuplicateId(WidgetId(1))));
        assert_eq!(
            store.remove_by_id(WidgetId(9)),
            Err(DrawerError::NotFound(WidgetId(9)))
        );
        assert!(store.remove_by_id(WidgetId::HEADER).is_err());
        assert!(store.remove_at(0).is_err());
        assert!(store.remove_at(3).is_err());
        assert_eq!(
            store.set_full_width(WidgetId(9), true),
            Err(DrawerError::NotFound(WidgetId(9)))
        );

        assert_eq!(store.entries(), before);
        assert_eq!(store.len(), 3);
        assert!(emitted.lock().is_empty());
    }

    #[test]
    fn test_header_id_cannot_be_added() {
        let store = store();
        assert_eq!(
            store.add(WidgetEntry::new(WidgetId::HEADER)),
            Err(DrawerError::DuplicateId(WidgetId::HEADER))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_all_reports_per_item_without_rollback() {
        let store = store();
        let results = store.add_all([
            WidgetEntry::new(1),
            WidgetEntry::new(2),
            WidgetEntry::new(1),
            WidgetEntry::new(3),
        ]);

        assert_eq!(
            results,
            vec![
                Ok(1),
                Ok(2),
                Err(DrawerError::DuplicateId(WidgetId(1))),
                Ok(3)
            ]
        );
        assert_eq!(
            ids(&store),
            vec![WidgetId::HEADER, WidgetId(1), WidgetId(2), WidgetId(3)]
        );
    }

    #[test]
    fn test_remove_by_id_emits_previous_index() {
        let store = store();
        store.add_all([WidgetEntry::new(1), WidgetEntry::new(2), WidgetEntry::new(3)]);
        let removed = Arc::new(Mutex::new(Vec::new()));

        let recv = removed.clone();
        store.signals().removed.connect(move |&(index, id)| {
            recv.lock().push((index, id));
        });

        assert_eq!(store.remove_by_id(WidgetId(2)).map(|e| e.id), Ok(WidgetId(2)));
        assert_eq!(*removed.lock(), vec![(2, WidgetId(2))]);
        // Ids stay put while indices shift.
        assert_eq!(store.index_of(WidgetId(3)), Some(2));
    }

    #[test]
    fn test_remove_missing_and_header() {
        let store = store();
        store.add(WidgetEntry::new(5)).unwrap();

        assert_eq!(store.remove_by_id(WidgetId(9)), Err(DrawerError::NotFound(WidgetId(9))));
        assert!(matches!(
            store.remove_by_id(WidgetId::HEADER),
            Err(DrawerError::InvalidOperation(_))
        ));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_at_bounds() {
        let store = store();
        store.add_all([WidgetEntry::new(1), WidgetEntry::new(2)]);

        assert_eq!(
            store.remove_at(0),
            Err(DrawerError::IndexOutOfRange { index: 0, len: 3 })
        );
        assert_eq!(
            store.remove_at(3),
            Err(DrawerError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(store.remove_at(1).map(|e| e.id), Ok(WidgetId(1)));
        assert_eq!(ids(&store), vec![WidgetId::HEADER, WidgetId(2)]);
    }

    #[test]
    fn test_size_and_span_updates_emit_changed_once() {
        let store = store();
        store.add_all([WidgetEntry::new(1), WidgetEntry::new(2)]);
        let changed = Arc::new(Mutex::new(Vec::new()));

        let recv = changed.clone();
        store.signals().changed.connect(move |&(index, id)| {
            recv.lock().push((index, id));
        });

        let zero = SizeOffset::new(0).unwrap();
        assert_eq!(store.set_size_offset(WidgetId(2), zero), Ok(true));
        assert_eq!(store.set_size_offset(WidgetId(2), zero), Ok(false));
        assert_eq!(store.set_full_width(WidgetId(1), true), Ok(true));
        assert_eq!(store.grow(WidgetId(2)), Ok(true));

        assert_eq!(store.entry(WidgetId(2)).map(|e| e.size_offset.get()), Some(1));
        assert_eq!(
            *changed.lock(),
            vec![(2, WidgetId(2)), (1, WidgetId(1)), (2, WidgetId(2))]
        );
    }

    #[test]
    fn test_shrink_saturates_at_minimum() {
        let store = store();
        store
            .add(WidgetEntry::new(1).with_size_offset(SizeOffset::MIN))
            .unwrap();

        assert_eq!(store.shrink(WidgetId(1)), Ok(false));
        assert!(matches!(
            store.grow(WidgetId::HEADER),
            Err(DrawerError::InvalidOperation(_))
        ));
        assert_eq!(store.grow(WidgetId(4)), Err(DrawerError::NotFound(WidgetId(4))));
    }

    #[test]
    fn test_mutation_inside_observer_is_rejected() {
        let store = Arc::new(store());
        let nested = Arc::new(Mutex::new(None));

        let store_clone = store.clone();
        let nested_clone = nested.clone();
        store.signals().inserted.connect(move |&(_, id)| {
            if id == WidgetId(1) {
                *nested_clone.lock() = Some(store_clone.add(WidgetEntry::new(2)));
            }
        });

        store.add(WidgetEntry::new(1)).unwrap();

        assert_eq!(*nested.lock(), Some(Err(DrawerError::ReentrantMutation)));
        assert_eq!(store.len(), 2);
    }
}
