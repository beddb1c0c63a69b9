//! End-to-end tests for a drawer session.

use std::sync::Arc;

use parking_lot::Mutex;
use widget_drawer::{
    DrawerConfig, DrawerError, SizeOffset, Slot, ViewKind, WidgetDrawer, WidgetEntry, WidgetHost,
    WidgetId, SIZE_STEP,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("widget_drawer=trace")
        .with_test_writer()
        .try_init();
}

struct Host;

impl WidgetHost for Host {
    type View = WidgetId;

    fn create_view(&self, id: WidgetId) -> WidgetId {
        id
    }

    fn natural_height(&self, _id: WidgetId) -> i32 {
        100
    }
}

fn drawer() -> Arc<WidgetDrawer<Host>> {
    init_tracing();
    Arc::new(WidgetDrawer::new(Host))
}

fn slot_ids(drawer: &WidgetDrawer<Host>) -> Vec<WidgetId> {
    let presenter = drawer.presenter();
    (0..presenter.item_count())
        .filter_map(|index| presenter.id_at(index))
        .collect()
}

#[test]
fn add_then_remove_twice() {
    let drawer = drawer();

    drawer
        .add(WidgetEntry::new(5).with_size_offset(SizeOffset::DEFAULT))
        .unwrap();
    assert_eq!(drawer.presenter().item_count(), 2);

    drawer.remove_by_id(WidgetId(5)).unwrap();
    assert_eq!(drawer.presenter().item_count(), 1);

    assert_eq!(
        drawer.remove_by_id(WidgetId(5)),
        Err(DrawerError::NotFound(WidgetId(5)))
    );
    assert_eq!(drawer.presenter().item_count(), 1);
}

#[test]
fn edit_mode_exit_clears_selection_for_good() {
    let drawer = drawer();

    drawer.set_editing(true);
    drawer.select(WidgetId(5));
    assert_eq!(drawer.selected_id(), Some(WidgetId(5)));

    drawer.set_editing(false);
    assert_eq!(drawer.selected_id(), None);

    drawer.set_editing(true);
    assert_eq!(drawer.selected_id(), None);
}

#[test]
fn header_is_never_removed() {
    let drawer = drawer();
    drawer.add_all([WidgetEntry::new(1), WidgetEntry::new(2)]);

    assert!(matches!(
        drawer.remove_by_id(WidgetId::HEADER),
        Err(DrawerError::InvalidOperation(_))
    ));
    assert!(matches!(
        drawer.remove_at(0),
        Err(DrawerError::IndexOutOfRange { index: 0, .. })
    ));
    assert_eq!(drawer.presenter().item_count(), 3);
    assert_eq!(drawer.presenter().view_kind_at(0), Some(ViewKind::Header));
}

#[test]
fn mixed_mutations_keep_header_first_and_ids_unique() {
    let drawer = drawer();
    let mut expected: Vec<i32> = Vec::new();

    // Deterministic interleaving of adds and removals, including collisions.
    for step in 0..60 {
        let id = (step * 7) % 23;
        if step % 3 == 2 {
            let result = drawer.remove_by_id(WidgetId(id));
            match expected.iter().position(|&e| e == id) {
                Some(pos) => {
                    expected.remove(pos);
                    assert!(result.is_ok());
                }
                None => assert_eq!(result, Err(DrawerError::NotFound(WidgetId(id)))),
            }
        } else {
            let result = drawer.add(WidgetEntry::new(id));
            if expected.contains(&id) {
                assert_eq!(result, Err(DrawerError::DuplicateId(WidgetId(id))));
            } else {
                expected.push(id);
                assert_eq!(result, Ok(expected.len()));
            }
        }

        let ids = slot_ids(&drawer);
        assert_eq!(ids[0], WidgetId::HEADER);
        let widgets: Vec<i32> = ids[1..].iter().map(|id| id.0).collect();
        assert_eq!(widgets, expected);
    }

    assert!(drawer
        .store()
        .entries()
        .iter()
        .all(|entry| !entry.id.is_header()));
    assert_eq!(drawer.store().get(0), Some(Slot::Header));
}

#[test]
fn stale_selection_surfaces_after_entering_edit_mode() {
    let drawer = drawer();
    drawer.add(WidgetEntry::new(3)).unwrap();

    drawer.select(WidgetId(3));
    let outside = drawer.presenter().presentation_at(1).unwrap();
    assert!(!outside.selection_visible);

    drawer.set_editing(true);
    let inside = drawer.presenter().presentation_at(1).unwrap();
    assert!(inside.selection_visible);
    assert!(inside.is_selected);
    assert_eq!(drawer.selected_entry().map(|e| e.id), Some(WidgetId(3)));
}

#[test]
fn selecting_a_removed_entry_matches_nothing() {
    let drawer = drawer();
    drawer.add_all([WidgetEntry::new(1), WidgetEntry::new(2)]);
    drawer.set_editing(true);
    drawer.select(WidgetId(1));

    drawer.remove_by_id(WidgetId(1)).unwrap();

    assert_eq!(drawer.selected_id(), Some(WidgetId(1)));
    assert_eq!(drawer.selected_entry(), None);
    assert!(!drawer.presenter().presentation_at(1).unwrap().is_selected);
}

#[test]
fn resizing_changes_rendered_height() {
    let drawer = drawer();
    drawer.add(WidgetEntry::new(4)).unwrap();

    let height = |d: &WidgetDrawer<Host>| {
        d.presenter().presentation_at(1).unwrap().rendered_height
    };
    assert_eq!(height(&*drawer), Some(100));

    drawer.set_size_offset(WidgetId(4), SizeOffset::MIN).unwrap();
    assert_eq!(height(&*drawer), Some(100 - 4 * SIZE_STEP));

    drawer.store().grow(WidgetId(4)).unwrap();
    assert_eq!(height(&*drawer), Some(100 - 3 * SIZE_STEP));
}

#[test]
fn observer_mutations_are_rejected_or_deferred() {
    let drawer = drawer();
    let outcomes = Arc::new(Mutex::new(Vec::new()));

    let weak = Arc::downgrade(&drawer);
    let recv = outcomes.clone();
    drawer
        .presenter()
        .signals()
        .item_inserted
        .connect(move |&(_, id)| {
            let Some(drawer) = weak.upgrade() else {
                return;
            };
            if id != WidgetId(1) {
                return;
            }
            let outcome = drawer.add(WidgetEntry::new(100));
            recv.lock().push(outcome);

            let weak_inner = Arc::downgrade(&drawer);
            let recv_inner = recv.clone();
            drawer.defer(move || {
                if let Some(drawer) = weak_inner.upgrade() {
                    let outcome = drawer.add(WidgetEntry::new(2));
                    recv_inner.lock().push(outcome);
                }
            });
        });

    drawer.add(WidgetEntry::new(1)).unwrap();

    assert_eq!(
        *outcomes.lock(),
        vec![Err(DrawerError::ReentrantMutation), Ok(2)]
    );
    assert_eq!(
        slot_ids(&drawer),
        vec![WidgetId::HEADER, WidgetId(1), WidgetId(2)]
    );
}

#[test]
fn display_surface_sees_narrow_updates() {
    init_tracing();
    let drawer = WidgetDrawer::with_config(Host, DrawerConfig::new().with_column_count(4));
    drawer.add_all([
        WidgetEntry::new(1),
        WidgetEntry::new(2).with_full_width(true),
        WidgetEntry::new(3),
    ]);

    let presenter = drawer.presenter();
    for index in 1..presenter.item_count() {
        let item = presenter.bind(index).unwrap();
        assert_eq!(presenter.create_view(index), Ok(item.id));
    }
    assert_eq!(presenter.presentation_at(2).unwrap().span_columns, 4);

    let log = Arc::new(Mutex::new(Vec::new()));
    let recv = log.clone();
    presenter
        .signals()
        .selection_check_changed
        .connect(move |&(index, _, checked)| recv.lock().push(format!("check {index} {checked}")));
    let recv = log.clone();
    presenter
        .signals()
        .selection_visibility_changed
        .connect(move |&(index, _, visible)| recv.lock().push(format!("show {index} {visible}")));

    drawer.set_editing(true);
    assert!(presenter.tap(2));
    drawer.set_editing(false);

    assert_eq!(
        *log.lock(),
        vec![
            "show 1 true",
            "show 2 true",
            "show 3 true",
            "check 2 true",
            "check 2 false",
            "show 1 false",
            "show 2 false",
            "show 3 false",
        ]
    );
}

#[test]
fn ending_the_session_releases_subscriptions() {
    init_tracing();
    let drawer = WidgetDrawer::new(Host);
    let store = drawer.store().clone();
    let selection = drawer.selection().clone();
    let presenter = drawer.presenter().clone();
    presenter.signals().item_removed.connect(|_| {});
    assert_eq!(store.signals().inserted.connection_count(), 1);

    drop(drawer);

    assert_eq!(store.signals().inserted.connection_count(), 0);
    assert_eq!(selection.selection_changed().connection_count(), 0);
    assert_eq!(presenter.signals().item_removed.connection_count(), 0);
}

#[test]
fn replayed_subscription_sees_current_state() {
    let drawer = drawer();
    drawer.set_editing(true);
    drawer.select(WidgetId(9));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let recv = seen.clone();
    drawer
        .presenter()
        .subscribe_selection(move |&selected| recv.lock().push(selected));
    drawer.set_editing(false);

    assert_eq!(*seen.lock(), vec![Some(WidgetId(9)), None]);
}

#[test]
fn selection_made_from_an_observer_reaches_later_observers_in_order() {
    let drawer = drawer();
    drawer.add_all([WidgetEntry::new(1), WidgetEntry::new(2)]);
    drawer.set_editing(true);

    let weak = Arc::downgrade(&drawer);
    drawer.selection().selection_changed().connect(move |&selected| {
        if selected != Some(WidgetId(1)) {
            return;
        }
        if let Some(drawer) = weak.upgrade() {
            drawer.select(WidgetId(2));
        }
    });

    let seen = Arc::new(Mutex::new(Vec::new()));
    let recv = seen.clone();
    drawer
        .selection()
        .subscribe_selection(false, move |&selected| recv.lock().push(selected));

    drawer.select(WidgetId(1));

    assert_eq!(*seen.lock(), vec![Some(WidgetId(1)), Some(WidgetId(2))]);
    assert_eq!(seen.lock().last().copied().flatten(), drawer.selected_id());
    assert_eq!(drawer.selected_id(), Some(WidgetId(2)));
    assert!(drawer.presenter().presentation_at(2).unwrap().is_selected);
    assert!(!drawer.presenter().presentation_at(1).unwrap().is_selected);
}
