//! Reactive properties with change notification.
//!
//! - **Property<T>**: A value cell with change detection
//! - **ObservableProperty<T>**: A property paired with a change signal, whose
//!   subscribers can ask for the current value to be replayed on connect
//!
//! # Example
//!
//! ```
//! use widget_drawer_core::ObservableProperty;
//!
//! let editing = ObservableProperty::new(false);
//! editing.subscribe(true, |value| println!("editing = {}", value));
//! editing.set(true);
//! ```

use std::fmt;

use parking_lot::RwLock;

use crate::signal::{ConnectionId, Signal};

/// A value cell that tracks changes.
///
/// When `set()` is called, it compares the new value with the current one and
/// returns whether the value actually changed.
///
/// ```
/// use widget_drawer_core::Property;
///
/// let prop = Property::new(42);
/// assert!(!prop.set(42));
/// assert!(prop.set(100));
/// assert_eq!(prop.get(), 100);
/// ```
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        self.replace(value).is_some()
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

/// A property that broadcasts its new value whenever it changes.
///
/// Notifications carry only the latest value; observers re-derive whatever
/// they display from it. A subscriber may request the current value
/// immediately on connect (`replay = true`), so it never has to special-case
/// "no change has happened yet".
pub struct ObservableProperty<T> {
    value: Property<T>,
    changed: Signal<T>,
}

impl<T: Clone + PartialEq + Send + 'static> ObservableProperty<T> {
    /// Create an observable property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: Property::new(value),
            changed: Signal::new(),
        }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.get()
    }

    /// Set the value and emit the change signal if it changed.
    ///
    /// Returns `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        if self.value.set(value.clone()) {
            self.changed.emit(value);
            true
        } else {
            false
        }
    }

    /// Set the value without emitting, returning `true` if it changed.
    ///
    /// Pair with [`notify`](Self::notify) when several properties must all be
    /// updated before any observer runs.
    pub fn set_silent(&self, value: T) -> bool {
        self.value.set(value)
    }

    /// Emit the current value to all subscribers.
    pub fn notify(&self) {
        self.changed.emit(self.value.get());
    }

    /// Subscribe to changes, optionally replaying the current value first.
    pub fn subscribe<F>(&self, replay: bool, slot: F) -> ConnectionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        if replay {
            slot(&self.value.get());
        }
        self.changed.connect(slot)
    }

    /// The underlying change signal.
    pub fn changed(&self) -> &Signal<T> {
        &self.changed
    }
}

impl<T: Clone + PartialEq + Send + Default + 'static> Default for ObservableProperty<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for ObservableProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableProperty")
            .field("value", &self.value.get())
            .finish_non_exhaustive()
    }
}
