//! Re-entrancy guard for notification delivery.
//!
//! Every drawer component that emits signals shares one [`NotifyScope`].
//! While a notification round is in flight, structural mutations are
//! rejected; observers that need to mutate hand a closure to
//! [`NotifyScope::defer`], which runs it once the outermost round finishes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use widget_drawer_core::logging::targets;

use crate::error::{DrawerError, Result};

type Deferred = Box<dyn FnOnce() + Send>;

/// Tracks in-flight notification rounds and queued follow-up mutations.
#[derive(Default)]
pub struct NotifyScope {
    depth: AtomicUsize,
    pending: Mutex<VecDeque<Deferred>>,
}

impl NotifyScope {
    /// Creates an idle scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while any notification round is being delivered.
    pub fn is_notifying(&self) -> bool {
        self.depth.load(Ordering::SeqCst) > 0
    }

    /// Fails with [`DrawerError::ReentrantMutation`] while notifying.
    pub fn ensure_idle(&self) -> Result<()> {
        if self.is_notifying() {
            tracing::debug!(target: targets::NOTIFY, "rejecting mutation during notification");
            Err(DrawerError::ReentrantMutation)
        } else {
            Ok(())
        }
    }

    /// Marks the start of a notification round.
    ///
    /// The round ends when the returned token is dropped. When the outermost
    /// round ends, deferred work runs in the order it was queued.
    pub fn enter(&self) -> NotifyToken<'_> {
        self.depth.fetch_add(1, Ordering::SeqCst);
        NotifyToken { scope: self }
    }

    /// Runs `f` once no notification round is in flight.
    ///
    /// If the scope is idle, `f` runs before this call returns.
    pub fn defer<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_notifying() {
            tracing::trace!(target: targets::NOTIFY, "deferring mutation");
            self.pending.lock().push_back(Box::new(f));
        } else {
            f();
        }
    }

    /// Number of deferred closures waiting to run.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    fn leave(&self) {
        if self.depth.fetch_sub(1, Ordering::SeqCst) != 1 {
            return;
        }
        // Deferred work may itself notify and defer more; drain until empty.
        loop {
            let next = self.pending.lock().pop_front();
            match next {
                Some(f) => f(),
                None => break,
            }
        }
    }
}

impl std::fmt::Debug for NotifyScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyScope")
            .field("depth", &self.depth.load(Ordering::SeqCst))
            .field("pending", &self.pending_count())
            .finish()
    }
}

/// Marks an in-flight notification round; ends it on drop.
#[must_use = "the notification round ends when the token is dropped"]
pub struct NotifyToken<'a> {
    scope: &'a NotifyScope,
}

impl Drop for NotifyToken<'_> {
    fn drop(&mut self) {
        self.scope.leave();
    }
}
