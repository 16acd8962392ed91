// ============================================================================
// propflow - Subscriptions
// Dispose-able handles to active stream registrations
// ============================================================================
//
// Disposal is synchronous and idempotent. Sources share the handle's
// disposed flag with their observer bookkeeping, so a handler whose
// subscription was disposed is never invoked again — even for a delivery
// that was already in flight when dispose ran.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Handle to one active stream registration.
///
/// Cloning shares the registration: disposing any clone disposes them all.
#[derive(Clone)]
pub struct Subscription {
    disposed: Rc<Cell<bool>>,
    teardown: Rc<RefCell<Option<Box<dyn FnOnce()>>>>,
}

impl Subscription {
    /// Create a subscription with a teardown that runs once on dispose.
    pub(crate) fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            disposed: Rc::new(Cell::new(false)),
            teardown: Rc::new(RefCell::new(Some(Box::new(teardown)))),
        }
    }

    /// A subscription with nothing to tear down (finished sources).
    pub fn empty() -> Self {
        Self {
            disposed: Rc::new(Cell::new(false)),
            teardown: Rc::new(RefCell::new(None)),
        }
    }

    /// Bundle several subscriptions into one: disposing the bundle
    /// disposes every member.
    pub fn join(members: Vec<Subscription>) -> Self {
        Subscription::new(move || {
            for member in &members {
                member.dispose();
            }
        })
    }

    /// Dispose synchronously. Safe to call more than once.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        if let Some(teardown) = self.teardown.borrow_mut().take() {
            teardown();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

// =============================================================================
// TESTS
// =============================================================================
