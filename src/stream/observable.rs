// ============================================================================
// propflow - Observable
// Push streams: subscribe, map, merge
// ============================================================================
//
// A deliberately small push-stream core: the binding layer only needs
// "subscribe and get a dispose-able handle", value mapping, and merging.
// There is no completion or error channel — the wrapper's diagnostics are
// a separate concern, and disposal is the only way a subscription ends.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::stream::subscription::Subscription;

// =============================================================================
// OBSERVER
// =============================================================================

/// Boxed observer callback handed to a source on subscribe.
pub type ObserverFn<T> = Box<dyn FnMut(T)>;

// =============================================================================
// OBSERVABLE
// =============================================================================

/// A cold handle onto a stream of values.
///
/// Cloning is cheap and shares the underlying source; each `subscribe`
/// registers independently.
pub struct Observable<T: 'static> {
    source: Rc<dyn Fn(ObserverFn<T>) -> Subscription>,
}

impl<T: 'static> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Build an observable from a subscribe function.
    ///
    /// The function runs once per subscription and must return the
    /// subscription handle for it.
    pub fn new(subscribe: impl Fn(ObserverFn<T>) -> Subscription + 'static) -> Self {
        Self {
            source: Rc::new(subscribe),
        }
    }

    /// One value, delivered synchronously to each subscriber.
    pub fn of(value: T) -> Self {
        Observable::new(move |mut observer| {
            observer(value.clone());
            Subscription::empty()
        })
    }

    /// A stream that never emits.
    pub fn never() -> Self {
        Observable::new(|_observer| Subscription::empty())
    }

    /// Register an observer; emissions arrive in delivery order until the
    /// returned handle is disposed.
    pub fn subscribe(&self, on_emit: impl FnMut(T) + 'static) -> Subscription {
        (self.source)(Box::new(on_emit))
    }

    /// Transform every emission.
    pub fn map<U: Clone + 'static>(&self, f: impl Fn(T) -> U + 'static) -> Observable<U> {
        let source = self.clone();
        let f = Rc::new(f);
        Observable::new(move |mut observer| {
            let f = f.clone();
            source.subscribe(move |value| observer(f(value)))
        })
    }

    /// Merge several streams into one; each member's emissions are
    /// forwarded individually, in the order they are pushed.
    pub fn merge(streams: Vec<Observable<T>>) -> Observable<T> {
        Observable::new(move |observer| {
            let shared = SharedObserver::new(observer);
            let members = streams
                .iter()
                .map(|stream| {
                    let shared = shared.clone();
                    stream.subscribe(move |value| shared.deliver(value))
                })
                .collect();
            Subscription::join(members)
        })
    }
}

// =============================================================================
// SHARED OBSERVER
// =============================================================================

/// One observer fanned in from several member subscriptions.
///
/// Deliveries are queued and drained non-recursively, so an emission
/// triggered from inside the observer callback lands after the current
/// one finishes — merges stay fully applied, in arrival order.
struct SharedObserver<T> {
    inner: Rc<SharedObserverInner<T>>,
}

struct SharedObserverInner<T> {
    observer: RefCell<ObserverFn<T>>,
    queue: RefCell<VecDeque<T>>,
    delivering: Cell<bool>,
}

impl<T> Clone for SharedObserver<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> SharedObserver<T> {
    fn new(observer: ObserverFn<T>) -> Self {
        Self {
            inner: Rc::new(SharedObserverInner {
                observer: RefCell::new(observer),
                queue: RefCell::new(VecDeque::new()),
                delivering: Cell::new(false),
            }),
        }
    }

    fn deliver(&self, value: T) {
        self.inner.queue.borrow_mut().push_back(value);
        if self.inner.delivering.replace(true) {
            return;
        }
        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            let Some(value) = next else { break };
            (self.inner.observer.borrow_mut())(value);
        }
        self.inner.delivering.set(false);
    }
}

// =============================================================================
// TESTS
// =============================================================================
