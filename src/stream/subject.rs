// ============================================================================
// propflow - Subjects
// Hot multicast sources with an explicit push primitive
// ============================================================================
//
// `Emitter` is the single push primitive the rest of the crate sees.
// Different stream libraries spell it differently; an adapter wraps
// whatever its library exposes behind this trait, so callers never probe
// for a method name.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::stream::observable::{Observable, ObserverFn};
use crate::stream::subscription::Subscription;

// =============================================================================
// EMITTER
// =============================================================================

/// The push primitive: feed one value into a hot source.
pub trait Emitter<T>: 'static {
    fn emit(&self, value: T);
}

// =============================================================================
// MULTICAST INNER
// =============================================================================

struct ObserverSlot<T> {
    disposed: Rc<Cell<bool>>,
    callback: Rc<RefCell<ObserverFn<T>>>,
}

impl<T> Clone for ObserverSlot<T> {
    fn clone(&self) -> Self {
        Self {
            disposed: self.disposed.clone(),
            callback: self.callback.clone(),
        }
    }
}

/// Shared machinery behind `Subject` and `ReplaySubject`.
///
/// Delivery snapshots the observer list first and checks each slot's
/// disposed flag just before invoking it, so disposing mid-delivery stops
/// that observer immediately. Emissions pushed from inside an observer
/// callback queue up and drain in push order.
struct MulticastInner<T> {
    observers: RefCell<Vec<ObserverSlot<T>>>,
    replay: Option<ReplayBuffer<T>>,
    queue: RefCell<VecDeque<T>>,
    delivering: Cell<bool>,
}

struct ReplayBuffer<T> {
    values: RefCell<Vec<T>>,
    capacity: Option<usize>,
}

impl<T: Clone + 'static> MulticastInner<T> {
    fn new(replay: Option<ReplayBuffer<T>>) -> Rc<Self> {
        Rc::new(Self {
            observers: RefCell::new(Vec::new()),
            replay,
            queue: RefCell::new(VecDeque::new()),
            delivering: Cell::new(false),
        })
    }

    fn attach(inner: &Rc<Self>, observer: ObserverFn<T>) -> Subscription {
        let slot = ObserverSlot {
            disposed: Rc::new(Cell::new(false)),
            callback: Rc::new(RefCell::new(observer)),
        };

        // Late subscribers to a replaying source catch up synchronously
        if let Some(buffer) = &inner.replay {
            let buffered: Vec<T> = buffer.values.borrow().clone();
            for value in buffered {
                if slot.disposed.get() {
                    break;
                }
                (slot.callback.borrow_mut())(value);
            }
        }

        inner.observers.borrow_mut().push(slot.clone());

        let registry: Weak<MulticastInner<T>> = Rc::downgrade(inner);
        let flag = slot.disposed.clone();
        Subscription::new(move || {
            flag.set(true);
            if let Some(registry) = registry.upgrade() {
                registry
                    .observers
                    .borrow_mut()
                    .retain(|slot| !slot.disposed.get());
            }
        })
    }

    fn emit(&self, value: T) {
        if let Some(buffer) = &self.replay {
            let mut values = buffer.values.borrow_mut();
            values.push(value.clone());
            if let Some(capacity) = buffer.capacity {
                let excess = values.len().saturating_sub(capacity);
                if excess > 0 {
                    values.drain(..excess);
                }
            }
        }

        self.queue.borrow_mut().push_back(value);
        if self.delivering.replace(true) {
            return;
        }
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(value) = next else { break };

            let slots: Vec<ObserverSlot<T>> = self.observers.borrow().clone();
            for slot in slots {
                if slot.disposed.get() {
                    continue;
                }
                (slot.callback.borrow_mut())(value.clone());
            }
        }
        self.delivering.set(false);
    }

    fn observer_count(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|slot| !slot.disposed.get())
            .count()
    }
}

// =============================================================================
// SUBJECT
// =============================================================================

/// Hot multicast source: values pushed via `emit` reach every current
/// subscriber; late subscribers see only what comes after them.
pub struct Subject<T: 'static> {
    inner: Rc<MulticastInner<T>>,
}

impl<T: Clone + 'static> Subject<T> {
    pub fn new() -> Self {
        Self {
            inner: MulticastInner::new(None),
        }
    }

    /// The subscribable face of this subject.
    pub fn observable(&self) -> Observable<T> {
        let inner = self.inner.clone();
        Observable::new(move |observer| MulticastInner::attach(&inner, observer))
    }

    /// Push one value to all current subscribers.
    pub fn emit(&self, value: T) {
        self.inner.emit(value);
    }

    /// Number of live subscriptions, for lifecycle assertions.
    pub fn observer_count(&self) -> usize {
        self.inner.observer_count()
    }
}

impl<T: Clone + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + 'static> Emitter<T> for Subject<T> {
    fn emit(&self, value: T) {
        self.inner.emit(value);
    }
}

// =============================================================================
// REPLAY SUBJECT
// =============================================================================

/// Like `Subject`, but buffers emissions and replays them to late
/// subscribers before going live.
pub struct ReplaySubject<T: 'static> {
    inner: Rc<MulticastInner<T>>,
}

impl<T: Clone + 'static> ReplaySubject<T> {
    /// Replay every emission ever pushed.
    pub fn new() -> Self {
        Self {
            inner: MulticastInner::new(Some(ReplayBuffer {
                values: RefCell::new(Vec::new()),
                capacity: None,
            })),
        }
    }

    /// Replay at most the last `capacity` emissions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: MulticastInner::new(Some(ReplayBuffer {
                values: RefCell::new(Vec::new()),
                capacity: Some(capacity),
            })),
        }
    }

    pub fn observable(&self) -> Observable<T> {
        let inner = self.inner.clone();
        Observable::new(move |observer| MulticastInner::attach(&inner, observer))
    }

    pub fn emit(&self, value: T) {
        self.inner.emit(value);
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observer_count()
    }
}

impl<T: Clone + 'static> Default for ReplaySubject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Clone for ReplaySubject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + 'static> Emitter<T> for ReplaySubject<T> {
    fn emit(&self, value: T) {
        self.inner.emit(value);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_reaches_all_subscribers() {
        let subject = Subject::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let subs: Vec<Subscription> = (0..2)
            .map(|i| {
                let seen = seen.clone();
                subject
                    .observable()
                    .subscribe(move |v: i32| seen.borrow_mut().push((i, v)))
            })
            .collect();

        subject.emit(5);
        assert_eq!(*seen.borrow(), vec![(0, 5), (1, 5)]);

        for sub in &subs {
            sub.dispose();
        }
        assert_eq!(subject.observer_count(), 0);
    }

    #[test]
    fn disposed_subscriber_misses_later_emissions() {
        let subject = Subject::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        let sub = subject
            .observable()
            .subscribe(move |v: i32| seen_clone.borrow_mut().push(v));

        subject.emit(1);
        sub.dispose();
        subject.emit(2);

        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(subject.observer_count(), 0);
    }

    #[test]
    fn dispose_mid_delivery_stops_that_observer() {
        let subject: Subject<i32> = Subject::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        // First observer disposes the second while a delivery is underway
        let victim_sub: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let victim_clone = victim_sub.clone();

        subject.observable().subscribe(move |_| {
            if let Some(sub) = victim_clone.borrow().as_ref() {
                sub.dispose();
            }
        });

        let seen_clone = seen.clone();
        let sub = subject
            .observable()
            .subscribe(move |v| seen_clone.borrow_mut().push(v));
        *victim_sub.borrow_mut() = Some(sub);

        subject.emit(1);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn reentrant_emit_preserves_push_order() {
        let subject: Subject<i32> = Subject::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        let reentrant = subject.clone();
        subject.observable().subscribe(move |v| {
            seen_clone.borrow_mut().push(v);
            if v == 1 {
                reentrant.emit(2);
            }
        });

        subject.emit(1);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn replay_catches_up_late_subscribers() {
        let subject = ReplaySubject::new();
        subject.emit(1);
        subject.emit(2);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        subject
            .observable()
            .subscribe(move |v: i32| seen_clone.borrow_mut().push(v));

        subject.emit(3);
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn replay_capacity_bounds_the_buffer() {
        let subject = ReplaySubject::with_capacity(2);
        for v in 1..=4 {
            subject.emit(v);
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        subject
            .observable()
            .subscribe(move |v: i32| seen_clone.borrow_mut().push(v));

        assert_eq!(*seen.borrow(), vec![3, 4]);
    }
}
