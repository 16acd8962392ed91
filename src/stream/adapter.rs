// ============================================================================
// propflow - Stream Adapters
// Pluggable binding to a concrete stream implementation
// ============================================================================
//
// The connector is written against this capability trait, not against a
// stream library: construct a single-emission stream, merge streams,
// subscribe and get a dispose-able handle. Swapping reactive-library
// versions means handing a different adapter to the factory — adapters are
// passed explicitly, never stashed in process-wide state.
// ============================================================================

use crate::stream::observable::Observable;
use crate::stream::subscription::Subscription;

// =============================================================================
// SUBSCRIPTION HANDLE
// =============================================================================

/// Dispose-able handle an adapter returns from `subscribe`.
pub trait SubscriptionHandle: 'static {
    /// Synchronous, idempotent disposal.
    fn dispose(&self);

    fn is_disposed(&self) -> bool;
}

impl SubscriptionHandle for Subscription {
    fn dispose(&self) {
        Subscription::dispose(self);
    }

    fn is_disposed(&self) -> bool {
        Subscription::is_disposed(self)
    }
}

// =============================================================================
// ADAPTER
// =============================================================================

/// The capabilities the binding layer needs from a stream library.
pub trait Adapter: Clone + 'static {
    /// The library's stream handle.
    type Stream<T: Clone + 'static>: Clone + 'static;

    /// The library's subscription handle.
    type Handle: SubscriptionHandle;

    /// A stream that delivers `value` once to each subscriber.
    fn of<T: Clone + 'static>(&self, value: T) -> Self::Stream<T>;

    /// Fan several streams into one.
    fn merge<T: Clone + 'static>(&self, streams: Vec<Self::Stream<T>>) -> Self::Stream<T>;

    /// Register an observer on a stream.
    fn subscribe<T: Clone + 'static>(
        &self,
        stream: &Self::Stream<T>,
        observer: Box<dyn FnMut(T)>,
    ) -> Self::Handle;
}

// =============================================================================
// LOCAL ADAPTER
// =============================================================================

/// Default adapter over the in-crate stream core.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalAdapter;

impl Adapter for LocalAdapter {
    type Stream<T: Clone + 'static> = Observable<T>;
    type Handle = Subscription;

    fn of<T: Clone + 'static>(&self, value: T) -> Observable<T> {
        Observable::of(value)
    }

    fn merge<T: Clone + 'static>(&self, streams: Vec<Observable<T>>) -> Observable<T> {
        Observable::merge(streams)
    }

    fn subscribe<T: Clone + 'static>(
        &self,
        stream: &Observable<T>,
        observer: Box<dyn FnMut(T)>,
    ) -> Subscription {
        stream.subscribe(observer)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn local_adapter_roundtrip() {
        let adapter = LocalAdapter;
        let merged = adapter.merge(vec![adapter.of(1), adapter.of(2)]);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let handle = adapter.subscribe(&merged, Box::new(move |v| seen_clone.borrow_mut().push(v)));

        assert_eq!(*seen.borrow(), vec![1, 2]);
        handle.dispose();
        assert!(SubscriptionHandle::is_disposed(&handle));
    }
}
