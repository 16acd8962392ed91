// ============================================================================
// propflow - Connected Lifecycle
// Subscribe on mount, merge emissions, dispose on unmount
// ============================================================================
//
// The wrapper owns at most one live subscription at a time. Every
// (re-)resolution disposes the previous subscription before subscribing,
// and tags the new one with a generation number; emission handlers hold a
// weak reference plus their generation, so a superseded or unmounted
// subscription can never mutate render state — even if the backing
// adapter delivers a value it had already queued.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::connect::selector::{Selector, resolve};
use crate::connect::state::{RenderState, evaluate};
use crate::connect::{ConnectOptions, Render};
use crate::core::diagnostics::DiagnosticSink;
use crate::core::types::{Mutation, PropMap};
use crate::scheduling::{self, TaskHandle};
use crate::stream::adapter::{Adapter, LocalAdapter, SubscriptionHandle};

// =============================================================================
// CONNECTED INNER
// =============================================================================

struct ConnectedInner<C: Render, A: Adapter> {
    adapter: A,
    selector: Selector<A>,
    options: ConnectOptions,
    sink: Rc<dyn DiagnosticSink>,
    component: C,

    state: RefCell<RenderState>,
    subscription: RefCell<Option<A::Handle>>,
    pending: RefCell<Option<TaskHandle>>,
    mounted: Cell<bool>,

    /// Identifies the current subscription; stale deliveries are dropped.
    generation: Cell<u64>,

    /// Bumped on every applied mutation.
    render_version: Cell<u64>,

    /// Host hook invoked with the fresh render properties after each
    /// applied mutation.
    rerender: RefCell<Option<Rc<dyn Fn(&PropMap)>>>,
}

impl<C: Render, A: Adapter> ConnectedInner<C, A> {
    fn dispose_subscription(inner: &Rc<Self>) {
        if let Some(handle) = inner.subscription.borrow_mut().take() {
            handle.dispose();
        }
    }

    fn cancel_pending(inner: &Rc<Self>) {
        if let Some(pending) = inner.pending.borrow_mut().take() {
            pending.cancel();
        }
    }

    /// One resolution cycle: dispose, resolve against the current
    /// incoming properties, subscribe. Dispose-then-create, so there is
    /// never a window with two live subscriptions.
    fn resolve_and_subscribe(inner: &Rc<Self>) {
        Self::dispose_subscription(inner);

        let generation = inner.generation.get() + 1;
        inner.generation.set(generation);

        let incoming = inner.state.borrow().incoming().clone();
        match resolve(&inner.adapter, &inner.selector, &incoming) {
            Ok(stream) => {
                let weak = Rc::downgrade(inner);
                let handle = inner.adapter.subscribe(
                    &stream,
                    Box::new(move |mutation| {
                        if let Some(inner) = weak.upgrade() {
                            Self::handle_emission(&inner, generation, mutation);
                        }
                    }),
                );

                // An emission handler may have re-entered and started a
                // newer cycle while we were subscribing; if so, this
                // handle is already stale and must not replace the newer
                // one.
                if inner.generation.get() == generation {
                    *inner.subscription.borrow_mut() = Some(handle);
                } else {
                    handle.dispose();
                }
            }
            Err(error) => {
                inner.sink.report(&error);
            }
        }
    }

    fn handle_emission(inner: &Rc<Self>, generation: u64, mutation: Mutation) {
        if !inner.mounted.get() || inner.generation.get() != generation {
            return;
        }

        let previous = inner.state.borrow().overlay().clone();
        match evaluate(&previous, mutation) {
            Ok(patch) => {
                inner.state.borrow_mut().merge(patch);
                inner.render_version.set(inner.render_version.get() + 1);

                let hook = inner.rerender.borrow().clone();
                if let Some(hook) = hook {
                    let props = inner.state.borrow().render_props();
                    hook(&props);
                }
            }
            Err(error) => {
                inner.sink.report(&error);
            }
        }
    }

    fn mount(inner: &Rc<Self>, incoming: PropMap) {
        inner.state.borrow_mut().reset(incoming);
        inner.mounted.set(true);
        tracing::debug!(generation = inner.generation.get() + 1, "mounting connected component");
        Self::resolve_and_subscribe(inner);
    }

    fn update(inner: &Rc<Self>, incoming: PropMap) {
        inner.state.borrow_mut().set_incoming(incoming);
        if !inner.mounted.get() {
            return;
        }

        if inner.options.no_debounce {
            Self::resolve_and_subscribe(inner);
            return;
        }

        // Coalesce bursts: only the last scheduled resolution survives,
        // and it reads whatever incoming properties are current when the
        // tick fires.
        Self::cancel_pending(inner);
        let weak = Rc::downgrade(inner);
        let handle = scheduling::schedule(move || {
            if let Some(inner) = weak.upgrade() {
                inner.pending.borrow_mut().take();
                if inner.mounted.get() {
                    Self::resolve_and_subscribe(&inner);
                }
            }
        });
        *inner.pending.borrow_mut() = Some(handle);
    }

    fn unmount(inner: &Rc<Self>) {
        inner.mounted.set(false);
        // Invalidate in-flight deliveries before touching the handle
        inner.generation.set(inner.generation.get() + 1);
        Self::cancel_pending(inner);
        Self::dispose_subscription(inner);
        tracing::debug!("unmounted connected component");
    }
}

// =============================================================================
// CONNECTED
// =============================================================================

/// A component wrapped by a connector.
///
/// The host drives the lifecycle: `mount` with the initial incoming
/// properties, `update` on every incoming-property change, `unmount` when
/// the component leaves the tree, and `render` whenever it wants output.
/// Dropping the last handle unmounts, so a forgotten `unmount` cannot
/// leak a live subscription.
pub struct Connected<C: Render, A: Adapter = LocalAdapter> {
    inner: Rc<ConnectedInner<C, A>>,
}

impl<C: Render, A: Adapter> Connected<C, A> {
    pub(crate) fn new(
        adapter: A,
        selector: Selector<A>,
        options: ConnectOptions,
        sink: Rc<dyn DiagnosticSink>,
        component: C,
    ) -> Self {
        Self {
            inner: Rc::new(ConnectedInner {
                adapter,
                selector,
                options,
                sink,
                component,
                state: RefCell::new(RenderState::new()),
                subscription: RefCell::new(None),
                pending: RefCell::new(None),
                mounted: Cell::new(false),
                generation: Cell::new(0),
                render_version: Cell::new(0),
                rerender: RefCell::new(None),
            }),
        }
    }

    /// Enter the tree with the given incoming properties.
    pub fn mount(&self, incoming: PropMap) {
        ConnectedInner::mount(&self.inner, incoming);
    }

    /// Incoming properties changed.
    pub fn update(&self, incoming: PropMap) {
        ConnectedInner::update(&self.inner, incoming);
    }

    /// Leave the tree; the subscription is disposed and no further
    /// emission mutates render state.
    pub fn unmount(&self) {
        ConnectedInner::unmount(&self.inner);
    }

    /// Render the wrapped component with the current merged properties.
    pub fn render(&self) -> C::Output {
        let props = self.inner.state.borrow().render_props();
        self.inner.component.render(&props)
    }

    /// Snapshot of the properties the component would render with.
    pub fn props(&self) -> PropMap {
        self.inner.state.borrow().render_props()
    }

    /// Monotonic counter of applied mutations; unchanged renders keep
    /// their version.
    pub fn render_version(&self) -> u64 {
        self.inner.render_version.get()
    }

    /// Whether a live (undisposed) subscription exists right now.
    pub fn is_subscribed(&self) -> bool {
        self.inner
            .subscription
            .borrow()
            .as_ref()
            .is_some_and(|handle| !handle.is_disposed())
    }

    /// Register the host's re-render request hook, replacing any
    /// previous one. The hook receives the properties the component
    /// should re-render with; capture nothing strong here or the wrapper
    /// will never drop.
    pub fn on_rerender(&self, hook: impl Fn(&PropMap) + 'static) {
        *self.inner.rerender.borrow_mut() = Some(Rc::new(hook));
    }

    /// The wrapped component.
    pub fn component(&self) -> &C {
        &self.inner.component
    }
}

impl<C: Render, A: Adapter> Clone for Connected<C, A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: Render, A: Adapter> Drop for Connected<C, A> {
    fn drop(&mut self) {
        // Last handle gone: emission handlers and scheduled tasks hold
        // only weak references, so unmount now or never.
        if Rc::strong_count(&self.inner) == 1 && self.inner.mounted.get() {
            ConnectedInner::unmount(&self.inner);
        }
    }
}
