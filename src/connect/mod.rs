// ============================================================================
// propflow - Connect Module
// The connector factory and the component seam
// ============================================================================
//
// `connect(selector)` builds a connector; `Connector::wrap` applies it to
// a component, yielding the connected wrapper whose lifecycle the host
// drives. The component seam is one method: render with a property map.
// ============================================================================

use std::marker::PhantomData;
use std::rc::Rc;

use crate::core::diagnostics::{DiagnosticSink, TracingSink};
use crate::core::types::PropMap;
use crate::stream::adapter::{Adapter, LocalAdapter};

pub mod lifecycle;
pub mod selector;
pub mod state;

pub use lifecycle::Connected;
pub use selector::{Selector, SelectorResult};

// =============================================================================
// RENDER
// =============================================================================

/// The component contract the wrapper binds to.
///
/// The wrapper hands over the merged properties and does not filter them;
/// a component simply ignores properties it has no interest in.
pub trait Render: 'static {
    type Output;

    fn render(&self, props: &PropMap) -> Self::Output;
}

/// A function component: render is a plain closure over the props.
pub struct FnComponent<O, F: Fn(&PropMap) -> O> {
    render: F,
    _output: PhantomData<fn() -> O>,
}

impl<O: 'static, F: Fn(&PropMap) -> O + 'static> Render for FnComponent<O, F> {
    type Output = O;

    fn render(&self, props: &PropMap) -> O {
        (self.render)(props)
    }
}

/// Wrap a closure as a component.
pub fn component<O: 'static, F: Fn(&PropMap) -> O + 'static>(render: F) -> FnComponent<O, F> {
    FnComponent {
        render,
        _output: PhantomData,
    }
}

// =============================================================================
// CONNECT OPTIONS
// =============================================================================

/// Connector configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// When false (the default), incoming-property changes coalesce onto
    /// the next scheduler tick before the stream is re-derived; when
    /// true, every change re-derives immediately.
    pub no_debounce: bool,
}

// =============================================================================
// CONNECTOR
// =============================================================================

/// A configured binding, reusable across any number of components.
pub struct Connector<A: Adapter = LocalAdapter> {
    adapter: A,
    selector: Selector<A>,
    options: ConnectOptions,
    sink: Rc<dyn DiagnosticSink>,
}

impl<A: Adapter> Connector<A> {
    /// Replace the options wholesale.
    pub fn options(mut self, options: ConnectOptions) -> Self {
        self.options = options;
        self
    }

    /// Re-derive immediately on every incoming-property change.
    pub fn no_debounce(mut self) -> Self {
        self.options.no_debounce = true;
        self
    }

    /// Route diagnostics somewhere other than the default tracing sink.
    pub fn sink(mut self, sink: impl DiagnosticSink) -> Self {
        self.sink = Rc::new(sink);
        self
    }

    /// Apply the connector to a component.
    pub fn wrap<C: Render>(&self, component: C) -> Connected<C, A> {
        Connected::new(
            self.adapter.clone(),
            self.selector.clone(),
            self.options,
            self.sink.clone(),
            component,
        )
    }
}

impl<A: Adapter> Clone for Connector<A> {
    fn clone(&self) -> Self {
        Self {
            adapter: self.adapter.clone(),
            selector: self.selector.clone(),
            options: self.options,
            sink: self.sink.clone(),
        }
    }
}

// =============================================================================
// FACTORIES
// =============================================================================

/// Build a connector over the default adapter.
pub fn connect(selector: Selector<LocalAdapter>) -> Connector<LocalAdapter> {
    connect_with(LocalAdapter, selector)
}

/// Build a connector over an explicit adapter.
pub fn connect_with<A: Adapter>(adapter: A, selector: Selector<A>) -> Connector<A> {
    Connector {
        adapter,
        selector,
        options: ConnectOptions::default(),
        sink: Rc::new(TracingSink),
    }
}
