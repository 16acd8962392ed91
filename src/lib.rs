// ============================================================================
// propflow - Reactive Property Binding
// ============================================================================
//
// Bind a stream of property patches to a rendered component: resolve a
// selector against the component's incoming properties, subscribe on
// mount, merge each emission into render state in order, re-render, and
// dispose on unmount. Incoming-property changes re-derive the stream,
// debounced onto the next scheduler tick unless disabled.
//
// Two factory surfaces are exported: `connect` (the wrapper) and
// `map_action_creators` (turn subjects into callable action properties).
// Everything is single-threaded and event-driven; hosts advance deferred
// work explicitly with `tick()`.
// ============================================================================

pub mod actions;
pub mod connect;
pub mod core;
pub mod macros;
pub mod scheduling;
pub mod stream;

// Re-export the API surface at the crate root
pub use crate::core::diagnostics::{BindError, CaptureSink, DiagnosticSink, NullSink, TracingSink};
pub use crate::core::types::{
    ActionArgs, ActionFn, CHILDREN, Mutation, PropMap, PropValue, UpdateFn,
};

pub use crate::stream::adapter::{Adapter, LocalAdapter, SubscriptionHandle};
pub use crate::stream::observable::{Observable, ObserverFn};
pub use crate::stream::subject::{Emitter, ReplaySubject, Subject};
pub use crate::stream::subscription::Subscription;

pub use crate::connect::selector::{DeriveFn, LazyStreams, Selector, SelectorResult};
pub use crate::connect::{
    ConnectOptions, Connected, Connector, FnComponent, Render, component, connect, connect_with,
};

pub use crate::actions::{
    ACTION_MARKER, ActionEntry, ActionMap, map_action_creators, map_action_creators_with,
};

pub use crate::scheduling::{TaskHandle, pending_tasks, schedule, tick};

// =============================================================================
// TESTS
// =============================================================================
