// ============================================================================
// propflow - Selectors
// What a connector binds to, and how it resolves to one stream
// ============================================================================
//
// A selector is configuration, so bad configuration has to be
// representable: the `Invalid` arms stand in for the "neither a stream
// nor a function" and "function returned garbage" cases, carrying a shape
// name for the diagnostic. Resolution happens once per cycle (mount, and
// each re-derivation after incoming properties change).
// ============================================================================

use std::rc::Rc;

use crate::core::diagnostics::BindError;
use crate::core::types::{Mutation, PropMap};
use crate::stream::adapter::{Adapter, LocalAdapter};

// =============================================================================
// TYPE ALIASES
// =============================================================================

/// A function selector: derives a result from the current incoming
/// properties, once per resolution cycle.
pub type DeriveFn<A> = Rc<dyn Fn(&PropMap) -> SelectorResult<A>>;

/// Lazily-produced streams from a generator-style selector result.
pub type LazyStreams<A> = Box<dyn Iterator<Item = <A as Adapter>::Stream<Mutation>>>;

// =============================================================================
// SELECTOR
// =============================================================================

/// The data source a connector is configured with.
pub enum Selector<A: Adapter = LocalAdapter> {
    /// A ready-made stream of mutations.
    Stream(A::Stream<Mutation>),

    /// A function of the current incoming properties.
    Derive(DeriveFn<A>),

    /// A value that is neither; resolution reports a `SelectorTypeError`.
    Invalid(String),
}

impl<A: Adapter> Selector<A> {
    pub fn stream(stream: A::Stream<Mutation>) -> Self {
        Selector::Stream(stream)
    }

    pub fn derive(f: impl Fn(&PropMap) -> SelectorResult<A> + 'static) -> Self {
        Selector::Derive(Rc::new(f))
    }

    pub fn invalid(shape: impl Into<String>) -> Self {
        Selector::Invalid(shape.into())
    }

    /// A missing selector (nothing was configured).
    pub fn none() -> Self {
        Selector::Invalid("nothing".to_string())
    }
}

impl<A: Adapter> Clone for Selector<A> {
    fn clone(&self) -> Self {
        match self {
            Selector::Stream(stream) => Selector::Stream(stream.clone()),
            Selector::Derive(f) => Selector::Derive(f.clone()),
            Selector::Invalid(shape) => Selector::Invalid(shape.clone()),
        }
    }
}

// =============================================================================
// SELECTOR RESULT
// =============================================================================

/// What a function selector handed back.
pub enum SelectorResult<A: Adapter = LocalAdapter> {
    /// A single stream.
    Stream(A::Stream<Mutation>),

    /// Several streams; emissions from any member are processed
    /// individually.
    Many(Vec<A::Stream<Mutation>>),

    /// Streams produced lazily, generator style.
    Lazy(LazyStreams<A>),

    /// Anything else; resolution reports a `SelectorResultError`.
    Invalid(String),
}

impl<A: Adapter> SelectorResult<A> {
    pub fn stream(stream: A::Stream<Mutation>) -> Self {
        SelectorResult::Stream(stream)
    }

    pub fn many(streams: impl IntoIterator<Item = A::Stream<Mutation>>) -> Self {
        SelectorResult::Many(streams.into_iter().collect())
    }

    pub fn lazy(streams: impl Iterator<Item = A::Stream<Mutation>> + 'static) -> Self {
        SelectorResult::Lazy(Box::new(streams))
    }

    pub fn invalid(shape: impl Into<String>) -> Self {
        SelectorResult::Invalid(shape.into())
    }

    /// A function selector that produced nothing at all.
    pub fn none() -> Self {
        SelectorResult::Invalid("nothing".to_string())
    }
}

// =============================================================================
// RESOLUTION
// =============================================================================

/// Resolve a selector against the current incoming properties into one
/// canonical stream.
pub(crate) fn resolve<A: Adapter>(
    adapter: &A,
    selector: &Selector<A>,
    incoming: &PropMap,
) -> Result<A::Stream<Mutation>, BindError> {
    match selector {
        Selector::Stream(stream) => Ok(stream.clone()),
        Selector::Derive(derive) => match derive(incoming) {
            SelectorResult::Stream(stream) => Ok(stream),
            SelectorResult::Many(streams) => Ok(adapter.merge(streams)),
            SelectorResult::Lazy(streams) => Ok(adapter.merge(streams.collect())),
            SelectorResult::Invalid(shape) => Err(BindError::SelectorResult { shape }),
        },
        Selector::Invalid(shape) => Err(BindError::SelectorType {
            shape: shape.clone(),
        }),
    }
}

// =============================================================================
// TESTS
// =============================================================================
