// ============================================================================
// propflow - Core Value Model
// Dynamically-shaped property values and stream emissions
// ============================================================================
//
// The wrapper moves property patches between loosely-shaped worlds (a stream
// that may emit anything, a component that reads what it knows about), so
// values are modeled as a tagged variant instead of a concrete struct.
// Every shape question ("is this a map? a function? garbage?") is answered
// by exhaustive matching, never by probing.
// ============================================================================

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

// =============================================================================
// TYPE ALIASES
// =============================================================================

/// Ordered mapping of property names to values.
///
/// Insertion-ordered so that merge results and iteration are deterministic.
pub type PropMap = IndexMap<String, PropValue>;

/// Arguments forwarded through an action callback, as one unit.
pub type ActionArgs = Vec<PropValue>;

/// An invokable action callback stored as a property value.
pub type ActionFn = Rc<dyn Fn(ActionArgs)>;

/// A functional update: computes a patch from the previous render state.
pub type UpdateFn = Rc<dyn Fn(&PropMap) -> PropMap>;

/// The passthrough property that is always forwarded to the wrapped
/// component, regardless of what the selector emits.
pub const CHILDREN: &str = "children";

// =============================================================================
// PROP VALUE
// =============================================================================

/// A property value of any shape the binding layer can carry.
///
/// `Action` holds an invokable callback (produced by the action-mapping
/// helper), `Opaque` holds host-framework payloads the wrapper never
/// inspects (children nodes, element handles). Both compare by identity;
/// the data-shaped variants compare by value.
#[derive(Clone)]
pub enum PropValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    List(Rc<Vec<PropValue>>),
    Map(Rc<PropMap>),
    Action(ActionFn),
    Opaque(Rc<dyn Any>),
}

impl PropValue {
    /// Create a string value.
    pub fn str(value: impl Into<Rc<str>>) -> Self {
        PropValue::Str(value.into())
    }

    /// Create a list value.
    pub fn list(values: impl IntoIterator<Item = PropValue>) -> Self {
        PropValue::List(Rc::new(values.into_iter().collect()))
    }

    /// Create a nested map value.
    pub fn map(map: PropMap) -> Self {
        PropValue::Map(Rc::new(map))
    }

    /// Create an action callback value.
    pub fn action(f: impl Fn(ActionArgs) + 'static) -> Self {
        PropValue::Action(Rc::new(f))
    }

    /// Wrap an arbitrary host payload.
    pub fn opaque<T: Any>(value: T) -> Self {
        PropValue::Opaque(Rc::new(value))
    }

    /// The shape name used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            PropValue::Null => "null",
            PropValue::Bool(_) => "bool",
            PropValue::Int(_) => "int",
            PropValue::Float(_) => "float",
            PropValue::Str(_) => "string",
            PropValue::List(_) => "list",
            PropValue::Map(_) => "map",
            PropValue::Action(_) => "action",
            PropValue::Opaque(_) => "opaque",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[PropValue]> {
        match self {
            PropValue::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&PropMap> {
        match self {
            PropValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_action(&self) -> Option<&ActionFn> {
        match self {
            PropValue::Action(f) => Some(f),
            _ => None,
        }
    }

    /// Downcast an opaque payload back to its concrete type.
    pub fn as_opaque<T: Any>(&self) -> Option<&T> {
        match self {
            PropValue::Opaque(value) => value.downcast_ref(),
            _ => None,
        }
    }

    /// Invoke an action value with the given arguments.
    ///
    /// Returns false (and does nothing) when the value is not an action.
    pub fn call(&self, args: ActionArgs) -> bool {
        match self {
            PropValue::Action(f) => {
                f(args);
                true
            }
            _ => false,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Null, PropValue::Null) => true,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Float(a), PropValue::Float(b)) => a == b,
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::List(a), PropValue::List(b)) => a == b,
            (PropValue::Map(a), PropValue::Map(b)) => a == b,
            // Callbacks and host payloads compare by identity
            (PropValue::Action(a), PropValue::Action(b)) => Rc::ptr_eq(a, b),
            (PropValue::Opaque(a), PropValue::Opaque(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Null => f.write_str("Null"),
            PropValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            PropValue::Int(i) => f.debug_tuple("Int").field(i).finish(),
            PropValue::Float(x) => f.debug_tuple("Float").field(x).finish(),
            PropValue::Str(s) => f.debug_tuple("Str").field(s).finish(),
            PropValue::List(values) => f.debug_tuple("List").field(values).finish(),
            PropValue::Map(map) => f.debug_tuple("Map").field(map).finish(),
            PropValue::Action(_) => f.write_str("Action(..)"),
            PropValue::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Int(value as i64)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(Rc::from(value))
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(Rc::from(value.as_str()))
    }
}

impl From<Vec<PropValue>> for PropValue {
    fn from(values: Vec<PropValue>) -> Self {
        PropValue::List(Rc::new(values))
    }
}

impl From<PropMap> for PropValue {
    fn from(map: PropMap) -> Self {
        PropValue::Map(Rc::new(map))
    }
}

// =============================================================================
// MUTATION
// =============================================================================

/// One emission from a connected stream.
///
/// A `Patch` is merged shallowly into the render state; an `Update` is
/// invoked with the previous state and its result merged. `Invalid`
/// carries an emission of any other shape so the merge step can report it
/// through the diagnostics channel instead of panicking mid-render.
#[derive(Clone)]
pub enum Mutation {
    Patch(PropMap),
    Update(UpdateFn),
    Invalid(PropValue),
}

impl Mutation {
    /// Create a patch mutation.
    pub fn patch(map: PropMap) -> Self {
        Mutation::Patch(map)
    }

    /// Create a functional update mutation.
    pub fn update(f: impl Fn(&PropMap) -> PropMap + 'static) -> Self {
        Mutation::Update(Rc::new(f))
    }

    /// Create an invalid mutation carrying the rejected value.
    pub fn invalid(value: PropValue) -> Self {
        Mutation::Invalid(value)
    }

    /// Classify an arbitrary value as a mutation.
    ///
    /// Maps become patches; everything else is invalid and will be
    /// reported when it reaches the merge step.
    pub fn of_value(value: PropValue) -> Self {
        match value {
            PropValue::Map(map) => Mutation::Patch((*map).clone()),
            other => Mutation::Invalid(other),
        }
    }

    /// The shape name used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Mutation::Patch(_) => "map",
            Mutation::Update(_) => "function",
            Mutation::Invalid(value) => value.shape(),
        }
    }
}

impl fmt::Debug for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Patch(map) => f.debug_tuple("Patch").field(map).finish(),
            Mutation::Update(_) => f.write_str("Update(..)"),
            Mutation::Invalid(value) => f.debug_tuple("Invalid").field(value).finish(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
