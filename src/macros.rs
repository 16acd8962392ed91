// ============================================================================
// propflow - Ergonomic Macros
// ============================================================================

/// Helper macro to clone variables into a move closure.
///
/// This reduces the boilerplate of manually cloning `Rc`-backed handles
/// (subjects, sinks, connected wrappers) before moving them into a
/// closure.
///
/// # Usage
///
/// ```rust
/// use propflow::{cloned, Mutation, Subject};
///
/// let updates = Subject::<Mutation>::new();
/// let probe = cloned!(updates => move || updates.observer_count());
/// assert_eq!(probe(), 0);
/// ```
#[macro_export]
macro_rules! cloned {
    ($($n:ident),+ => $e:expr) => {
        {
            $( let $n = $n.clone(); )+
            $e
        }
    };
}

/// Build a [`PropMap`](crate::PropMap) from `key => value` pairs.
///
/// Values go through `PropValue::from`, so plain literals work directly.
///
/// # Usage
///
/// ```rust
/// use propflow::props;
///
/// let map = props! { "a" => 10, "label" => "sum" };
/// assert_eq!(map["a"], propflow::PropValue::from(10));
/// ```
#[macro_export]
macro_rules! props {
    () => {
        $crate::PropMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::PropMap::new();
        $( map.insert(::std::string::String::from($key), $crate::PropValue::from($value)); )+
        map
    }};
}
