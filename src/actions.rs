// ============================================================================
// propflow - Action Mapping
// Turn a mapping of values and subjects into callable action properties
// ============================================================================
//
// Entries whose key carries the trailing `$` marker are subjects the
// component should be able to push into; the helper strips the marker and
// replaces the entry with a forwarding callback that pushes the call's
// arguments, as one unit, into the subject. Everything else passes
// through unchanged. The result is a single-emission stream so it can be
// handed straight to a connector selector.
// ============================================================================

use std::rc::Rc;

use indexmap::IndexMap;

use crate::core::types::{ActionArgs, PropMap, PropValue};
use crate::stream::adapter::{Adapter, LocalAdapter};
use crate::stream::observable::Observable;
use crate::stream::subject::Emitter;

// =============================================================================
// ACTION MAP
// =============================================================================

/// Suffix marking an entry as a pushable stream.
pub const ACTION_MARKER: char = '$';

/// One entry in an action mapping.
pub enum ActionEntry {
    /// Passed through unchanged.
    Value(PropValue),

    /// A pushable stream; with a marker-suffixed key, it becomes a
    /// forwarding callback.
    Stream(Rc<dyn Emitter<ActionArgs>>),
}

impl ActionEntry {
    pub fn value(value: impl Into<PropValue>) -> Self {
        ActionEntry::Value(value.into())
    }

    pub fn stream(emitter: impl Emitter<ActionArgs>) -> Self {
        ActionEntry::Stream(Rc::new(emitter))
    }
}

/// Ordered mapping handed to the helper.
pub type ActionMap = IndexMap<String, ActionEntry>;

// =============================================================================
// MAP ACTION CREATORS
// =============================================================================

/// Transform an action mapping over the default adapter.
pub fn map_action_creators(actions: ActionMap) -> Observable<PropMap> {
    map_action_creators_with(&LocalAdapter, actions)
}

/// Transform an action mapping, emitting the result once per
/// subscription on the given adapter.
pub fn map_action_creators_with<A: Adapter>(adapter: &A, actions: ActionMap) -> A::Stream<PropMap> {
    let mut mapped = PropMap::new();

    for (key, entry) in actions {
        match entry {
            ActionEntry::Stream(emitter) => match key.strip_suffix(ACTION_MARKER) {
                Some(name) => {
                    let forward =
                        PropValue::action(move |args: ActionArgs| emitter.emit(args));
                    mapped.insert(name.to_string(), forward);
                }
                // A subject without the marker is passed through as an
                // opaque payload, key intact
                None => {
                    mapped.insert(key, PropValue::Opaque(Rc::new(emitter)));
                }
            },
            ActionEntry::Value(value) => {
                mapped.insert(key, value);
            }
        }
    }

    adapter.of(mapped)
}

// =============================================================================
// TESTS
// =============================================================================
