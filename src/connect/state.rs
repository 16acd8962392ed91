// ============================================================================
// propflow - Render State
// Incoming properties, the merged overlay, and the merge rules
// ============================================================================
//
// Render state is two maps. `incoming` is whatever the host passed down
// most recently; it feeds selector resolution and the `children`
// passthrough and is never shown to the component directly. `overlay` is
// the accumulation of stream emissions; it is what the component renders,
// merged shallowly, key by key, in emission order.
// ============================================================================

use crate::core::diagnostics::BindError;
use crate::core::types::{CHILDREN, Mutation, PropMap};

// =============================================================================
// RENDER STATE
// =============================================================================

pub(crate) struct RenderState {
    incoming: PropMap,
    overlay: PropMap,
}

impl RenderState {
    pub fn new() -> Self {
        Self {
            incoming: PropMap::new(),
            overlay: PropMap::new(),
        }
    }

    /// Mount-time reset: fresh incoming properties, empty overlay.
    pub fn reset(&mut self, incoming: PropMap) {
        self.incoming = incoming;
        self.overlay.clear();
    }

    /// Replace the incoming properties (host property update).
    pub fn set_incoming(&mut self, incoming: PropMap) {
        self.incoming = incoming;
    }

    pub fn incoming(&self) -> &PropMap {
        &self.incoming
    }

    pub fn overlay(&self) -> &PropMap {
        &self.overlay
    }

    /// Shallow merge: emitted keys overwrite, everything else is kept.
    pub fn merge(&mut self, patch: PropMap) {
        for (key, value) in patch {
            self.overlay.insert(key, value);
        }
    }

    /// The properties handed to the wrapped component: the overlay, plus
    /// the `children` passthrough forwarded unmodified from incoming.
    pub fn render_props(&self) -> PropMap {
        let mut props = self.overlay.clone();
        if let Some(children) = self.incoming.get(CHILDREN) {
            props.insert(CHILDREN.to_string(), children.clone());
        }
        props
    }
}

// =============================================================================
// MUTATION EVALUATION
// =============================================================================

/// Turn one emission into the patch to merge, given a snapshot of the
/// previous overlay. Evaluated against a snapshot so a functional update
/// that re-enters the wrapper cannot observe a half-applied merge.
pub(crate) fn evaluate(previous: &PropMap, mutation: Mutation) -> Result<PropMap, BindError> {
    match mutation {
        Mutation::Patch(patch) => Ok(patch),
        Mutation::Update(update) => Ok(update(previous)),
        Mutation::Invalid(value) => Err(BindError::MutationType {
            shape: value.shape().to_string(),
        }),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PropValue;

    fn map_of(pairs: &[(&str, i64)]) -> PropMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), PropValue::from(*v)))
            .collect()
    }

    #[test]
    fn merge_overwrites_by_key_and_keeps_the_rest() {
        let mut state = RenderState::new();
        state.merge(map_of(&[("a", 1), ("b", 2)]));
        state.merge(map_of(&[("b", 20), ("c", 3)]));

        assert_eq!(*state.overlay(), map_of(&[("a", 1), ("b", 20), ("c", 3)]));
    }

    #[test]
    fn merging_an_identical_patch_changes_nothing() {
        let mut state = RenderState::new();
        state.merge(map_of(&[("a", 1)]));
        let before = state.overlay().clone();

        state.merge(map_of(&[("a", 1)]));
        assert_eq!(*state.overlay(), before);
    }

    #[test]
    fn nested_maps_are_replaced_whole() {
        // Shallow merge only: a re-emitted map key replaces the old map
        let mut state = RenderState::new();

        let mut first = PropMap::new();
        first.insert("inner".to_string(), PropValue::map(map_of(&[("x", 1), ("y", 2)])));
        state.merge(first);

        let mut second = PropMap::new();
        second.insert("inner".to_string(), PropValue::map(map_of(&[("x", 10)])));
        state.merge(second);

        let inner = state.overlay()["inner"].as_map().expect("map value");
        assert_eq!(*inner, map_of(&[("x", 10)]));
    }

    #[test]
    fn reset_clears_the_overlay() {
        let mut state = RenderState::new();
        state.merge(map_of(&[("a", 1)]));
        state.reset(map_of(&[("b", 2)]));

        assert!(state.overlay().is_empty());
        assert_eq!(*state.incoming(), map_of(&[("b", 2)]));
    }

    #[test]
    fn render_props_forward_children_only() {
        let mut state = RenderState::new();
        let mut incoming = map_of(&[("ignored", 1)]);
        incoming.insert(CHILDREN.to_string(), PropValue::from("hello"));
        state.reset(incoming);
        state.merge(map_of(&[("a", 123)]));

        let props = state.render_props();
        assert_eq!(props["a"], PropValue::from(123));
        assert_eq!(props[CHILDREN], PropValue::from("hello"));
        assert!(!props.contains_key("ignored"));
    }

    #[test]
    fn children_passthrough_wins_over_emitted_children() {
        let mut state = RenderState::new();
        let mut incoming = PropMap::new();
        incoming.insert(CHILDREN.to_string(), PropValue::from("real"));
        state.reset(incoming);

        let mut patch = PropMap::new();
        patch.insert(CHILDREN.to_string(), PropValue::from("spoofed"));
        state.merge(patch);

        assert_eq!(state.render_props()[CHILDREN], PropValue::from("real"));
    }

    #[test]
    fn evaluate_applies_functional_updates_to_previous_state() {
        let previous = map_of(&[("n", 10)]);
        let mutation = Mutation::update(|prev| {
            let n = prev["n"].as_int().unwrap_or(0);
            let mut patch = PropMap::new();
            patch.insert("n".to_string(), PropValue::from(n + 5));
            patch
        });

        let patch = evaluate(&previous, mutation).expect("update evaluates");
        assert_eq!(patch["n"], PropValue::from(15));
    }

    #[test]
    fn evaluate_rejects_non_map_non_function_emissions() {
        let mutation = Mutation::invalid(PropValue::list([PropValue::from(123)]));
        match evaluate(&PropMap::new(), mutation) {
            Err(BindError::MutationType { shape }) => assert_eq!(shape, "list"),
            other => panic!("expected MutationType, got {other:?}"),
        }
    }
}
