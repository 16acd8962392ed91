use propflow::{
    ActionArgs, ActionEntry, ActionMap, Mutation, PropMap, PropValue, Selector, Subject,
    component, connect, map_action_creators, props,
};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn mapped_actions_render_as_callable_props() {
    let clicks: Subject<ActionArgs> = Subject::new();
    let received = Rc::new(RefCell::new(Vec::new()));
    let received_clone = received.clone();
    clicks
        .observable()
        .subscribe(move |args| received_clone.borrow_mut().push(args));

    let mut actions = ActionMap::new();
    actions.insert("onClick$".to_string(), ActionEntry::stream(clicks.clone()));
    actions.insert("label".to_string(), ActionEntry::value("press me"));

    // The action map is a single-emission stream, so it connects directly
    let selector = Selector::stream(map_action_creators(actions).map(Mutation::patch));
    let connected = connect(selector).wrap(component(|props: &PropMap| props.clone()));

    connected.mount(props! {});
    let rendered = connected.render();

    assert_eq!(rendered["label"], PropValue::from("press me"));
    assert!(rendered["onClick"].as_action().is_some());

    rendered["onClick"].call(vec![PropValue::from("payload")]);
    assert_eq!(*received.borrow(), vec![vec![PropValue::from("payload")]]);
}

#[test]
fn action_calls_forward_arguments_as_one_emission() {
    let fire: Subject<ActionArgs> = Subject::new();
    let received = Rc::new(RefCell::new(Vec::new()));
    let received_clone = received.clone();
    fire.observable()
        .subscribe(move |args| received_clone.borrow_mut().push(args));

    let mut actions = ActionMap::new();
    actions.insert("fire$".to_string(), ActionEntry::stream(fire.clone()));

    let mapped = Rc::new(RefCell::new(None));
    let mapped_clone = mapped.clone();
    map_action_creators(actions).subscribe(move |map| *mapped_clone.borrow_mut() = Some(map));
    let mapped = mapped.borrow().clone().expect("one synchronous emission");

    mapped["fire"].call(vec![PropValue::from(1), PropValue::from(2)]);
    mapped["fire"].call(vec![]);

    assert_eq!(received.borrow().len(), 2);
    assert_eq!(
        received.borrow()[0],
        vec![PropValue::from(1), PropValue::from(2)]
    );
    assert_eq!(received.borrow()[1], Vec::<PropValue>::new());
}
