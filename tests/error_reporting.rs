use propflow::{
    BindError, CHILDREN, CaptureSink, Mutation, Observable, PropMap, PropValue, Render, Selector,
    SelectorResult, Subject, connect, props,
};

struct Probe(&'static str);

impl Render for Probe {
    type Output = Option<PropValue>;

    fn render(&self, props: &PropMap) -> Option<PropValue> {
        props.get(self.0).cloned()
    }
}

#[test]
fn missing_selector_reports_a_selector_type_error() {
    let sink = CaptureSink::new();
    let connected = connect(Selector::none())
        .sink(sink.clone())
        .wrap(Probe("a"));

    connected.mount(props! { "a" => 123, CHILDREN => "kept" });

    assert_eq!(sink.count(), 1);
    assert_eq!(
        sink.reports()[0],
        BindError::SelectorType {
            shape: "nothing".to_string()
        }
    );

    // Degraded render: no connected properties, children still flow
    assert_eq!(connected.render(), None);
    assert_eq!(connected.props()[CHILDREN], PropValue::from("kept"));
    assert!(!connected.is_subscribed());
}

#[test]
fn selector_returning_nothing_reports_a_selector_result_error() {
    let sink = CaptureSink::new();
    let selector: Selector = Selector::derive(|_| SelectorResult::none());
    let connected = connect(selector).sink(sink.clone()).wrap(Probe("a"));

    connected.mount(props! {});

    assert_eq!(sink.count(), 1);
    assert_eq!(sink.reports()[0].kind(), "SelectorResultError");
    assert_eq!(connected.render(), None);
}

#[test]
fn non_map_emission_reports_a_mutation_type_error() {
    let sink = CaptureSink::new();
    let selector = Selector::stream(Observable::of(Mutation::invalid(PropValue::list([
        PropValue::from(123),
    ]))));
    let connected = connect(selector).sink(sink.clone()).wrap(Probe("a"));

    connected.mount(props! {});

    assert_eq!(sink.count(), 1);
    assert_eq!(
        sink.reports()[0],
        BindError::MutationType {
            shape: "list".to_string()
        }
    );
    assert_eq!(connected.render(), None);
}

#[test]
fn faulty_emission_keeps_previous_state() {
    let sink = CaptureSink::new();
    let subject: Subject<Mutation> = Subject::new();
    let connected = connect(Selector::stream(subject.observable()))
        .sink(sink.clone())
        .wrap(Probe("a"));
    connected.mount(props! {});

    subject.emit(Mutation::patch(props! { "a" => 1 }));
    assert_eq!(connected.render(), Some(PropValue::from(1)));
    let version = connected.render_version();

    subject.emit(Mutation::invalid(PropValue::from(7)));

    assert_eq!(sink.count(), 1);
    assert_eq!(sink.reports()[0].kind(), "MutationTypeError");
    assert_eq!(connected.render(), Some(PropValue::from(1)));
    assert_eq!(connected.render_version(), version);

    // The stream itself stays alive; a later valid emission still lands
    subject.emit(Mutation::patch(props! { "a" => 2 }));
    assert_eq!(connected.render(), Some(PropValue::from(2)));
    assert_eq!(sink.count(), 1);
}

#[test]
fn classified_values_flow_end_to_end() {
    // of_value turns maps into patches and anything else into a report
    let sink = CaptureSink::new();
    let subject: Subject<Mutation> = Subject::new();
    let connected = connect(Selector::stream(subject.observable()))
        .sink(sink.clone())
        .wrap(Probe("x"));
    connected.mount(props! {});

    subject.emit(Mutation::of_value(PropValue::from(props! { "x" => 5 })));
    subject.emit(Mutation::of_value(PropValue::from(3)));

    assert_eq!(connected.render(), Some(PropValue::from(5)));
    assert_eq!(sink.count(), 1);
    assert_eq!(
        sink.reports()[0],
        BindError::MutationType {
            shape: "int".to_string()
        }
    );
}
