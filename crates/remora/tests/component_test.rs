use std::cell::RefCell;

use remora::component::{
    BridgeRequest, ComponentBridge, ComponentError, LinkAnalysis, RenderParams, TransportError,
};
use remora::{
    EdgeElement, EdgeStyle, Elements, Error, EventKind, EventSub, Layout, NodeElement, NodeStyle,
};
use serde_json::{Value, json};

/// Transport double: records every outbound payload and replays a scripted response.
struct ScriptedBridge {
    response: Value,
    sent: RefCell<Vec<String>>,
}

impl ScriptedBridge {
    fn new(response: Value) -> Self {
        Self {
            response,
            sent: RefCell::new(Vec::new()),
        }
    }

    fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }
}

impl ComponentBridge for ScriptedBridge {
    fn exchange(&self, request: &BridgeRequest) -> Result<Value, TransportError> {
        let wire = request.wire_json().expect("wire JSON");
        self.sent.borrow_mut().push(wire);
        Ok(self.response.clone())
    }
}

struct DeadBridge;

impl ComponentBridge for DeadBridge {
    fn exchange(&self, _request: &BridgeRequest) -> Result<Value, TransportError> {
        Err("renderer went away".into())
    }
}

fn people_params() -> RenderParams {
    RenderParams {
        elements: Elements::from_parts(
            [
                NodeElement::new("n1").with_label("PERSON").with_attr("name", "Ada"),
                NodeElement::new("n2").with_label("PERSON").with_attr("name", "Grace"),
            ],
            [EdgeElement::new("e1", "n1", "n2").with_label("KNOWS")],
        ),
        node_styles: vec![NodeStyle::new("PERSON").with_color("#2A629A")],
        edge_styles: vec![EdgeStyle::new("KNOWS").with_directed(true)],
        events: vec![EventSub::new("tap")],
        ..RenderParams::default()
    }
}

#[test]
fn render_returns_the_decoded_interaction() {
    let bridge = ScriptedBridge::new(json!({
        "event_name": "tap",
        "ids": ["n1"],
        "timestamp": 1_700_000_000_000_i64,
        "modifier": "shift",
    }));
    let component = LinkAnalysis::new(&bridge).with_key("graph-1");

    let record = component
        .render_sync(people_params())
        .unwrap()
        .expect("an interaction");
    assert_eq!(record.kind, EventKind::Tap);
    assert_eq!(record.element_ids, vec!["n1"]);
    assert!(record.timestamp.is_some());
    assert_eq!(record.extra.get("modifier"), Some(&json!("shift")));

    let sent = bridge.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with(r#"{"elements":"#));
    assert!(sent[0].contains(r#""height":"500px""#));
    assert!(sent[0].contains(r#""events":["tap"]"#));
}

#[test]
fn idle_responses_mean_no_interaction() {
    let bridge = ScriptedBridge::new(Value::Null);
    let component = LinkAnalysis::new(&bridge);
    assert_eq!(component.render_sync(people_params()).unwrap(), None);

    let bridge = ScriptedBridge::new(json!({}));
    let component = LinkAnalysis::new(&bridge);
    assert_eq!(component.render_sync(people_params()).unwrap(), None);
}

#[test]
fn repeated_renders_send_identical_payloads() {
    let bridge = ScriptedBridge::new(Value::Null);
    let component = LinkAnalysis::new(&bridge);
    component.render_sync(people_params()).unwrap();
    component.render_sync(people_params()).unwrap();

    let sent = bridge.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
}

#[test]
fn configuration_faults_fail_before_any_exchange() {
    let bridge = ScriptedBridge::new(Value::Null);
    let component = LinkAnalysis::new(&bridge);

    let mut params = people_params();
    params.node_styles = vec![NodeStyle::new("PERSON").with_property("glow", "red")];
    assert!(matches!(
        component.render_sync(params).unwrap_err(),
        ComponentError::Config(Error::StyleValidation { .. })
    ));

    let mut params = people_params();
    params.layout = Layout::from("springy");
    assert!(matches!(
        component.render_sync(params).unwrap_err(),
        ComponentError::Config(Error::UnknownLayout { .. })
    ));

    let mut params = people_params();
    params.height_px = -5;
    assert!(matches!(
        component.render_sync(params).unwrap_err(),
        ComponentError::Config(Error::InvalidHeight { height_px: -5 })
    ));

    let mut params = people_params();
    params.events = vec![EventSub::new("hover")];
    assert!(matches!(
        component.render_sync(params).unwrap_err(),
        ComponentError::Config(Error::UnsupportedEvent { .. })
    ));

    assert!(bridge.sent().is_empty(), "nothing may reach the renderer");
}

#[test]
fn transport_failures_surface_with_context() {
    let component = LinkAnalysis::new(DeadBridge);
    let err = component.render_sync(people_params()).unwrap_err();
    assert!(err.to_string().contains("renderer went away"));
    assert!(matches!(err, ComponentError::Transport(_)));
}

#[test]
fn unsubscribed_responses_are_protocol_violations() {
    let bridge = ScriptedBridge::new(json!({"event_name": "select", "ids": ["n1"]}));
    let component = LinkAnalysis::new(&bridge);
    assert!(matches!(
        component.render_sync(people_params()).unwrap_err(),
        ComponentError::Config(Error::UnsupportedEvent { event_name }) if event_name == "select"
    ));
}

#[test]
fn async_render_matches_sync() {
    let bridge = ScriptedBridge::new(json!({"event_name": "tap", "ids": ["n2"]}));
    let component = LinkAnalysis::new(&bridge);

    let sync_record = component.render_sync(people_params()).unwrap();
    let async_record = futures::executor::block_on(component.render(people_params())).unwrap();
    assert_eq!(sync_record, async_record);
}

#[test]
fn prepare_exposes_the_outbound_request() {
    let component = LinkAnalysis::new(DeadBridge).with_key("pane-7");
    let request = component.prepare(people_params()).unwrap();

    assert_eq!(request.key.as_deref(), Some("pane-7"));
    assert_eq!(request.config.height_px, 500);
    let wire = request.wire_json().unwrap();
    assert!(wire.contains(r#""selector":"edge[label='KNOWS']""#));
    assert!(wire.contains(r#""target-arrow-shape":"triangle""#));
}
