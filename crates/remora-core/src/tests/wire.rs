//! Whole-protocol checks: declarations in, canonical wire JSON out, response decoded back.

use crate::*;
use serde_json::json;

fn sample_elements() -> Elements {
    Elements::from_parts(
        [
            NodeElement::new("n1").with_label("PERSON").with_attr("name", "Ada"),
            NodeElement::new("n2").with_label("PERSON"),
        ],
        [EdgeElement::new("e1", "n1", "n2").with_label("KNOWS")],
    )
}

fn sample_wire() -> String {
    let style = build_style(
        &[NodeStyle::new("PERSON").with_color("#2A629A").with_caption(StyleValue::attr("name"))],
        &[EdgeStyle::new("KNOWS").with_color("#888").with_directed(true)],
    )
    .unwrap();
    let layout = LayoutRegistry::default_catalog().resolve(&Layout::from("grid")).unwrap();
    let subscriptions = build_subscriptions(["tap", "select"]).unwrap();
    encode(sample_elements(), style, layout, DEFAULT_HEIGHT_PX, &subscriptions)
        .unwrap()
        .to_wire_json()
        .unwrap()
}

#[test]
fn renderer_configuration_matches_the_wire_contract() {
    assert_eq!(
        sample_wire(),
        concat!(
            r#"{"elements":{"nodes":[{"data":{"id":"n1","label":"PERSON","name":"Ada"}},"#,
            r#"{"data":{"id":"n2","label":"PERSON"}}],"edges":[{"data":{"id":"e1","source":"n1","target":"n2","label":"KNOWS"}}]},"#,
            r##""style":[{"selector":"node[label='PERSON']","style":{"background-color":"#2A629A","label":"data(name)"}},"##,
            r##"{"selector":"edge[label='KNOWS']","style":{"line-color":"#888","target-arrow-color":"#888","target-arrow-shape":"triangle","curve-style":"bezier"}}],"##,
            r#""layout":{"name":"grid","animate":false,"fit":true,"padding":30,"avoidOverlap":true,"condense":false},"#,
            r#""height":"500px","events":["tap","select"]}"#,
        )
    );
}

#[test]
fn identical_render_inputs_yield_identical_payload_bytes() {
    assert_eq!(sample_wire(), sample_wire());
}

#[test]
fn responses_decode_against_the_encoded_subscription_set() {
    let subscriptions = build_subscriptions(["tap", "select"]).unwrap();

    assert_eq!(decode_response(&serde_json::Value::Null, &subscriptions).unwrap(), None);

    let record = decode_response(
        &json!({"event_name": "tap", "ids": ["n1"], "timestamp": 1_700_000_000_000_i64}),
        &subscriptions,
    )
    .unwrap()
    .unwrap();
    assert_eq!(record.kind, EventKind::Tap);
    assert_eq!(record.element_ids, vec!["n1"]);
    assert!(record.timestamp.is_some());

    // Subscribed to tap and select only; a zoom response is a protocol violation.
    let err = decode_response(&json!({"event_name": "zoom", "level": 2.0}), &subscriptions)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedEvent { event_name } if event_name == "zoom"));
}

#[test]
fn verbatim_element_payloads_pass_through_untouched() {
    let raw = json!({
        "nodes": [{"data": {"id": "a", "label": "CITY", "position": {"x": 1, "y": 2}}}],
        "edges": [],
    });
    let style = build_style(&[NodeStyle::new("CITY").with_size(30)], &[]).unwrap();
    let layout = LayoutRegistry::default_catalog().resolve(&Layout::default()).unwrap();
    let subscriptions = build_subscriptions([EventKind::Tap]).unwrap();
    let config =
        encode(Elements::from_value(raw.clone()), style, layout, 720, &subscriptions).unwrap();

    let wire: serde_json::Value = serde_json::from_str(&config.to_wire_json().unwrap()).unwrap();
    assert_eq!(wire["elements"], raw);
    assert_eq!(wire["height"], json!("720px"));
    assert_eq!(wire["layout"]["name"], json!("cose"));
}
