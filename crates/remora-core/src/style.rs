//! Group style declarations and their normalization into renderer style rules.
//!
//! A declaration targets one group key (a shared `label` value on nodes or edges) and a set
//! of recognized visual properties. `build_style` validates the declarations against the
//! closed per-kind property tables and expands them into the renderer's native
//! selector/declaration pairs. Unknown properties are errors, not no-ops: a typo'd property
//! must never silently disappear into the renderer.

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Which element population a rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    Node,
    Edge,
}

impl StyleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleKind::Node => "node",
            StyleKind::Edge => "edge",
        }
    }
}

impl std::fmt::Display for StyleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule target: one kind plus one group key.
///
/// On the wire this is the renderer's selector string, e.g. `node[label='PERSON']`, which
/// matches every element of that kind whose `label` attribute equals the group key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    pub kind: StyleKind,
    pub group_key: String,
}

impl Selector {
    pub fn node(group_key: impl Into<String>) -> Self {
        Self {
            kind: StyleKind::Node,
            group_key: group_key.into(),
        }
    }

    pub fn edge(group_key: impl Into<String>) -> Self {
        Self {
            kind: StyleKind::Edge,
            group_key: group_key.into(),
        }
    }

    /// Parses the wire form back into its parts. Returns `None` for anything that is not
    /// exactly `node[label='..']` / `edge[label='..']`.
    pub fn parse(text: &str) -> Option<Self> {
        let (kind, rest) = if let Some(rest) = text.strip_prefix("node") {
            (StyleKind::Node, rest)
        } else if let Some(rest) = text.strip_prefix("edge") {
            (StyleKind::Edge, rest)
        } else {
            return None;
        };
        let inner = rest.strip_prefix("[label='")?.strip_suffix("']")?;
        if inner.contains('\'') {
            return None;
        }
        Some(Self {
            kind,
            group_key: inner.to_string(),
        })
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[label='{}']", self.kind.as_str(), self.group_key)
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Selector::parse(&text)
            .ok_or_else(|| D::Error::custom(format!("not a group selector: {text:?}")))
    }
}

/// A property value: a literal, or a `data(..)` reference resolved per element at render
/// time.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Str(String),
    Num(f64),
    Bool(bool),
    /// Reference to an element attribute; serializes as `data(name)`.
    Attr(String),
}

impl StyleValue {
    pub fn attr(name: impl Into<String>) -> Self {
        StyleValue::Attr(name.into())
    }

    fn describe(&self) -> &'static str {
        match self {
            StyleValue::Str(_) => "a string",
            StyleValue::Num(_) => "a number",
            StyleValue::Bool(_) => "a boolean",
            StyleValue::Attr(_) => "an attribute reference",
        }
    }
}

impl From<&str> for StyleValue {
    fn from(v: &str) -> Self {
        StyleValue::Str(v.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(v: String) -> Self {
        StyleValue::Str(v)
    }
}

impl From<f64> for StyleValue {
    fn from(v: f64) -> Self {
        StyleValue::Num(v)
    }
}

impl From<i64> for StyleValue {
    fn from(v: i64) -> Self {
        StyleValue::Num(v as f64)
    }
}

impl From<i32> for StyleValue {
    fn from(v: i32) -> Self {
        StyleValue::Num(v as f64)
    }
}

impl From<bool> for StyleValue {
    fn from(v: bool) -> Self {
        StyleValue::Bool(v)
    }
}

/// Node shapes the renderer supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Ellipse,
    Rectangle,
    RoundRectangle,
    Triangle,
    Diamond,
    Hexagon,
    Star,
}

impl NodeShape {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeShape::Ellipse => "ellipse",
            NodeShape::Rectangle => "rectangle",
            NodeShape::RoundRectangle => "round-rectangle",
            NodeShape::Triangle => "triangle",
            NodeShape::Diamond => "diamond",
            NodeShape::Hexagon => "hexagon",
            NodeShape::Star => "star",
        }
    }

    pub const ALL: [NodeShape; 7] = [
        NodeShape::Ellipse,
        NodeShape::Rectangle,
        NodeShape::RoundRectangle,
        NodeShape::Triangle,
        NodeShape::Diamond,
        NodeShape::Hexagon,
        NodeShape::Star,
    ];

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

/// Edge curve styles the renderer supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveStyle {
    Bezier,
    Straight,
    Haystack,
    Taxi,
    Segments,
}

impl CurveStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            CurveStyle::Bezier => "bezier",
            CurveStyle::Straight => "straight",
            CurveStyle::Haystack => "haystack",
            CurveStyle::Taxi => "taxi",
            CurveStyle::Segments => "segments",
        }
    }

    pub const ALL: [CurveStyle; 5] = [
        CurveStyle::Bezier,
        CurveStyle::Straight,
        CurveStyle::Haystack,
        CurveStyle::Taxi,
        CurveStyle::Segments,
    ];

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

const NODE_PROPERTIES: &[&str] = &["color", "size", "shape", "caption", "icon"];
const EDGE_PROPERTIES: &[&str] = &["color", "width", "caption", "directed", "curve_style"];

/// Visual treatment for one node group.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    group_key: String,
    props: IndexMap<String, StyleValue>,
}

impl NodeStyle {
    pub fn new(group_key: impl Into<String>) -> Self {
        Self {
            group_key: group_key.into(),
            props: IndexMap::new(),
        }
    }

    pub fn group_key(&self) -> &str {
        &self.group_key
    }

    pub fn with_color(self, color: impl Into<StyleValue>) -> Self {
        self.with_property("color", color)
    }

    /// Node diameter in pixels (expands to both `width` and `height`).
    pub fn with_size(self, size: impl Into<StyleValue>) -> Self {
        self.with_property("size", size)
    }

    pub fn with_shape(self, shape: NodeShape) -> Self {
        self.with_property("shape", shape.as_str())
    }

    /// Text shown on the node; pass `StyleValue::attr("name")` to pull it from element data.
    pub fn with_caption(self, caption: impl Into<StyleValue>) -> Self {
        self.with_property("caption", caption)
    }

    pub fn with_icon(self, icon: impl Into<StyleValue>) -> Self {
        self.with_property("icon", icon)
    }

    /// Raw property escape hatch for host-driven declarations. The name is still validated
    /// against the recognized node set when the rule is built.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }
}

/// Visual treatment for one edge group.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyle {
    group_key: String,
    props: IndexMap<String, StyleValue>,
}

impl EdgeStyle {
    pub fn new(group_key: impl Into<String>) -> Self {
        Self {
            group_key: group_key.into(),
            props: IndexMap::new(),
        }
    }

    pub fn group_key(&self) -> &str {
        &self.group_key
    }

    pub fn with_color(self, color: impl Into<StyleValue>) -> Self {
        self.with_property("color", color)
    }

    pub fn with_width(self, width: impl Into<StyleValue>) -> Self {
        self.with_property("width", width)
    }

    pub fn with_caption(self, caption: impl Into<StyleValue>) -> Self {
        self.with_property("caption", caption)
    }

    /// Draws a target arrowhead when `true`.
    pub fn with_directed(self, directed: bool) -> Self {
        self.with_property("directed", directed)
    }

    pub fn with_curve_style(self, curve: CurveStyle) -> Self {
        self.with_property("curve_style", curve.as_str())
    }

    /// Raw property escape hatch; validated against the recognized edge set at build time.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }
}

/// One normalized rule in wire form: `{"selector": "node[label='K']", "style": {..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub selector: Selector,
    pub style: IndexMap<String, Value>,
}

/// Normalizes declarations into the ordered rule list the renderer consumes.
///
/// Node rules precede edge rules and input order is preserved within each kind; the
/// renderer applies later rules over earlier ones, so order is part of the contract.
/// Duplicate group keys within a kind are rejected rather than merged: a second declaration
/// for the same group is almost always a mistake, and last-write-wins would hide it.
pub fn build_style(node_styles: &[NodeStyle], edge_styles: &[EdgeStyle]) -> Result<Vec<StyleRule>> {
    let mut rules = Vec::with_capacity(node_styles.len() + edge_styles.len());

    let mut seen = std::collections::HashSet::new();
    for decl in node_styles {
        check_group_key(StyleKind::Node, &decl.group_key, &mut seen)?;
        rules.push(node_rule(decl)?);
    }

    let mut seen = std::collections::HashSet::new();
    for decl in edge_styles {
        check_group_key(StyleKind::Edge, &decl.group_key, &mut seen)?;
        rules.push(edge_rule(decl)?);
    }

    Ok(rules)
}

fn check_group_key<'a>(
    kind: StyleKind,
    group_key: &'a str,
    seen: &mut std::collections::HashSet<&'a str>,
) -> Result<()> {
    if group_key.is_empty() {
        return Err(style_error(kind, group_key, None, "group key must be non-empty"));
    }
    if group_key.contains('\'') {
        return Err(style_error(
            kind,
            group_key,
            None,
            "group key must not contain single quotes",
        ));
    }
    if !seen.insert(group_key) {
        return Err(style_error(
            kind,
            group_key,
            None,
            "duplicate group key (each group may be declared once)",
        ));
    }
    Ok(())
}

fn node_rule(decl: &NodeStyle) -> Result<StyleRule> {
    let kind = StyleKind::Node;
    let key = decl.group_key.as_str();
    let mut style = IndexMap::new();

    for (name, value) in &decl.props {
        match name.as_str() {
            "color" => {
                style.insert("background-color".to_string(), stringy(kind, key, name, value)?);
            }
            "size" => {
                let v = positive_number(kind, key, name, value)?;
                style.insert("width".to_string(), v.clone());
                style.insert("height".to_string(), v);
            }
            "shape" => {
                style.insert("shape".to_string(), shape_name(key, value)?);
            }
            "caption" => {
                style.insert("label".to_string(), stringy(kind, key, name, value)?);
            }
            "icon" => {
                style.insert("background-image".to_string(), stringy(kind, key, name, value)?);
            }
            other => return Err(unrecognized(kind, key, other, NODE_PROPERTIES)),
        }
    }

    Ok(StyleRule {
        selector: Selector::node(key),
        style,
    })
}

fn edge_rule(decl: &EdgeStyle) -> Result<StyleRule> {
    let kind = StyleKind::Edge;
    let key = decl.group_key.as_str();
    let mut style = IndexMap::new();

    for (name, value) in &decl.props {
        match name.as_str() {
            "color" => {
                let v = stringy(kind, key, name, value)?;
                style.insert("line-color".to_string(), v.clone());
                style.insert("target-arrow-color".to_string(), v);
            }
            "width" => {
                style.insert("width".to_string(), positive_number(kind, key, name, value)?);
            }
            "caption" => {
                style.insert("label".to_string(), stringy(kind, key, name, value)?);
            }
            "directed" => {
                let StyleValue::Bool(directed) = value else {
                    return Err(wrong_value(kind, key, name, value, "a boolean"));
                };
                let arrow = if *directed { "triangle" } else { "none" };
                style.insert("target-arrow-shape".to_string(), Value::String(arrow.into()));
                // Arrowheads need a routed curve; default one in unless the declaration
                // picks its own.
                if *directed && !decl.props.contains_key("curve_style") {
                    style.insert("curve-style".to_string(), Value::String("bezier".into()));
                }
            }
            "curve_style" => {
                style.insert("curve-style".to_string(), curve_name(key, value)?);
            }
            other => return Err(unrecognized(kind, key, other, EDGE_PROPERTIES)),
        }
    }

    Ok(StyleRule {
        selector: Selector::edge(key),
        style,
    })
}

fn stringy(kind: StyleKind, key: &str, name: &str, value: &StyleValue) -> Result<Value> {
    match value {
        StyleValue::Str(s) => Ok(Value::String(s.clone())),
        StyleValue::Attr(attr) => Ok(Value::String(format!("data({attr})"))),
        other => Err(wrong_value(
            kind,
            key,
            name,
            other,
            "a string or data(..) reference",
        )),
    }
}

fn positive_number(kind: StyleKind, key: &str, name: &str, value: &StyleValue) -> Result<Value> {
    match value {
        StyleValue::Num(n) if n.is_finite() && *n > 0.0 => Ok(wire_number(*n)),
        StyleValue::Attr(attr) => Ok(Value::String(format!("data({attr})"))),
        other => Err(wrong_value(
            kind,
            key,
            name,
            other,
            "a positive number or data(..) reference",
        )),
    }
}

fn shape_name(key: &str, value: &StyleValue) -> Result<Value> {
    let kind = StyleKind::Node;
    let StyleValue::Str(name) = value else {
        return Err(wrong_value(kind, key, "shape", value, "a shape name"));
    };
    match NodeShape::from_name(name) {
        Some(shape) => Ok(Value::String(shape.as_str().to_string())),
        None => Err(style_error(
            kind,
            key,
            Some("shape"),
            &format!("unknown shape {name:?}"),
        )),
    }
}

fn curve_name(key: &str, value: &StyleValue) -> Result<Value> {
    let kind = StyleKind::Edge;
    let StyleValue::Str(name) = value else {
        return Err(wrong_value(kind, key, "curve_style", value, "a curve style name"));
    };
    match CurveStyle::from_name(name) {
        Some(curve) => Ok(Value::String(curve.as_str().to_string())),
        None => Err(style_error(
            kind,
            key,
            Some("curve_style"),
            &format!("unknown curve style {name:?}"),
        )),
    }
}

/// Emits whole pixel counts as JSON integers so rules round-trip bit-for-bit.
fn wire_number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::Number((n as i64).into())
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn unrecognized(kind: StyleKind, key: &str, property: &str, recognized: &[&str]) -> Error {
    style_error(
        kind,
        key,
        Some(property),
        &format!(
            "unrecognized property {property:?} (recognized: {})",
            recognized.join(", ")
        ),
    )
}

fn wrong_value(
    kind: StyleKind,
    key: &str,
    property: &str,
    value: &StyleValue,
    expected: &str,
) -> Error {
    style_error(
        kind,
        key,
        Some(property),
        &format!("property {property:?} expects {expected}, got {}", value.describe()),
    )
}

fn style_error(kind: StyleKind, group_key: &str, property: Option<&str>, message: &str) -> Error {
    Error::StyleValidation {
        kind,
        group_key: group_key.to_string(),
        property: property.map(str::to_string),
        message: message.to_string(),
    }
}
