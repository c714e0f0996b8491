//! Renderer interaction events.
//!
//! The event vocabulary is a closed catalog: hosts subscribe by name, the wire carries the
//! bare names, and anything outside the catalog is rejected at build time rather than
//! surfacing renderer-specific strings downstream. Decoding goes the other way: a raw
//! renderer payload comes back as an [`EventRecord`] with element ids, an optional
//! timestamp, and whatever extra fields the renderer attached.

use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// Interaction kinds the renderer can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Tap,
    DblTap,
    TapHold,
    CxtTap,
    Click,
    DblClick,
    MouseOver,
    MouseOut,
    Select,
    Unselect,
    Zoom,
    Pan,
}

impl EventKind {
    pub const ALL: [EventKind; 12] = [
        EventKind::Tap,
        EventKind::DblTap,
        EventKind::TapHold,
        EventKind::CxtTap,
        EventKind::Click,
        EventKind::DblClick,
        EventKind::MouseOver,
        EventKind::MouseOut,
        EventKind::Select,
        EventKind::Unselect,
        EventKind::Zoom,
        EventKind::Pan,
    ];

    /// Wire name, as subscribed and as echoed back in responses.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Tap => "tap",
            EventKind::DblTap => "dbltap",
            EventKind::TapHold => "taphold",
            EventKind::CxtTap => "cxttap",
            EventKind::Click => "click",
            EventKind::DblClick => "dblclick",
            EventKind::MouseOver => "mouseover",
            EventKind::MouseOut => "mouseout",
            EventKind::Select => "select",
            EventKind::Unselect => "unselect",
            EventKind::Zoom => "zoom",
            EventKind::Pan => "pan",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        EventKind::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }

    /// Whether this interaction targets elements. Viewport gestures (`zoom`, `pan`) carry
    /// no element ids.
    pub fn element_scoped(self) -> bool {
        !matches!(self, EventKind::Zoom | EventKind::Pan)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        use serde::de::Error as _;
        let name = String::deserialize(deserializer)?;
        EventKind::from_name(&name)
            .ok_or_else(|| D::Error::custom(format!("unknown renderer event {name:?}")))
    }
}

/// Host-side decode configuration for one event kind. Never serialized to the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadShape {
    /// Payload field holding the affected element ids.
    pub ids_field: String,
    /// Whether unrecognized payload fields are kept on the decoded record.
    pub keep_extra: bool,
}

impl Default for PayloadShape {
    fn default() -> Self {
        Self { ids_field: "ids".to_string(), keep_extra: true }
    }
}

/// One requested subscription, by wire name, with an optional payload-shape override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSub {
    pub name: String,
    pub shape: Option<PayloadShape>,
}

impl EventSub {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), shape: None }
    }

    pub fn with_shape(mut self, shape: PayloadShape) -> Self {
        self.shape = Some(shape);
        self
    }
}

impl From<&str> for EventSub {
    fn from(name: &str) -> Self {
        EventSub::new(name)
    }
}

impl From<String> for EventSub {
    fn from(name: String) -> Self {
        EventSub::new(name)
    }
}

impl From<EventKind> for EventSub {
    fn from(kind: EventKind) -> Self {
        EventSub::new(kind.as_str())
    }
}

/// A validated subscription: catalog kind plus the shape used to decode its payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub kind: EventKind,
    pub shape: PayloadShape,
}

/// The validated, deduplicated subscription set for one render call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Subscriptions {
    entries: Vec<Subscription>,
}

impl Subscriptions {
    pub fn iter(&self) -> impl Iterator<Item = &Subscription> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The subscription for `kind`, when this set carries one.
    pub fn get(&self, kind: EventKind) -> Option<&Subscription> {
        self.entries.iter().find(|sub| sub.kind == kind)
    }

    /// Whether `kind` is part of the subscribed set.
    pub fn contains(&self, kind: EventKind) -> bool {
        self.get(kind).is_some()
    }

    /// Wire names in subscription order.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.entries.iter().map(|sub| sub.kind).collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|sub| sub.kind.as_str()).collect()
    }

    /// Decodes a tagged payload with the shape this set subscribed the event under.
    ///
    /// Events outside the subscribed set fail with [`Error::UnsupportedEvent`]; the host
    /// never receives an interaction it did not ask for.
    pub fn decode(&self, event_name: &str, raw: &Value) -> Result<EventRecord> {
        let sub = EventKind::from_name(event_name)
            .and_then(|kind| self.get(kind))
            .ok_or_else(|| Error::UnsupportedEvent { event_name: event_name.to_string() })?;
        decode_with_shape(sub.kind, &sub.shape, raw)
    }
}

/// Builds the subscription set for one render call.
///
/// Names are validated against the catalog; duplicates of the same kind collapse to the
/// first occurrence (first shape wins) so the wire list is free of repeats while keeping
/// the caller's ordering.
pub fn build_subscriptions<I>(events: I) -> Result<Subscriptions>
where
    I: IntoIterator,
    I::Item: Into<EventSub>,
{
    let mut entries: Vec<Subscription> = Vec::new();
    for sub in events {
        let sub = sub.into();
        let kind = EventKind::from_name(&sub.name)
            .ok_or_else(|| Error::UnsupportedEvent { event_name: sub.name.clone() })?;
        if entries.iter().any(|existing| existing.kind == kind) {
            continue;
        }
        entries.push(Subscription { kind, shape: sub.shape.unwrap_or_default() });
    }
    Ok(Subscriptions { entries })
}

/// One decoded renderer interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub kind: EventKind,
    /// Ids of the affected elements. Empty for viewport gestures.
    pub element_ids: Vec<String>,
    /// Event time, when the renderer reported one (epoch milliseconds on the wire).
    pub timestamp: Option<DateTime<Utc>>,
    /// Renderer payload fields beyond ids and timestamp, in arrival order.
    pub extra: IndexMap<String, Value>,
}

impl EventRecord {
    pub fn event_name(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// Decodes a tagged payload using the catalog's default shape.
pub fn decode_payload(event_name: &str, raw: &Value) -> Result<EventRecord> {
    let kind = EventKind::from_name(event_name)
        .ok_or_else(|| Error::UnsupportedEvent { event_name: event_name.to_string() })?;
    decode_with_shape(kind, &PayloadShape::default(), raw)
}

fn decode_with_shape(kind: EventKind, shape: &PayloadShape, raw: &Value) -> Result<EventRecord> {
    let Some(obj) = raw.as_object() else {
        return Err(Error::MalformedResponse {
            message: format!("{} payload must be a JSON object", kind.as_str()),
        });
    };

    let element_ids = match obj.get(shape.ids_field.as_str()) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(id)) => vec![id.clone()],
        Some(Value::Array(ids)) => {
            let mut out = Vec::with_capacity(ids.len());
            for id in ids {
                match id {
                    Value::String(id) => out.push(id.clone()),
                    Value::Number(id) => out.push(id.to_string()),
                    other => {
                        return Err(Error::MalformedResponse {
                            message: format!(
                                "element id in {:?} must be a string or number, got {other}",
                                shape.ids_field
                            ),
                        });
                    }
                }
            }
            out
        }
        Some(other) => {
            return Err(Error::MalformedResponse {
                message: format!(
                    "field {:?} must hold an id or a list of ids, got {other}",
                    shape.ids_field
                ),
            });
        }
    };

    let timestamp = obj.get("timestamp").and_then(decode_timestamp);

    let mut extra = IndexMap::new();
    if shape.keep_extra {
        for (key, value) in obj {
            if key == "event_name" || *key == shape.ids_field {
                continue;
            }
            // A timestamp that did not decode stays in extra rather than vanishing.
            if key == "timestamp" && timestamp.is_some() {
                continue;
            }
            extra.insert(key.clone(), value.clone());
        }
    }

    Ok(EventRecord { kind, element_ids, timestamp, extra })
}

/// Epoch milliseconds off the wire, integer or fractional. Digits below the millisecond
/// are dropped.
fn decode_timestamp(raw: &Value) -> Option<DateTime<Utc>> {
    let millis = raw.as_i64().or_else(|| raw.as_f64().map(|ms| ms as i64))?;
    Utc.timestamp_millis_opt(millis).single()
}
