//! Wire payload assembly and response decoding.
//!
//! [`BridgeConfig`] is the single outbound message of the protocol: it carries everything
//! the renderer needs for one render pass, serialized with a fixed field order so that
//! identical inputs produce byte-identical JSON. Hosts lean on that determinism to compare
//! payloads and skip re-configuring a renderer that is already up to date.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::elements::Elements;
use crate::error::{Error, Result};
use crate::event::{EventKind, EventRecord, Subscriptions};
use crate::layout::LayoutSpec;
use crate::style::StyleRule;

/// Component viewport height when the host does not pick one.
pub const DEFAULT_HEIGHT_PX: i32 = 500;

/// The complete outbound configuration for one render pass.
///
/// Field order is part of the wire contract: `elements`, `style`, `layout`, `height`,
/// `events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub elements: Elements,
    pub style: Vec<StyleRule>,
    pub layout: LayoutSpec,
    /// Viewport height. On the wire this is the CSS string form, e.g. `"500px"`.
    #[serde(rename = "height", with = "px_string")]
    pub height_px: i32,
    pub events: Vec<EventKind>,
}

impl BridgeConfig {
    /// Canonical wire JSON. Identical configurations yield identical bytes.
    pub fn to_wire_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Assembles the outbound configuration from already-validated parts.
///
/// The one check left at this stage is the viewport height: it must be a positive pixel
/// count, since the renderer would otherwise collapse the surface to nothing.
pub fn encode(
    elements: Elements,
    style: Vec<StyleRule>,
    layout: LayoutSpec,
    height_px: i32,
    subscriptions: &Subscriptions,
) -> Result<BridgeConfig> {
    if height_px < 1 {
        return Err(Error::InvalidHeight { height_px });
    }
    let config = BridgeConfig {
        elements,
        style,
        layout,
        height_px,
        events: subscriptions.kinds(),
    };
    tracing::debug!(
        target: "remora",
        styles = config.style.len(),
        layout = config.layout.name().unwrap_or("?"),
        height_px,
        events = config.events.len(),
        "encoded bridge configuration"
    );
    Ok(config)
}

/// Decodes one raw renderer response.
///
/// `null`, an empty object, or an empty string all mean "no interaction yet" and decode to
/// `None`. Anything else must be an object tagged with `event_name`, decoded through the
/// subscription set the configuration was encoded with.
pub fn decode_response(raw: &Value, subscriptions: &Subscriptions) -> Result<Option<EventRecord>> {
    match raw {
        Value::Null => return Ok(None),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::Object(obj) if obj.is_empty() => return Ok(None),
        _ => {}
    }
    let Some(obj) = raw.as_object() else {
        return Err(Error::MalformedResponse {
            message: format!("expected an event object, got {raw}"),
        });
    };
    let event_name = match obj.get("event_name") {
        Some(Value::String(name)) => name.as_str(),
        Some(other) => {
            return Err(Error::MalformedResponse {
                message: format!("\"event_name\" must be a string, got {other}"),
            });
        }
        None => {
            return Err(Error::MalformedResponse {
                message: "response object is missing the \"event_name\" tag".to_string(),
            });
        }
    };
    Ok(Some(subscriptions.decode(event_name, raw)?))
}

mod px_string {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        height_px: &i32,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{height_px}px"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<i32, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let digits = raw
            .strip_suffix("px")
            .ok_or_else(|| D::Error::custom(format!("height {raw:?} is missing the px suffix")))?;
        digits
            .parse::<i32>()
            .map_err(|_| D::Error::custom(format!("height {raw:?} is not a whole pixel count")))
    }
}
