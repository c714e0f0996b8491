#![forbid(unsafe_code)]

//! Typed bridge contract between a host application and an embedded link-analysis graph
//! surface.
//!
//! The crate owns everything that crosses the host/renderer boundary for one render pass:
//! element payloads, group-keyed node and edge styling, the layout catalog, the interaction
//! event catalog, and the deterministic wire encoding that ties them together. It does not
//! render anything and it does not talk to any transport; hosts plug those in around it.
//!
//! Design goals:
//!
//! - Closed catalogs: layouts and events are validated against fixed sets, so renderer
//!   vocabulary never leaks through the host API unchecked.
//! - Deterministic wire output: identical inputs serialize to byte-identical JSON, letting
//!   hosts detect no-op re-renders by comparison.
//! - Renderer-agnostic host surface: hosts speak in graph terms (groups, captions,
//!   directedness); the translation to renderer style properties happens here.

pub mod bridge;
pub mod diag;
pub mod elements;
pub mod error;
pub mod event;
pub mod layout;
pub mod style;

pub use bridge::{BridgeConfig, DEFAULT_HEIGHT_PX, decode_response, encode};
pub use elements::{EdgeElement, Elements, NodeElement};
pub use error::{Error, Result};
pub use event::{
    EventKind, EventRecord, EventSub, PayloadShape, Subscription, Subscriptions,
    build_subscriptions, decode_payload,
};
pub use layout::{Layout, LayoutRegistry, LayoutSpec};
pub use style::{
    CurveStyle, EdgeStyle, NodeShape, NodeStyle, Selector, StyleKind, StyleRule, StyleValue,
    build_style,
};

#[cfg(test)]
mod tests;
