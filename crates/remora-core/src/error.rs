use crate::style::StyleKind;

pub type Result<T> = std::result::Result<T, Error>;

/// Configuration and decode errors.
///
/// Apart from [`Error::MalformedResponse`] (a renderer-side fault: a non-empty response
/// without a usable event tag) and the [`Error::Json`] serialization wrap, every variant
/// describes invalid caller input and is raised while the bridge configuration is being
/// built, before anything crosses to the renderer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid {kind} style for group {group_key:?}: {message}")]
    StyleValidation {
        kind: StyleKind,
        group_key: String,
        /// The offending property name, when the failure is about a single property.
        property: Option<String>,
        message: String,
    },

    #[error("unknown layout {requested:?} (expected one of: {})", available.join(", "))]
    UnknownLayout {
        requested: String,
        available: Vec<&'static str>,
    },

    #[error("invalid layout spec: {message}")]
    InvalidLayoutSpec { message: String },

    #[error("unsupported renderer event {event_name:?}")]
    UnsupportedEvent { event_name: String },

    #[error("invalid component height: {height_px}px (must be a positive integer)")]
    InvalidHeight { height_px: i32 },

    #[error("malformed renderer response: {message}")]
    MalformedResponse { message: String },

    #[error("wire JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
