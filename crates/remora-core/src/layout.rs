//! Layout catalog and resolution.
//!
//! The registry maps each supported layout name to a complete renderer parameter object.
//! Resolution is a pure catalog lookup: a name either resolves to its full default table
//! or fails listing every supported name, and a custom parameter object is passed through
//! verbatim once its `name` discriminator checks out. There is no merging of caller
//! parameters into catalog defaults; a caller who wants to tweak one knob supplies the
//! whole table.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::diag;
use crate::error::{Error, Result};

/// A caller's layout selection: a catalog name or a complete custom parameter mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    /// A name looked up in the registry catalog.
    Named(String),
    /// A full parameter object forwarded to the renderer verbatim. Must carry a non-empty
    /// string `name` key so the renderer can pick its algorithm.
    Custom(Map<String, Value>),
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Named("cose".to_string())
    }
}

impl From<&str> for Layout {
    fn from(name: &str) -> Self {
        Layout::Named(name.to_string())
    }
}

impl From<String> for Layout {
    fn from(name: String) -> Self {
        Layout::Named(name)
    }
}

impl From<Map<String, Value>> for Layout {
    fn from(params: Map<String, Value>) -> Self {
        Layout::Custom(params)
    }
}

/// A resolved, renderer-ready layout parameter object.
///
/// The `name` key is always present and always serialized first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutSpec(Value);

impl LayoutSpec {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// The algorithm discriminator the renderer dispatches on.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }
}

type DefaultsFn = fn() -> Value;

struct LayoutEntry {
    name: &'static str,
    defaults: DefaultsFn,
}

/// Ordered catalog of supported layouts plus renamed aliases.
pub struct LayoutRegistry {
    entries: Vec<LayoutEntry>,
    renamed: Vec<(&'static str, &'static str)>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self { entries: Vec::new(), renamed: Vec::new() }
    }

    /// Built-in catalog. Registration order is the order names appear in error messages.
    pub fn default_catalog() -> Self {
        let mut reg = Self::new();
        reg.add("cose", cose_defaults);
        reg.add("fcose", fcose_defaults);
        reg.add("cola", cola_defaults);
        reg.add("circle", circle_defaults);
        reg.add("concentric", concentric_defaults);
        reg.add("grid", grid_defaults);
        reg.add("breadthfirst", breadthfirst_defaults);
        reg.add("random", random_defaults);
        // Former catalog names kept as resolvable aliases of their successors.
        reg.add_renamed("cose-bilkent", "fcose");
        reg
    }

    pub fn add(&mut self, name: &'static str, defaults: DefaultsFn) {
        self.entries.push(LayoutEntry { name, defaults });
    }

    /// Registers `old` as a deprecated alias of `new`. Aliases resolve in a single hop to
    /// a catalog entry; they never chain.
    pub fn add_renamed(&mut self, old: &'static str, new: &'static str) {
        self.renamed.push((old, new));
    }

    /// Supported names, in registration order. Aliases are not listed.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Resolves a caller selection into a complete renderer parameter object.
    ///
    /// Resolution is deterministic and idempotent: the same selection always yields the
    /// same spec, and resolving never mutates the registry.
    pub fn resolve(&self, layout: &Layout) -> Result<LayoutSpec> {
        match layout {
            Layout::Named(name) => self.resolve_name(name),
            Layout::Custom(params) => {
                match params.get("name") {
                    Some(Value::String(name)) if !name.is_empty() => {}
                    Some(_) => {
                        return Err(Error::InvalidLayoutSpec {
                            message: "custom layout \"name\" must be a non-empty string"
                                .to_string(),
                        });
                    }
                    None => {
                        return Err(Error::InvalidLayoutSpec {
                            message: "custom layout is missing the \"name\" key".to_string(),
                        });
                    }
                }
                Ok(LayoutSpec(Value::Object(params.clone())))
            }
        }
    }

    fn resolve_name(&self, name: &str) -> Result<LayoutSpec> {
        if let Some(entry) = self.entry(name) {
            return Ok(LayoutSpec((entry.defaults)()));
        }
        // One hop only. An alias whose successor is not a catalog entry (dangling, or a
        // cycle of aliases) falls through to the unknown-layout error for the requested
        // name instead of chasing further renames.
        if let Some(&(old, new)) = self.renamed.iter().find(|&&(old, _)| old == name) {
            if let Some(entry) = self.entry(new) {
                diag::warn_deprecated(
                    old,
                    &format!("layout {old:?} was renamed; using {new:?} defaults instead"),
                );
                return Ok(LayoutSpec((entry.defaults)()));
            }
        }
        Err(Error::UnknownLayout { requested: name.to_string(), available: self.names() })
    }

    fn entry(&self, name: &str) -> Option<&LayoutEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::default_catalog()
    }
}

// Default parameter tables. `name` first, then the common animate/fit/padding block, then
// algorithm-specific knobs.

fn cose_defaults() -> Value {
    json!({
        "name": "cose",
        "animate": "end",
        "fit": true,
        "padding": 30,
        "nodeDimensionsIncludeLabels": true,
    })
}

fn fcose_defaults() -> Value {
    json!({
        "name": "fcose",
        "animate": true,
        "fit": true,
        "padding": 30,
        "nodeDimensionsIncludeLabels": true,
        "quality": "default",
        "randomize": true,
    })
}

fn cola_defaults() -> Value {
    json!({
        "name": "cola",
        "animate": true,
        "fit": true,
        "padding": 30,
        "nodeDimensionsIncludeLabels": true,
        "maxSimulationTime": 3000,
        "avoidOverlap": true,
    })
}

fn circle_defaults() -> Value {
    json!({
        "name": "circle",
        "animate": false,
        "fit": true,
        "padding": 30,
        "avoidOverlap": true,
        "clockwise": true,
    })
}

fn concentric_defaults() -> Value {
    json!({
        "name": "concentric",
        "animate": false,
        "fit": true,
        "padding": 30,
        "avoidOverlap": true,
        "minNodeSpacing": 10,
        "equidistant": false,
    })
}

fn grid_defaults() -> Value {
    json!({
        "name": "grid",
        "animate": false,
        "fit": true,
        "padding": 30,
        "avoidOverlap": true,
        "condense": false,
    })
}

fn breadthfirst_defaults() -> Value {
    json!({
        "name": "breadthfirst",
        "animate": false,
        "fit": true,
        "padding": 30,
        "directed": false,
        "circle": false,
        "spacingFactor": 1.75,
    })
}

fn random_defaults() -> Value {
    json!({
        "name": "random",
        "animate": false,
        "fit": true,
        "padding": 30,
    })
}
