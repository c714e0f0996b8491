use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The graph element collection handed to the renderer.
///
/// Elements are host data, not ours: the bridge carries them verbatim. Nothing is dropped,
/// reordered, or rewritten here, and referential integrity (every edge endpoint naming an
/// existing node id) is checked by the renderer, not by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Elements(Value);

impl Default for Elements {
    fn default() -> Self {
        Self::from_parts([], [])
    }
}

impl Elements {
    /// Wraps an already-shaped element collection without touching it.
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Builds the canonical renderer shape `{"nodes":[{"data":{..}}],"edges":[{"data":{..}}]}`.
    ///
    /// Key order inside each `data` object is fixed (`id`, endpoints, `label`, then caller
    /// attributes in insertion order) so that identical inputs serialize identically.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = NodeElement>,
        edges: impl IntoIterator<Item = EdgeElement>,
    ) -> Self {
        let nodes: Vec<Value> = nodes.into_iter().map(|n| n.into_data_entry()).collect();
        let edges: Vec<Value> = edges.into_iter().map(|e| e.into_data_entry()).collect();

        let mut root = Map::new();
        root.insert("nodes".to_string(), Value::Array(nodes));
        root.insert("edges".to_string(), Value::Array(edges));
        Self(Value::Object(root))
    }
}

/// One node in builder form. `label` is the group classifier style rules select on.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeElement {
    id: String,
    label: Option<String>,
    attrs: Map<String, Value>,
}

impl NodeElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            attrs: Map::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attaches an open attribute (e.g. a field a caption can resolve via `data(name)`).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    fn into_data_entry(self) -> Value {
        let mut data = Map::new();
        data.insert("id".to_string(), Value::String(self.id));
        if let Some(label) = self.label {
            data.insert("label".to_string(), Value::String(label));
        }
        for (name, value) in self.attrs {
            data.insert(name, value);
        }

        let mut entry = Map::new();
        entry.insert("data".to_string(), Value::Object(data));
        Value::Object(entry)
    }
}

/// One edge in builder form. `source`/`target` are node ids in the same collection.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeElement {
    id: String,
    source: String,
    target: String,
    label: Option<String>,
    attrs: Map<String, Value>,
}

impl EdgeElement {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: None,
            attrs: Map::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    fn into_data_entry(self) -> Value {
        let mut data = Map::new();
        data.insert("id".to_string(), Value::String(self.id));
        data.insert("source".to_string(), Value::String(self.source));
        data.insert("target".to_string(), Value::String(self.target));
        if let Some(label) = self.label {
            data.insert("label".to_string(), Value::String(label));
        }
        for (name, value) in self.attrs {
            data.insert(name, value);
        }

        let mut entry = Map::new();
        entry.insert("data".to_string(), Value::Object(data));
        Value::Object(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_is_verbatim() {
        let raw = json!({
            "nodes": [{"data": {"id": "n1", "label": "PERSON", "name": "Ada"}}],
            "edges": [{"data": {"id": "e1", "source": "n1", "target": "n1", "label": "SELF"}}],
            "extra": "the bridge must not police this"
        });
        let elements = Elements::from_value(raw.clone());
        assert_eq!(elements.as_value(), &raw);
        assert_eq!(serde_json::to_value(&elements).unwrap(), raw);
    }

    #[test]
    fn from_parts_emits_canonical_key_order() {
        let elements = Elements::from_parts(
            [NodeElement::new("n1")
                .with_label("PERSON")
                .with_attr("name", "Ada")],
            [EdgeElement::new("e1", "n1", "n2").with_label("KNOWS")],
        );
        let text = serde_json::to_string(elements.as_value()).unwrap();
        assert_eq!(
            text,
            r#"{"nodes":[{"data":{"id":"n1","label":"PERSON","name":"Ada"}}],"edges":[{"data":{"id":"e1","source":"n1","target":"n2","label":"KNOWS"}}]}"#
        );
    }

    #[test]
    fn default_is_an_empty_collection() {
        assert_eq!(
            serde_json::to_value(Elements::default()).unwrap(),
            json!({"nodes": [], "edges": []})
        );
    }
}
