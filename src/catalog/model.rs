/// Typed view of a compiled catalog.
///
/// The compiler hands back a JSON tree. Raw display prints that tree as-is;
/// the content-only and sorted displays need to walk resources and edges, so
/// the tree is validated into these records first.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::CatalogError;

/// A managed resource in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource type, e.g. `File`, `Package`, `Class`.
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    /// Manifest that declared the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
    /// Everything else (tags, exported, ...), kept for display.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource {
    /// Look up a parameter, treating JSON `null` as absent.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters
            .as_ref()
            .and_then(|p| p.get(name))
            .filter(|v| !v.is_null())
    }

    /// `title` followed by `type`, the sort key for resources.
    #[must_use]
    pub fn sort_key(&self) -> String {
        format!("{}{}", self.title, self.kind)
    }
}

/// A dependency edge between two resource references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

impl Edge {
    /// `target` followed by `source`, the sort key for edges.
    #[must_use]
    pub fn sort_key(&self) -> String {
        format!("{}{}", self.target, self.source)
    }
}

/// The parts of a catalog this tool inspects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Catalog {
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Catalog {
    /// Validate a compiled catalog tree.
    ///
    /// Accepts both the bare catalog object and the legacy envelope
    /// `{"document_type": "Catalog", "data": {...}}`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the tree is not a catalog.
    pub fn from_tree(tree: &Value) -> Result<Self, CatalogError> {
        Self::deserialize(catalog_body(tree)).map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

/// The object holding `resources`, `edges`, `classes` and `tags`.
#[must_use]
pub fn catalog_body(tree: &Value) -> &Value {
    match tree.get("data") {
        Some(data) if data.is_object() => data,
        _ => tree,
    }
}
