//! Lookup tables the resolver reads during a pass.
//!
//! The engine never owns this data. Each trait is a read-only view supplied
//! by the host; [`StaticCatalog`] is a serde-backed implementation of all of
//! them for tests and the CLI.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::format::format_type_name;
use crate::types::FieldGroup;

/// Key of the template every content item falls back to.
pub const DEFAULT_TEMPLATE: &str = "default";

/// Schema type of the fallback template.
pub const DEFAULT_TEMPLATE_TYPE: &str = "DefaultTemplate";

/// A content kind exposed in the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType {
    pub kind: String,
    #[serde(default)]
    pub type_name: String,
    #[serde(default)]
    pub hierarchical: bool,
}

impl ContentType {
    pub fn new(kind: impl Into<String>, type_name: impl Into<String>, hierarchical: bool) -> Self {
        Self {
            kind: kind.into(),
            type_name: type_name.into(),
            hierarchical,
        }
    }
}

/// A taxonomy kind exposed in the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyType {
    pub kind: String,
    #[serde(default)]
    pub type_name: String,
}

impl TaxonomyType {
    pub fn new(kind: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            type_name: type_name.into(),
        }
    }
}

/// Source of field group descriptors.
pub trait FieldGroupProvider {
    fn field_groups(&self) -> Vec<FieldGroup>;
}

/// Hands out a copy of the list; providers backed by storage build it fresh.
impl FieldGroupProvider for Vec<FieldGroup> {
    fn field_groups(&self) -> Vec<FieldGroup> {
        self.clone()
    }
}

/// Content and taxonomy kinds the schema exposes.
pub trait SchemaTypeCatalog {
    fn content_types(&self) -> Vec<ContentType>;
    fn taxonomies(&self) -> Vec<TaxonomyType>;
}

/// Resolves a content item id to its content kind.
pub trait ContentItemLookup {
    /// Returns `None` when the item does not exist.
    fn content_kind(&self, id: &str) -> Option<String>;
}

/// Page templates, keyed by template key.
pub trait TemplateCatalog {
    fn templates(&self) -> BTreeMap<String, String>;
}

/// In-memory catalog, loadable from JSON.
///
/// ```json
/// {
///   "content_types": [{ "kind": "page", "type_name": "Page", "hierarchical": true }],
///   "taxonomies": [{ "kind": "category", "type_name": "Category" }],
///   "templates": { "template-wide.php": "WideTemplate" },
///   "content_items": { "42": "page" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticCatalog {
    #[serde(default)]
    pub content_types: Vec<ContentType>,
    #[serde(default)]
    pub taxonomies: Vec<TaxonomyType>,
    #[serde(default)]
    pub templates: BTreeMap<String, String>,
    #[serde(default)]
    pub content_items: BTreeMap<String, String>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_type(mut self, kind: &str, type_name: &str, hierarchical: bool) -> Self {
        self.content_types
            .push(ContentType::new(kind, type_name, hierarchical));
        self
    }

    pub fn taxonomy(mut self, kind: &str, type_name: &str) -> Self {
        self.taxonomies.push(TaxonomyType::new(kind, type_name));
        self
    }

    pub fn template(mut self, key: &str, type_name: &str) -> Self {
        self.templates.insert(key.to_string(), type_name.to_string());
        self
    }

    pub fn content_item(mut self, id: &str, kind: &str) -> Self {
        self.content_items.insert(id.to_string(), kind.to_string());
        self
    }
}

impl SchemaTypeCatalog for StaticCatalog {
    fn content_types(&self) -> Vec<ContentType> {
        self.content_types
            .iter()
            .filter_map(|t| {
                Some(ContentType {
                    type_name: type_name_or_kind(&t.type_name, &t.kind)?,
                    ..t.clone()
                })
            })
            .collect()
    }

    fn taxonomies(&self) -> Vec<TaxonomyType> {
        self.taxonomies
            .iter()
            .filter_map(|t| {
                Some(TaxonomyType {
                    type_name: type_name_or_kind(&t.type_name, &t.kind)?,
                    kind: t.kind.clone(),
                })
            })
            .collect()
    }
}

impl ContentItemLookup for StaticCatalog {
    fn content_kind(&self, id: &str) -> Option<String> {
        self.content_items.get(id.trim()).cloned()
    }
}

impl TemplateCatalog for StaticCatalog {
    fn templates(&self) -> BTreeMap<String, String> {
        self.templates.clone()
    }
}

/// The declared type name, else one derived from the kind. Entries where
/// neither yields an identifier are not exposed.
fn type_name_or_kind(type_name: &str, kind: &str) -> Option<String> {
    if !format_type_name(type_name).is_empty() {
        return Some(type_name.to_string());
    }
    let derived = format_type_name(kind);
    (!derived.is_empty()).then_some(derived)
}
