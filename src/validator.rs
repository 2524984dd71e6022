//! Structural validation of field group exports and catalogs.
//!
//! Resolution accepts sloppy input; this is the strict check for authors who
//! want to know what the resolver will ignore before it ignores it.

use std::sync::OnceLock;

use serde_json::{json, Value};

use crate::error::{LoadError, SchemaError, ValidateError};

fn field_group_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let condition = json!({
            "type": "object",
            "required": ["param", "operator", "value"],
            "properties": {
                "param": { "type": "string", "minLength": 1 },
                "operator": { "enum": ["==", "!="] },
                "value": { "type": ["string", "integer"], "minLength": 1 }
            }
        });
        let group = json!({
            "type": "object",
            "required": ["title"],
            "properties": {
                "key": { "type": "string" },
                "title": { "type": "string" },
                "graphql_field_name": { "type": "string" },
                "show_in_graphql": { "type": ["boolean", "integer", "string"] },
                "graphql_types": { "type": "array", "items": { "type": "string" } },
                "location": {
                    "type": "array",
                    "items": { "type": "array", "items": condition }
                }
            }
        });
        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "oneOf": [group, { "type": "array", "items": group }]
        })
    })
}

fn catalog_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "properties": {
                "content_types": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["kind"],
                        "properties": {
                            "kind": { "type": "string", "minLength": 1 },
                            "type_name": { "type": "string" },
                            "hierarchical": { "type": "boolean" }
                        }
                    }
                },
                "taxonomies": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["kind"],
                        "properties": {
                            "kind": { "type": "string", "minLength": 1 },
                            "type_name": { "type": "string" }
                        }
                    }
                },
                "templates": {
                    "type": "object",
                    "additionalProperties": { "type": "string", "minLength": 1 }
                },
                "content_items": {
                    "type": "object",
                    "additionalProperties": { "type": "string", "minLength": 1 }
                }
            }
        })
    })
}

/// Validate a field group export (one group or an array of groups).
///
/// # Errors
///
/// Returns `ValidateError::Invalid` listing every violation.
pub fn validate_field_groups(document: &Value) -> Result<(), ValidateError> {
    validate_against_schema(field_group_schema(), document)
}

/// Validate a catalog document.
pub fn validate_catalog(document: &Value) -> Result<(), ValidateError> {
    validate_against_schema(catalog_schema(), document)
}

/// Validate a document against a JSON Schema.
pub fn validate_against_schema(schema: &Value, document: &Value) -> Result<(), ValidateError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| {
        ValidateError::Load(LoadError::InvalidDocument {
            what: "schema",
            message: e.to_string(),
        })
    })?;

    let errors: Vec<SchemaError> = validator
        .iter_errors(document)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}
