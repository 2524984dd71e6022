//! Input loading from files, strings, and HTTP URLs.
//!
//! Field group exports and catalogs are plain JSON documents.

use std::path::Path;

use serde_json::Value;

use crate::catalog::StaticCatalog;
use crate::error::LoadError;
use crate::types::{json_type_name, FieldGroup};

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a JSON document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_json_str(&content)
}

/// Load a JSON document from a string.
pub fn load_json_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a JSON document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
#[cfg(feature = "remote")]
pub fn load_json_url(url: &str) -> Result<Value, LoadError> {
    let network = |source: reqwest::Error| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network)?;

    client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.json())
        .map_err(network)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load from a file path or, with the `remote` feature, a URL.
pub fn load_json_auto(source: &str) -> Result<Value, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            return load_json_url(source);
        }
        #[cfg(not(feature = "remote"))]
        {
            return Err(LoadError::InvalidDocument {
                what: "source",
                message: format!("{} is a URL but remote loading is disabled", source),
            });
        }
    }
    load_json(Path::new(source))
}

/// Parse field groups from an export document.
///
/// Accepts either a single group object or an array of groups. Individual
/// fields are read leniently; only the top-level shape is enforced.
pub fn parse_field_groups(document: &Value) -> Result<Vec<FieldGroup>, LoadError> {
    let parse = |value: &Value| {
        serde_json::from_value::<FieldGroup>(value.clone()).map_err(|e| {
            LoadError::InvalidDocument {
                what: "field group",
                message: e.to_string(),
            }
        })
    };

    match document {
        Value::Array(items) => items.iter().map(parse).collect(),
        Value::Object(_) => Ok(vec![parse(document)?]),
        other => Err(LoadError::InvalidDocument {
            what: "field group export",
            message: format!("expected object or array, got {}", json_type_name(other)),
        }),
    }
}

/// Parse a catalog document.
pub fn parse_catalog(document: &Value) -> Result<StaticCatalog, LoadError> {
    serde_json::from_value(document.clone()).map_err(|e| LoadError::InvalidDocument {
        what: "catalog",
        message: e.to_string(),
    })
}

/// Load field groups from a file path or URL.
pub fn load_field_groups(source: &str) -> Result<Vec<FieldGroup>, LoadError> {
    parse_field_groups(&load_json_auto(source)?)
}

/// Load a catalog from a file path or URL.
pub fn load_catalog(source: &str) -> Result<StaticCatalog, LoadError> {
    parse_catalog(&load_json_auto(source)?)
}
