//! Model documents and dependency-id extraction
//!
//! A model document wraps the raw JSON definition of one model together
//! with its extracted id and the ids of the models it references. References
//! come from two structural patterns:
//! - composition: `contents` entries with `"@type": "Component"` reference
//!   another model through their `schema` value
//! - inheritance: `extends`, either a single id or an array of ids

use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};

/// A parsed model definition plus the identifiers it references
#[derive(Debug, Clone)]
pub struct ModelDocument {
    /// Raw model definition as parsed from JSON
    content: Map<String, Value>,
    /// Model id, taken from `@id` (or the legacy `id` field)
    pub id: String,
    /// Referenced model ids in declaration order, duplicates removed
    pub dependency_ids: Vec<String>,
}

/// Error describing why a single document could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The document is not a JSON object
    NotAnObject,
    /// Neither `@id` nor `id` holds a string value
    MissingId,
    /// An `extends` entry is not a string
    InvalidExtends,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "the model definition is not a JSON object"),
            Self::MissingId => write!(f, "unable to find an 'id' or '@id' string in the model"),
            Self::InvalidExtends => write!(f, "the model's 'extends' contains a non-string entry"),
        }
    }
}

impl std::error::Error for DocumentError {}

impl ModelDocument {
    /// Creates a model document from a parsed JSON value.
    ///
    /// Fails when the value is not an object, carries no usable id, or
    /// declares a malformed `extends`. Failures describe this one document
    /// so callers can skip it without abandoning the rest of a load.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let content = match value {
            Value::Object(map) => map,
            _ => return Err(DocumentError::NotAnObject),
        };

        let id = extract_id(&content)?;
        let dependency_ids = extract_dependency_ids(&content)?;

        Ok(Self {
            content,
            id,
            dependency_ids,
        })
    }

    /// The raw model definition, as submitted to and returned by the service
    pub fn content(&self) -> &Map<String, Value> {
        &self.content
    }
}

/// Retrieves the model id, preferring `@id` over `id`
fn extract_id(content: &Map<String, Value>) -> Result<String, DocumentError> {
    content
        .get("@id")
        .or_else(|| content.get("id"))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(DocumentError::MissingId)
}

/// Collects the referenced model ids in declaration order, duplicates removed
fn extract_dependency_ids(content: &Map<String, Value>) -> Result<Vec<String>, DocumentError> {
    let mut ids = Vec::new();

    // Components embedded in the contents array
    if let Some(Value::Array(entries)) = content.get("contents") {
        for entry in entries {
            let entry = match entry.as_object() {
                Some(object) => object,
                None => continue,
            };
            if entry.get("@type").and_then(Value::as_str) != Some("Component") {
                continue;
            }
            if let Some(schema) = entry.get("schema").and_then(Value::as_str) {
                ids.push(schema.to_owned());
            }
        }
    }

    // Inherited interfaces
    match content.get("extends") {
        Some(Value::Array(parents)) => {
            for parent in parents {
                match parent.as_str() {
                    Some(id) => ids.push(id.to_owned()),
                    None => return Err(DocumentError::InvalidExtends),
                }
            }
        }
        Some(Value::String(parent)) => ids.push(parent.clone()),
        Some(_) => return Err(DocumentError::InvalidExtends),
        None => {}
    }

    let mut seen = HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));

    Ok(ids)
}
