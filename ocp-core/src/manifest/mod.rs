//! Deployment manifest document model
//!
//! A manifest is kept as an untyped JSON value tree rather than a strict
//! schema: the validators only report on what they find, so a missing
//! `spec` or a mistyped field must read as "not set" instead of failing
//! deserialization. Navigation goes through [`Node`].

mod node;

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{OcpError, Result};

pub use node::Node;

/// Path from the manifest root to the pod specification
pub const POD_SPEC_PATH: [&str; 3] = ["spec", "template", "spec"];

/// A deployment-shaped declarative document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(Value);

impl Manifest {
    /// Wrap an already-parsed document. Any value is accepted.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parse JSON text; the top level must be a mapping
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_document(value)
    }

    /// Parse YAML text; the top level must be a mapping
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)?;
        Self::from_document(value)
    }

    /// Load from a file. `.json` files are read as JSON, everything else as YAML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| OcpError::IoError {
            message: format!("{}: {}", path.display(), e),
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_yaml_str(&text),
        }
    }

    fn from_document(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(OcpError::InvalidManifest {
                reason: format!("expected a mapping at the top level, got {}", type_name(&value)),
            });
        }
        Ok(Self(value))
    }

    /// Cursor at the document root
    pub fn root(&self) -> Node<'_> {
        Node::new(&self.0)
    }

    /// `kind`, when it is a string
    pub fn kind(&self) -> Option<&str> {
        self.root().get("kind").as_str()
    }

    /// `metadata`
    pub fn metadata(&self) -> Node<'_> {
        self.root().get("metadata")
    }

    /// `metadata.name`, when it is a string
    pub fn name(&self) -> Option<&str> {
        self.metadata().get("name").as_str()
    }

    /// `spec.template.spec`
    pub fn pod_spec(&self) -> Node<'_> {
        self.root().path(&POD_SPEC_PATH)
    }

    /// Containers of the pod spec in declaration order
    pub fn containers(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        self.pod_spec().get("containers").items()
    }

    /// Volumes of the pod spec in declaration order
    pub fn volumes(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        self.pod_spec().get("volumes").items()
    }

    /// Borrow the raw document
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Take the raw document
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl From<Value> for Manifest {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// Name of a container or volume entry, `""` when unset
pub fn entry_name<'a>(entry: &Node<'a>) -> &'a str {
    entry.get("name").str_or_empty()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
