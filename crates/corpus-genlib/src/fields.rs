//! Field definitions: the schema describing what each template field emits.
//!
//! Field definitions are loaded from a YAML list:
//!
//! ```yaml
//! - name: service.name
//!   type: constant_keyword
//!   value: checkout
//! - name: http.response.status_code
//!   type: long
//! - name: "@timestamp"
//!   type: date
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Error type for field-definition loading.
#[derive(Debug, thiserror::Error)]
pub enum FieldsError {
    /// Error reading the definitions file
    #[error("Failed to read field definitions: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse field definitions: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Value type a field produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Random short lowercase token
    Keyword,
    /// Fixed value taken from the field definition
    ConstantKeyword,
    /// Random run of lowercase words
    Text,
    /// Random integer
    Long,
    /// Random float
    Double,
    /// Random boolean
    Bool,
    /// Random timestamp within a configurable window
    Date,
    /// Random IPv4 address
    Ip,
}

/// A single field definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Field name as referenced by templates
    pub name: String,

    /// Value type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Fixed value; required for `constant_keyword`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_yaml::Value>,

    /// Documentation example; not used during generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Ordered list of field definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(Vec<Field>);

impl Fields {
    /// Parse field definitions from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, FieldsError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load field definitions from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FieldsError> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.0.iter()
    }

    /// Look up a field definition by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.0.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
