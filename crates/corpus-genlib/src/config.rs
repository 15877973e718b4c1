//! Generation config: run seed and per-field tuning.
//!
//! The config is optional; an empty [`Config`] leaves every field at its
//! type's defaults. Example:
//!
//! ```yaml
//! seed: 42
//! fields:
//!   - name: host.name
//!     cardinality: 50
//!   - name: event.id
//!     unique: true
//!   - name: http.response.status_code
//!     range:
//!       min: 200
//!       max: 599
//!   - name: "@timestamp"
//!     date_range:
//!       from: "2024-01-01T00:00:00Z"
//!       to: "2024-06-30T23:59:59Z"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Error type for config loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading the config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Inclusive numeric bounds for `long` and `double` fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

/// Timestamp window for `date` fields. Bounds accept RFC 3339 timestamps or
/// plain `YYYY-MM-DD` dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub from: String,
    pub to: String,
}

/// Per-field tuning entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Field this entry applies to
    pub name: String,

    /// Bound on the number of distinct values; once reached, values cycle
    /// from the already-produced set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<usize>,

    /// Never produce the same value twice for this field
    #[serde(default)]
    pub unique: bool,

    /// Numeric bounds, for numeric field types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<NumericRange>,

    /// Timestamp window, for `date` fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

/// Full generation config for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// RNG seed; runs with the same seed, fields, and template produce the
    /// same corpus. Defaults to 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Per-field tuning entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldConfig>,
}

impl Config {
    /// Parse a config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    /// Tuning entry for a field, if any.
    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Effective run seed.
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(0)
    }
}
