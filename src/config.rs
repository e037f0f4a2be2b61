//! Field declarations read from JSON.
//!
//! ```json
//! [
//!   {"name": "status", "type": "string", "label": "Status",
//!    "lookups": [{"name": "Active", "value": "A"}]},
//!   {"name": "tags", "type": "string-array"},
//!   {"name": "note", "type": "string", "nullable": true}
//! ]
//! ```

use std::{collections::HashSet, fs, path::Path};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    ast::FieldType,
    metadata::{Field, Fields, Lookup},
    value::Value,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read field declarations: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid field declarations: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("field name cannot be empty")]
    EmptyName,

    #[error("field '{0}' is declared more than once")]
    Duplicate(String),
}

/// One declared field.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub lookups: Vec<LookupConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookupConfig {
    pub name: String,
    pub value: serde_json::Value,
}

impl From<FieldConfig> for Field {
    fn from(config: FieldConfig) -> Self {
        let mut field = Field::new(config.name, config.field_type);
        if let Some(label) = config.label {
            field = field.with_label(label);
        }
        if config.nullable {
            field = field.nullable();
        }
        if !config.lookups.is_empty() {
            let lookups = config
                .lookups
                .into_iter()
                .map(|l| Lookup::new(l.name, Value::from(l.value)))
                .collect();
            field = field.with_lookups(lookups);
        }
        field
    }
}

/// Parse a JSON array of field declarations.
///
/// Names are compared without case when checking for duplicates, the
/// same way field tokens are resolved.
pub fn load_fields(json: &str) -> Result<Fields, ConfigError> {
    let configs: Vec<FieldConfig> = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    for config in &configs {
        let name = config.name.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(ConfigError::Duplicate(config.name.clone()));
        }
    }

    let fields: Fields = configs.into_iter().map(Field::from).collect();
    debug!(fields = fields.len(), "loaded field declarations");
    Ok(fields)
}

/// Read and parse a field declaration file.
pub fn load_fields_file(path: impl AsRef<Path>) -> Result<Fields, ConfigError> {
    let json = fs::read_to_string(path)?;
    load_fields(&json)
}
