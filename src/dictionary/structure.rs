//! Dictionary structure description
//!
//! The structure lists the key column and the ordered attributes of a
//! dictionary. It is parsed from configuration and consumed once, at
//! construction, to build the attribute registry.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::types::AttributeUnderlyingType;

/// Key column description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSpec {
    /// Name of the key column
    pub name: String,
}

impl Default for IdSpec {
    fn default() -> Self {
        Self {
            name: "id".to_string(),
        }
    }
}

/// Attribute description as declared in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSpec {
    /// Attribute name, unique within the dictionary
    pub name: String,
    /// Declared underlying type
    #[serde(rename = "type")]
    pub underlying_type: AttributeUnderlyingType,
    /// Value returned for absent keys; JSON `null` means the type's zero value
    #[serde(default)]
    pub null_value: JsonValue,
    /// Whether values are parent keys of a hierarchy
    #[serde(default)]
    pub hierarchical: bool,
    /// Whether distinct keys map to distinct values
    #[serde(default)]
    pub injective: bool,
}

impl AttributeSpec {
    /// Create an attribute with the type's zero value as null value
    pub fn new(name: impl Into<String>, underlying_type: AttributeUnderlyingType) -> Self {
        Self {
            name: name.into(),
            underlying_type,
            null_value: JsonValue::Null,
            hierarchical: false,
            injective: false,
        }
    }

    /// Create a string attribute
    pub fn string(name: impl Into<String>, null_value: &str) -> Self {
        Self::new(name, AttributeUnderlyingType::String).with_null_value(null_value)
    }

    /// Create a UInt64 parent-pointer attribute
    pub fn hierarchical_parent(name: impl Into<String>, null_key: u64) -> Self {
        Self::new(name, AttributeUnderlyingType::UInt64)
            .with_null_value(null_key)
            .hierarchical()
    }

    /// Set the null value
    pub fn with_null_value(mut self, null_value: impl Into<JsonValue>) -> Self {
        self.null_value = null_value.into();
        self
    }

    /// Mark as hierarchical
    pub fn hierarchical(mut self) -> Self {
        self.hierarchical = true;
        self
    }

    /// Mark as injective
    pub fn injective(mut self) -> Self {
        self.injective = true;
        self
    }
}

/// Refresh window in seconds. Carried as configuration; a direct dictionary
/// never caches, so nothing here is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DictionaryLifetime {
    #[serde(default)]
    pub min_sec: u64,
    #[serde(default)]
    pub max_sec: u64,
}

impl DictionaryLifetime {
    pub fn new(min_sec: u64, max_sec: u64) -> Self {
        Self { min_sec, max_sec }
    }
}

/// Complete dictionary structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryStructure {
    /// Key column
    #[serde(default)]
    pub id: IdSpec,
    /// Composite key declaration (not supported by the direct layout)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Vec<AttributeSpec>>,
    /// Range lower bound column (not supported by the direct layout)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_min: Option<String>,
    /// Range upper bound column (not supported by the direct layout)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_max: Option<String>,
    /// Ordered attribute declarations
    pub attributes: Vec<AttributeSpec>,
}

impl DictionaryStructure {
    /// Create a structure keyed by `id`
    pub fn new(attributes: Vec<AttributeSpec>) -> Self {
        Self {
            id: IdSpec::default(),
            key: None,
            range_min: None,
            range_max: None,
            attributes,
        }
    }

    /// Rename the key column
    pub fn with_id_name(mut self, name: impl Into<String>) -> Self {
        self.id.name = name.into();
        self
    }

    /// Returns attribute names in declaration order
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }
}
