//! Attribute registry
//!
//! Built once from a [`DictionaryStructure`] and immutable afterwards.
//! Attribute indices are stable for the dictionary's lifetime.

use std::collections::HashMap;
use std::mem;

use crate::types::{AttributeUnderlyingType, Value};

use super::arena::{StringArena, StringRef};
use super::errors::{DictionaryError, DictionaryResult};
use super::structure::{AttributeSpec, DictionaryStructure};

/// Precomputed null default of an attribute
#[derive(Debug)]
enum NullValue {
    Scalar(Value),
    /// String defaults live in the attribute's arena
    String(StringRef),
}

/// A typed attribute with its fixed null default
#[derive(Debug)]
pub struct Attribute {
    name: String,
    underlying_type: AttributeUnderlyingType,
    null_value: NullValue,
    /// Present only for String attributes
    arena: Option<StringArena>,
    hierarchical: bool,
    injective: bool,
}

impl Attribute {
    fn from_spec(dictionary: &str, spec: &AttributeSpec) -> DictionaryResult<Self> {
        let converted = Value::from_json(spec.underlying_type, &spec.null_value).map_err(|reason| {
            DictionaryError::InvalidNullValue {
                dictionary: dictionary.to_string(),
                attribute: spec.name.clone(),
                expected: spec.underlying_type,
                reason,
            }
        })?;

        let (null_value, arena) = match converted {
            Value::String(s) => {
                let mut arena = StringArena::new();
                let r = arena.insert(&s);
                (NullValue::String(r), Some(arena))
            }
            scalar => (NullValue::Scalar(scalar), None),
        };

        Ok(Self {
            name: spec.name.clone(),
            underlying_type: spec.underlying_type,
            null_value,
            arena,
            hierarchical: spec.hierarchical,
            injective: spec.injective,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn underlying_type(&self) -> AttributeUnderlyingType {
        self.underlying_type
    }

    pub fn is_hierarchical(&self) -> bool {
        self.hierarchical
    }

    pub fn is_injective(&self) -> bool {
        self.injective
    }

    /// Returns a copy of the null default
    pub fn null_value(&self) -> Value {
        match &self.null_value {
            NullValue::Scalar(v) => v.clone(),
            NullValue::String(_) => Value::String(self.null_str().unwrap_or_default().to_string()),
        }
    }

    /// Returns the string null default, borrowed from the attribute.
    ///
    /// `None` for non-string attributes.
    pub fn null_str(&self) -> Option<&str> {
        match (&self.null_value, &self.arena) {
            (NullValue::String(r), Some(arena)) => arena.get(*r),
            _ => None,
        }
    }

    fn bytes_allocated(&self) -> usize {
        let arena = self
            .arena
            .as_ref()
            .map(|a| mem::size_of::<StringArena>() + a.allocated_bytes())
            .unwrap_or(0);
        mem::size_of::<Attribute>() + arena
    }
}

/// Ordered attribute set with name lookup
#[derive(Debug)]
pub struct AttributeRegistry {
    attributes: Vec<Attribute>,
    index_by_name: HashMap<String, usize>,
    hierarchical: Option<usize>,
}

impl AttributeRegistry {
    /// Validates `structure` and builds the registry.
    ///
    /// `dictionary` is the full name used in error messages.
    pub fn build(dictionary: &str, structure: &DictionaryStructure) -> DictionaryResult<Self> {
        if structure.key.is_some() {
            return Err(DictionaryError::UnsupportedKey {
                dictionary: dictionary.to_string(),
            });
        }
        if structure.range_min.is_some() || structure.range_max.is_some() {
            return Err(DictionaryError::UnsupportedRange {
                dictionary: dictionary.to_string(),
            });
        }
        if structure.attributes.is_empty() {
            return Err(DictionaryError::EmptyStructure {
                dictionary: dictionary.to_string(),
            });
        }

        let mut attributes = Vec::with_capacity(structure.attributes.len());
        let mut index_by_name = HashMap::with_capacity(structure.attributes.len());
        let mut hierarchical: Option<usize> = None;

        for (index, spec) in structure.attributes.iter().enumerate() {
            if index_by_name.contains_key(&spec.name) {
                return Err(DictionaryError::DuplicateAttribute {
                    dictionary: dictionary.to_string(),
                    attribute: spec.name.clone(),
                });
            }
            if spec.name == structure.id.name {
                return Err(DictionaryError::IdAttributeCollision {
                    dictionary: dictionary.to_string(),
                    attribute: spec.name.clone(),
                });
            }

            if spec.hierarchical {
                if spec.underlying_type != AttributeUnderlyingType::UInt64 {
                    return Err(DictionaryError::HierarchicalTypeMismatch {
                        dictionary: dictionary.to_string(),
                        attribute: spec.name.clone(),
                        actual: spec.underlying_type,
                    });
                }
                if let Some(first) = hierarchical {
                    return Err(DictionaryError::MultipleHierarchical {
                        dictionary: dictionary.to_string(),
                        first: structure.attributes[first].name.clone(),
                        second: spec.name.clone(),
                    });
                }
                hierarchical = Some(index);
            }

            attributes.push(Attribute::from_spec(dictionary, spec)?);
            index_by_name.insert(spec.name.clone(), index);
        }

        Ok(Self {
            attributes,
            index_by_name,
            hierarchical,
        })
    }

    /// Returns the attribute with the given name
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.index_of(name).map(|i| &self.attributes[i])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.attributes.get(index).map(Attribute::name)
    }

    /// Returns the first declared attribute
    pub fn first(&self) -> Option<&Attribute> {
        self.attributes.first()
    }

    /// Returns the hierarchical attribute, if one was declared
    pub fn hierarchical(&self) -> Option<&Attribute> {
        self.hierarchical.map(|i| &self.attributes[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Static size estimate: attribute descriptors plus string arenas
    pub fn bytes_allocated(&self) -> usize {
        self.attributes.iter().map(Attribute::bytes_allocated).sum()
    }
}
