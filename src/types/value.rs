//! Columnar values
//!
//! `Value` is the tagged variant held by source columns. JSON conversion is
//! driven by a declared type, never guessed from the JSON shape alone.

use std::fmt;

use serde_json::Value as JsonValue;

use super::decimal::{Decimal128, Decimal32, Decimal64};
use super::underlying::AttributeUnderlyingType;

/// A single typed value from the closed attribute type set
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    UInt128(u128),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Decimal32(Decimal32),
    Decimal64(Decimal64),
    Decimal128(Decimal128),
    String(String),
}

impl Value {
    /// Returns the type tag of this value
    pub fn underlying_type(&self) -> AttributeUnderlyingType {
        match self {
            Value::UInt8(_) => AttributeUnderlyingType::UInt8,
            Value::UInt16(_) => AttributeUnderlyingType::UInt16,
            Value::UInt32(_) => AttributeUnderlyingType::UInt32,
            Value::UInt64(_) => AttributeUnderlyingType::UInt64,
            Value::UInt128(_) => AttributeUnderlyingType::UInt128,
            Value::Int8(_) => AttributeUnderlyingType::Int8,
            Value::Int16(_) => AttributeUnderlyingType::Int16,
            Value::Int32(_) => AttributeUnderlyingType::Int32,
            Value::Int64(_) => AttributeUnderlyingType::Int64,
            Value::Float32(_) => AttributeUnderlyingType::Float32,
            Value::Float64(_) => AttributeUnderlyingType::Float64,
            Value::Decimal32(_) => AttributeUnderlyingType::Decimal32,
            Value::Decimal64(_) => AttributeUnderlyingType::Decimal64,
            Value::Decimal128(_) => AttributeUnderlyingType::Decimal128,
            Value::String(_) => AttributeUnderlyingType::String,
        }
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        self.underlying_type().type_name()
    }

    /// Returns the zero value of a type (empty string for String)
    pub fn default_for(ty: AttributeUnderlyingType) -> Value {
        match ty {
            AttributeUnderlyingType::UInt8 => Value::UInt8(0),
            AttributeUnderlyingType::UInt16 => Value::UInt16(0),
            AttributeUnderlyingType::UInt32 => Value::UInt32(0),
            AttributeUnderlyingType::UInt64 => Value::UInt64(0),
            AttributeUnderlyingType::UInt128 => Value::UInt128(0),
            AttributeUnderlyingType::Int8 => Value::Int8(0),
            AttributeUnderlyingType::Int16 => Value::Int16(0),
            AttributeUnderlyingType::Int32 => Value::Int32(0),
            AttributeUnderlyingType::Int64 => Value::Int64(0),
            AttributeUnderlyingType::Float32 => Value::Float32(0.0),
            AttributeUnderlyingType::Float64 => Value::Float64(0.0),
            AttributeUnderlyingType::Decimal32 => Value::Decimal32(Decimal32::default()),
            AttributeUnderlyingType::Decimal64 => Value::Decimal64(Decimal64::default()),
            AttributeUnderlyingType::Decimal128 => Value::Decimal128(Decimal128::default()),
            AttributeUnderlyingType::String => Value::String(String::new()),
        }
    }

    /// Converts a JSON value into a value of the declared type.
    ///
    /// JSON `null` yields the type's zero value. 128-bit types also accept
    /// decimal strings since JSON numbers stop at 64 bits.
    pub fn from_json(ty: AttributeUnderlyingType, json: &JsonValue) -> Result<Value, String> {
        if json.is_null() {
            return Ok(Value::default_for(ty));
        }

        let value = match ty {
            AttributeUnderlyingType::UInt8 => Value::UInt8(narrow(unsigned(json)?, ty)?),
            AttributeUnderlyingType::UInt16 => Value::UInt16(narrow(unsigned(json)?, ty)?),
            AttributeUnderlyingType::UInt32 => Value::UInt32(narrow(unsigned(json)?, ty)?),
            AttributeUnderlyingType::UInt64 => Value::UInt64(unsigned(json)?),
            AttributeUnderlyingType::UInt128 => Value::UInt128(wide_unsigned(json)?),
            AttributeUnderlyingType::Int8 => Value::Int8(narrow(signed(json)?, ty)?),
            AttributeUnderlyingType::Int16 => Value::Int16(narrow(signed(json)?, ty)?),
            AttributeUnderlyingType::Int32 => Value::Int32(narrow(signed(json)?, ty)?),
            AttributeUnderlyingType::Int64 => Value::Int64(signed(json)?),
            AttributeUnderlyingType::Float32 => Value::Float32(float(json)? as f32),
            AttributeUnderlyingType::Float64 => Value::Float64(float(json)?),
            AttributeUnderlyingType::Decimal32 => {
                Value::Decimal32(Decimal32(narrow(signed(json)?, ty)?))
            }
            AttributeUnderlyingType::Decimal64 => Value::Decimal64(Decimal64(signed(json)?)),
            AttributeUnderlyingType::Decimal128 => {
                Value::Decimal128(Decimal128(wide_signed(json)?))
            }
            AttributeUnderlyingType::String => match json.as_str() {
                Some(s) => Value::String(s.to_string()),
                None => return Err(format!("expected a string, got {}", json)),
            },
        };

        Ok(value)
    }

    /// Converts this value to JSON. 128-bit values are rendered as strings.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::UInt8(v) => JsonValue::from(*v),
            Value::UInt16(v) => JsonValue::from(*v),
            Value::UInt32(v) => JsonValue::from(*v),
            Value::UInt64(v) => JsonValue::from(*v),
            Value::UInt128(v) => JsonValue::String(v.to_string()),
            Value::Int8(v) => JsonValue::from(*v),
            Value::Int16(v) => JsonValue::from(*v),
            Value::Int32(v) => JsonValue::from(*v),
            Value::Int64(v) => JsonValue::from(*v),
            // Go through the shortest decimal form so 0.1f32 renders as 0.1.
            Value::Float32(v) => v
                .to_string()
                .parse::<f64>()
                .map(JsonValue::from)
                .unwrap_or(JsonValue::Null),
            Value::Float64(v) => JsonValue::from(*v),
            Value::Decimal32(v) => JsonValue::from(v.raw()),
            Value::Decimal64(v) => JsonValue::from(v.raw()),
            Value::Decimal128(v) => JsonValue::String(v.raw().to_string()),
            Value::String(v) => JsonValue::String(v.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(v) => write!(f, "'{}'", v),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

fn unsigned(json: &JsonValue) -> Result<u64, String> {
    json.as_u64()
        .ok_or_else(|| format!("expected an unsigned integer, got {}", json))
}

fn signed(json: &JsonValue) -> Result<i64, String> {
    json.as_i64()
        .ok_or_else(|| format!("expected a signed integer, got {}", json))
}

fn float(json: &JsonValue) -> Result<f64, String> {
    json.as_f64()
        .ok_or_else(|| format!("expected a number, got {}", json))
}

fn narrow<S, T>(value: S, ty: AttributeUnderlyingType) -> Result<T, String>
where
    S: Copy + fmt::Display,
    T: TryFrom<S>,
{
    T::try_from(value).map_err(|_| format!("{} is out of range for {}", value, ty))
}

fn wide_unsigned(json: &JsonValue) -> Result<u128, String> {
    match (json.as_u64(), json.as_str()) {
        (Some(n), _) => Ok(n.into()),
        (None, Some(s)) => s
            .trim()
            .parse::<u128>()
            .map_err(|e| format!("invalid 128-bit integer '{}': {}", s, e)),
        (None, None) => Err(format!("expected an unsigned integer or integer string, got {}", json)),
    }
}

fn wide_signed(json: &JsonValue) -> Result<i128, String> {
    match (json.as_i64(), json.as_str()) {
        (Some(n), _) => Ok(n.into()),
        (None, Some(s)) => s
            .trim()
            .parse::<i128>()
            .map_err(|e| format!("invalid 128-bit integer '{}': {}", s, e)),
        (None, None) => Err(format!("expected an integer or integer string, got {}", json)),
    }
}
