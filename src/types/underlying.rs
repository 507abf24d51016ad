//! Underlying attribute types and the typed access contract

use std::fmt;

use serde::{Deserialize, Serialize};

use super::decimal::{Decimal128, Decimal32, Decimal64};
use super::value::Value;

/// The closed set of types an attribute may declare
///
/// Configuration names are lowercase (`"uint64"`, `"float32"`, `"string"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeUnderlyingType {
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    UInt128,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal32,
    Decimal64,
    Decimal128,
    String,
}

impl AttributeUnderlyingType {
    /// All members of the closed set, in declaration order
    pub const ALL: [AttributeUnderlyingType; 15] = [
        AttributeUnderlyingType::UInt8,
        AttributeUnderlyingType::UInt16,
        AttributeUnderlyingType::UInt32,
        AttributeUnderlyingType::UInt64,
        AttributeUnderlyingType::UInt128,
        AttributeUnderlyingType::Int8,
        AttributeUnderlyingType::Int16,
        AttributeUnderlyingType::Int32,
        AttributeUnderlyingType::Int64,
        AttributeUnderlyingType::Float32,
        AttributeUnderlyingType::Float64,
        AttributeUnderlyingType::Decimal32,
        AttributeUnderlyingType::Decimal64,
        AttributeUnderlyingType::Decimal128,
        AttributeUnderlyingType::String,
    ];

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeUnderlyingType::UInt8 => "UInt8",
            AttributeUnderlyingType::UInt16 => "UInt16",
            AttributeUnderlyingType::UInt32 => "UInt32",
            AttributeUnderlyingType::UInt64 => "UInt64",
            AttributeUnderlyingType::UInt128 => "UInt128",
            AttributeUnderlyingType::Int8 => "Int8",
            AttributeUnderlyingType::Int16 => "Int16",
            AttributeUnderlyingType::Int32 => "Int32",
            AttributeUnderlyingType::Int64 => "Int64",
            AttributeUnderlyingType::Float32 => "Float32",
            AttributeUnderlyingType::Float64 => "Float64",
            AttributeUnderlyingType::Decimal32 => "Decimal32",
            AttributeUnderlyingType::Decimal64 => "Decimal64",
            AttributeUnderlyingType::Decimal128 => "Decimal128",
            AttributeUnderlyingType::String => "String",
        }
    }

    /// Returns the type a source delivers values of this type in.
    ///
    /// Float32 attributes travel through the wide Float64 representation and
    /// are narrowed on read. Every other type is delivered as itself.
    pub fn source_type(&self) -> AttributeUnderlyingType {
        match self {
            AttributeUnderlyingType::Float32 => AttributeUnderlyingType::Float64,
            other => *other,
        }
    }
}

impl fmt::Display for AttributeUnderlyingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Typed access to attribute values
///
/// Implemented exactly once per member of [`AttributeUnderlyingType`].
pub trait AttributeValue: Clone + Sized + 'static {
    /// The type tag this Rust type corresponds to
    const TYPE: AttributeUnderlyingType;

    /// Extracts a typed value from a source column value.
    ///
    /// Returns `None` when the column value has an incompatible variant.
    fn from_value(value: &Value) -> Option<Self>;

    /// Wraps a typed value back into the columnar representation
    fn into_value(self) -> Value;
}

macro_rules! impl_attribute_value {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl AttributeValue for $t {
                const TYPE: AttributeUnderlyingType = AttributeUnderlyingType::$variant;

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(*v),
                        _ => None,
                    }
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

impl_attribute_value!(
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    u128 => UInt128,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f64 => Float64,
    Decimal32 => Decimal32,
    Decimal64 => Decimal64,
    Decimal128 => Decimal128,
);

impl AttributeValue for f32 {
    const TYPE: AttributeUnderlyingType = AttributeUnderlyingType::Float32;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            // Narrowing from the wide representation is mandatory for Float32.
            Value::Float64(v) => Some(*v as f32),
            Value::Float32(v) => Some(*v),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Float32(self)
    }
}

impl AttributeValue for String {
    const TYPE: AttributeUnderlyingType = AttributeUnderlyingType::String;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }
}

/// Instantiates `$body` with `$T` bound to the Rust type of a runtime tag.
///
/// ```ignore
/// let name = with_underlying_type!(ty, T => T::TYPE.type_name());
/// ```
macro_rules! with_underlying_type {
    ($ty:expr, $T:ident => $body:expr) => {
        match $ty {
            $crate::types::AttributeUnderlyingType::UInt8 => {
                type $T = u8;
                $body
            }
            $crate::types::AttributeUnderlyingType::UInt16 => {
                type $T = u16;
                $body
            }
            $crate::types::AttributeUnderlyingType::UInt32 => {
                type $T = u32;
                $body
            }
            $crate::types::AttributeUnderlyingType::UInt64 => {
                type $T = u64;
                $body
            }
            $crate::types::AttributeUnderlyingType::UInt128 => {
                type $T = u128;
                $body
            }
            $crate::types::AttributeUnderlyingType::Int8 => {
                type $T = i8;
                $body
            }
            $crate::types::AttributeUnderlyingType::Int16 => {
                type $T = i16;
                $body
            }
            $crate::types::AttributeUnderlyingType::Int32 => {
                type $T = i32;
                $body
            }
            $crate::types::AttributeUnderlyingType::Int64 => {
                type $T = i64;
                $body
            }
            $crate::types::AttributeUnderlyingType::Float32 => {
                type $T = f32;
                $body
            }
            $crate::types::AttributeUnderlyingType::Float64 => {
                type $T = f64;
                $body
            }
            $crate::types::AttributeUnderlyingType::Decimal32 => {
                type $T = $crate::types::Decimal32;
                $body
            }
            $crate::types::AttributeUnderlyingType::Decimal64 => {
                type $T = $crate::types::Decimal64;
                $body
            }
            $crate::types::AttributeUnderlyingType::Decimal128 => {
                type $T = $crate::types::Decimal128;
                $body
            }
            $crate::types::AttributeUnderlyingType::String => {
                type $T = ::std::string::String;
                $body
            }
        }
    };
}

pub(crate) use with_underlying_type;
