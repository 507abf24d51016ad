//! Attribute type system for directdict
//!
//! Every dictionary attribute has exactly one underlying type drawn from a
//! closed set:
//! - unsigned integers: UInt8, UInt16, UInt32, UInt64, UInt128
//! - signed integers: Int8, Int16, Int32, Int64
//! - floating point: Float32, Float64
//! - fixed-point decimals: Decimal32, Decimal64, Decimal128
//! - String
//!
//! Operations that behave uniformly over the set are written once, generic
//! over [`AttributeValue`], and instantiated from a runtime type tag through
//! `with_underlying_type!`.

mod decimal;
mod underlying;
mod value;

pub use decimal::{Decimal128, Decimal32, Decimal64};
pub use underlying::{AttributeUnderlyingType, AttributeValue};
pub use value::Value;

pub(crate) use underlying::with_underlying_type;

/// Dictionary key. The hierarchical attribute's null value marks "no parent".
pub type Key = u64;
