//! Fixed-point decimal values
//!
//! Decimals carry the raw scaled integer only. The scale belongs to the
//! external column description and is never interpreted here.

use std::fmt;

macro_rules! decimal_type {
    ($(#[$meta:meta])* $name:ident, $raw:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub $raw);

        impl $name {
            /// Returns the raw scaled integer
            pub fn raw(self) -> $raw {
                self.0
            }
        }

        impl From<$raw> for $name {
            fn from(raw: $raw) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

decimal_type!(
    /// Decimal backed by a 32-bit scaled integer
    Decimal32,
    i32
);
decimal_type!(
    /// Decimal backed by a 64-bit scaled integer
    Decimal64,
    i64
);
decimal_type!(
    /// Decimal backed by a 128-bit scaled integer
    Decimal128,
    i128
);
