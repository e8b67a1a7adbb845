//! Runtime value-type tags.
//!
//! `ValueType` is the closed enumeration every array and variant reports as
//! its element type. Factories ([`create_array`](crate::nd::array::create_array),
//! [`create_data_array`](crate::data::abstract_array::create_data_array)) key on
//! it, and the sum types in [`crate::data`] dispatch over it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Element type tag for arrays and variants.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueType {
    Bit,
    Char,
    UnsignedChar,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    Float,
    Double,
    IdType,
    String,
    Variant,
}

impl ValueType {
    /// Every tag, in code order.
    pub const ALL: [ValueType; 14] = [
        ValueType::Bit,
        ValueType::Char,
        ValueType::UnsignedChar,
        ValueType::Short,
        ValueType::UnsignedShort,
        ValueType::Int,
        ValueType::UnsignedInt,
        ValueType::Long,
        ValueType::UnsignedLong,
        ValueType::Float,
        ValueType::Double,
        ValueType::IdType,
        ValueType::String,
        ValueType::Variant,
    ];

    /// Returns a stable string label for the value type.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Bit => "bit",
            ValueType::Char => "char",
            ValueType::UnsignedChar => "unsigned_char",
            ValueType::Short => "short",
            ValueType::UnsignedShort => "unsigned_short",
            ValueType::Int => "int",
            ValueType::UnsignedInt => "unsigned_int",
            ValueType::Long => "long",
            ValueType::UnsignedLong => "unsigned_long",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::IdType => "id_type",
            ValueType::String => "string",
            ValueType::Variant => "variant",
        }
    }

    /// Parse a value type from its string label.
    pub fn parse(tag: &str) -> Option<Self> {
        ValueType::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    /// True for the tags backed by a primitive number (including `Bit`).
    pub fn is_numeric(self) -> bool {
        !matches!(self, ValueType::String | ValueType::Variant)
    }

    /// True for integral numeric tags.
    pub fn is_integral(self) -> bool {
        self.is_numeric() && !matches!(self, ValueType::Float | ValueType::Double)
    }

    /// True for signed numeric tags.
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            ValueType::Char
                | ValueType::Short
                | ValueType::Int
                | ValueType::Long
                | ValueType::IdType
                | ValueType::Float
                | ValueType::Double
        )
    }

    /// Tag whose storage backs this one. `IdType` shares `i64` storage with `Long`.
    pub fn canonical(self) -> Self {
        match self {
            ValueType::IdType => ValueType::Long,
            other => other,
        }
    }

    /// Size of one element in bytes. `Bit` reports 0 (packed), string and
    /// variant report the size of their in-memory handle.
    pub fn size_in_bytes(self) -> usize {
        match self {
            ValueType::Bit => 0,
            ValueType::Char | ValueType::UnsignedChar => 1,
            ValueType::Short | ValueType::UnsignedShort => 2,
            ValueType::Int | ValueType::UnsignedInt | ValueType::Float => 4,
            ValueType::Long | ValueType::UnsignedLong | ValueType::Double | ValueType::IdType => 8,
            ValueType::String => std::mem::size_of::<String>(),
            ValueType::Variant => std::mem::size_of::<crate::types::variant::Variant>(),
        }
    }

    /// Smallest representable value, as `f64`. `None` for non-numeric tags.
    pub fn min_value(self) -> Option<f64> {
        Some(match self {
            ValueType::Bit => 0.0,
            ValueType::Char => i8::MIN as f64,
            ValueType::UnsignedChar => 0.0,
            ValueType::Short => i16::MIN as f64,
            ValueType::UnsignedShort => 0.0,
            ValueType::Int => i32::MIN as f64,
            ValueType::UnsignedInt => 0.0,
            ValueType::Long | ValueType::IdType => i64::MIN as f64,
            ValueType::UnsignedLong => 0.0,
            ValueType::Float => f32::MIN as f64,
            ValueType::Double => f64::MIN,
            ValueType::String | ValueType::Variant => return None,
        })
    }

    /// Largest representable value, as `f64`. `None` for non-numeric tags.
    pub fn max_value(self) -> Option<f64> {
        Some(match self {
            ValueType::Bit => 1.0,
            ValueType::Char => i8::MAX as f64,
            ValueType::UnsignedChar => u8::MAX as f64,
            ValueType::Short => i16::MAX as f64,
            ValueType::UnsignedShort => u16::MAX as f64,
            ValueType::Int => i32::MAX as f64,
            ValueType::UnsignedInt => u32::MAX as f64,
            ValueType::Long | ValueType::IdType => i64::MAX as f64,
            ValueType::UnsignedLong => u64::MAX as f64,
            ValueType::Float => f32::MAX as f64,
            ValueType::Double => f64::MAX,
            ValueType::String | ValueType::Variant => return None,
        })
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for t in ValueType::ALL {
            assert_eq!(ValueType::parse(t.as_str()), Some(t));
        }
        assert_eq!(ValueType::parse("quad"), None);
    }

    #[test]
    fn classification() {
        assert!(ValueType::Bit.is_integral());
        assert!(!ValueType::Double.is_integral());
        assert!(!ValueType::String.is_numeric());
        assert!(ValueType::IdType.is_signed());
        assert!(!ValueType::UnsignedLong.is_signed());
        assert_eq!(ValueType::IdType.canonical(), ValueType::Long);
    }

    #[test]
    fn bounds() {
        assert_eq!(ValueType::UnsignedChar.max_value(), Some(255.0));
        assert_eq!(ValueType::Short.min_value(), Some(-32768.0));
        assert_eq!(ValueType::Bit.max_value(), Some(1.0));
        assert_eq!(ValueType::String.max_value(), None);
    }
}
