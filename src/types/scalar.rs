//! Mapping between Rust primitives and [`ValueType`] tags.
//!
//! Every numeric container in the crate is generic over [`Scalar`]. The trait
//! carries the runtime tag and the cast rules shared by all conversions:
//! float to integer truncates toward zero, out-of-range values saturate to the
//! target bounds, and NaN becomes zero.

use std::fmt::{Debug, Display};

use bytemuck::Pod;
use num_traits::{Bounded, NumCast, ToPrimitive, Zero};

use crate::types::value_type::ValueType;
use crate::types::variant::Variant;

/// Identifier type used for ids, extents and coordinates.
pub type IdType = i64;

/// Primitive element types storable in typed arrays.
pub trait Scalar:
    Copy
    + Default
    + PartialOrd
    + Debug
    + Display
    + NumCast
    + ToPrimitive
    + Bounded
    + Zero
    + Pod
    + Send
    + Sync
    + 'static
{
    /// Runtime tag for this primitive.
    const VALUE_TYPE: ValueType;

    /// Wrap the value in its matching [`Variant`] case.
    fn into_variant(self) -> Variant;

    /// Widen to `f64`.
    #[inline]
    fn as_f64(self) -> f64 {
        ToPrimitive::to_f64(&self).unwrap_or(0.0)
    }

    /// Cast from `f64`, truncating toward zero and saturating at the bounds.
    #[inline]
    fn from_f64(v: f64) -> Self {
        if v.is_nan() {
            return Self::zero();
        }
        match <Self as NumCast>::from(v) {
            Some(x) => x,
            None if v > 0.0 => Self::max_value(),
            None => Self::min_value(),
        }
    }

    /// Cast from another scalar, exact when the value fits.
    #[inline]
    fn cast_from<U: Scalar>(u: U) -> Self {
        match <Self as NumCast>::from(u) {
            Some(x) => x,
            None => Self::from_f64(u.as_f64()),
        }
    }

    /// True for integral primitives.
    #[inline]
    fn is_integral() -> bool {
        Self::VALUE_TYPE.is_integral()
    }
}

macro_rules! impl_scalar {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const VALUE_TYPE: ValueType = ValueType::$tag;

                #[inline]
                fn into_variant(self) -> Variant {
                    Variant::$tag(self)
                }
            }

            impl From<$ty> for Variant {
                fn from(v: $ty) -> Self {
                    Variant::$tag(v)
                }
            }
        )*
    };
}

impl_scalar! {
    i8 => Char,
    u8 => UnsignedChar,
    i16 => Short,
    u16 => UnsignedShort,
    i32 => Int,
    u32 => UnsignedInt,
    i64 => Long,
    u64 => UnsignedLong,
    f32 => Float,
    f64 => Double,
}
