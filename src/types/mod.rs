//! Value types: the runtime type tag, the primitive mapping and the variant.

pub mod scalar;
pub mod value_type;
pub mod variant;

pub use scalar::{IdType, Scalar};
pub use value_type::ValueType;
pub use variant::{Variant, VariantKey, variant_equal, variant_less_than};
