//! N-dimensional array interface.
//!
//! [`Array`] is the object-safe, variant-typed view shared by every storage
//! strategy; [`TypedArray`] adds strongly typed access for one element type.
//! [`create_array`] builds an empty array from a `(StorageKind, ValueType)`
//! pair.
//!
//! Linear access (`*_n` methods) visits the materialized values only, in an
//! order that is storage specific but consistent between
//! [`Array::coordinates_n`] and the value accessors for the same `n`.

use std::any::Any;
use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

use crate::array_error::ArrayError;
use crate::nd::coordinates::ArrayCoordinates;
use crate::nd::dense::DenseArray;
use crate::nd::extents::ArrayExtents;
use crate::nd::sparse::SparseArray;
use crate::types::scalar::{IdType, Scalar};
use crate::types::value_type::ValueType;
use crate::types::variant::Variant;

/// Storage strategy of an N-dimensional array.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum StorageKind {
    Dense,
    Sparse,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Dense => "dense",
            StorageKind::Sparse => "sparse",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element types storable in N-dimensional arrays.
pub trait ArrayValue: Clone + Default + Debug + PartialEq + Send + Sync + 'static {
    /// Runtime tag reported by arrays of this element type.
    const VALUE_TYPE: ValueType;

    fn to_variant(&self) -> Variant;

    /// `None` when the variant has no reading as `Self`.
    fn from_variant(v: &Variant) -> Option<Self>;
}

impl<T: Scalar> ArrayValue for T {
    const VALUE_TYPE: ValueType = <T as Scalar>::VALUE_TYPE;

    fn to_variant(&self) -> Variant {
        self.into_variant()
    }

    fn from_variant(v: &Variant) -> Option<Self> {
        v.to_numeric::<T>()
    }
}

impl ArrayValue for String {
    const VALUE_TYPE: ValueType = ValueType::String;

    fn to_variant(&self) -> Variant {
        Variant::String(self.clone())
    }

    fn from_variant(v: &Variant) -> Option<Self> {
        Some(v.to_string())
    }
}

impl ArrayValue for Variant {
    const VALUE_TYPE: ValueType = ValueType::Variant;

    fn to_variant(&self) -> Variant {
        self.clone()
    }

    fn from_variant(v: &Variant) -> Option<Self> {
        Some(v.clone())
    }
}

/// Convert a variant for storage in an array of `T`.
pub(crate) fn convert_variant<T: ArrayValue>(v: &Variant) -> Result<T, ArrayError> {
    T::from_variant(v).ok_or(ArrayError::InvalidConversion {
        from: v.value_type().unwrap_or(ValueType::Variant),
        to: T::VALUE_TYPE,
    })
}

/// Object-safe interface shared by dense and sparse N-dimensional arrays.
pub trait Array: Debug + Send + Sync {
    /// Optional array name; empty when unset.
    fn name(&self) -> &str;

    fn set_name(&mut self, name: &str);

    /// Label of dimension `i`; empty when unset or out of range.
    fn dimension_label(&self, i: usize) -> &str;

    fn set_dimension_label(&mut self, i: usize, label: &str) -> Result<(), ArrayError>;

    fn extents(&self) -> &ArrayExtents;

    fn dimensions(&self) -> usize {
        self.extents().dimensions()
    }

    /// Number of addressable elements.
    fn size(&self) -> IdType {
        self.extents().size()
    }

    /// Number of materialized values.
    fn non_null_size(&self) -> usize;

    /// Reshape the array, discarding all prior contents.
    ///
    /// # Errors
    /// `NegativeExtent` if any requested extent is negative; the array is
    /// left untouched.
    fn resize(&mut self, extents: &ArrayExtents) -> Result<(), ArrayError> {
        if let Some((dimension, extent)) = extents.first_negative() {
            log::error!("cannot create array with extents {extents}: dimension {dimension} is negative");
            return Err(ArrayError::NegativeExtent { dimension, extent });
        }
        self.internal_resize(extents);
        Ok(())
    }

    /// Storage-specific reshape; `extents` are known to be valid.
    fn internal_resize(&mut self, extents: &ArrayExtents);

    fn storage_kind(&self) -> StorageKind;

    fn is_dense(&self) -> bool {
        self.storage_kind() == StorageKind::Dense
    }

    fn is_sparse(&self) -> bool {
        self.storage_kind() == StorageKind::Sparse
    }

    fn value_type(&self) -> ValueType;

    fn variant_value(&self, coordinates: &ArrayCoordinates) -> Result<Variant, ArrayError>;

    fn set_variant_value(
        &mut self,
        coordinates: &ArrayCoordinates,
        value: &Variant,
    ) -> Result<(), ArrayError>;

    /// Value of the `n`-th materialized element.
    fn variant_value_n(&self, n: usize) -> Result<Variant, ArrayError>;

    fn set_variant_value_n(&mut self, n: usize, value: &Variant) -> Result<(), ArrayError>;

    /// Coordinates of the `n`-th materialized element.
    fn coordinates_n(&self, n: usize) -> Result<ArrayCoordinates, ArrayError>;

    /// Independent copy with the same storage kind, value type and contents.
    fn deep_copy(&self) -> Box<dyn Array>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Array {
    /// Downcast to a concrete array type.
    pub fn downcast_ref<A: Array + 'static>(&self) -> Option<&A> {
        self.as_any().downcast_ref::<A>()
    }

    pub fn downcast_mut<A: Array + 'static>(&mut self) -> Option<&mut A> {
        self.as_any_mut().downcast_mut::<A>()
    }
}

/// Strongly typed access on top of [`Array`].
pub trait TypedArray<T: ArrayValue>: Array {
    fn value(&self, coordinates: &ArrayCoordinates) -> Result<T, ArrayError>;

    fn set_value(&mut self, coordinates: &ArrayCoordinates, value: T) -> Result<(), ArrayError>;

    fn value_n(&self, n: usize) -> Result<&T, ArrayError>;

    fn set_value_n(&mut self, n: usize, value: T) -> Result<(), ArrayError>;

    /// Overwrite every materialized value with `value`.
    fn fill(&mut self, value: T);
}

macro_rules! boxed_array {
    ($kind:expr, $ty:ty) => {
        match $kind {
            StorageKind::Dense => Box::new(DenseArray::<$ty>::new()) as Box<dyn Array>,
            StorageKind::Sparse => Box::new(SparseArray::<$ty>::new()) as Box<dyn Array>,
        }
    };
}

/// Build an empty, zero-dimensional array of the given storage and type.
///
/// `IdType` arrays share `i64` storage with `Long` and report `Long`.
///
/// # Errors
/// `UnsupportedValueType` for `Bit`, which has no N-dimensional storage.
pub fn create_array(kind: StorageKind, value_type: ValueType) -> Result<Box<dyn Array>, ArrayError> {
    Ok(match value_type {
        ValueType::Char => boxed_array!(kind, i8),
        ValueType::UnsignedChar => boxed_array!(kind, u8),
        ValueType::Short => boxed_array!(kind, i16),
        ValueType::UnsignedShort => boxed_array!(kind, u16),
        ValueType::Int => boxed_array!(kind, i32),
        ValueType::UnsignedInt => boxed_array!(kind, u32),
        ValueType::Long | ValueType::IdType => boxed_array!(kind, i64),
        ValueType::UnsignedLong => boxed_array!(kind, u64),
        ValueType::Float => boxed_array!(kind, f32),
        ValueType::Double => boxed_array!(kind, f64),
        ValueType::String => boxed_array!(kind, String),
        ValueType::Variant => boxed_array!(kind, Variant),
        ValueType::Bit => {
            log::warn!("cannot create {kind} array of type {value_type}");
            return Err(ArrayError::UnsupportedValueType(value_type));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_matches_request() {
        for t in [ValueType::Int, ValueType::Double, ValueType::String, ValueType::Variant] {
            for kind in [StorageKind::Dense, StorageKind::Sparse] {
                let a = create_array(kind, t).unwrap();
                assert_eq!(a.value_type(), t);
                assert_eq!(a.storage_kind(), kind);
                assert_eq!(a.dimensions(), 0);
            }
        }
        assert_eq!(
            create_array(StorageKind::Dense, ValueType::IdType).unwrap().value_type(),
            ValueType::Long
        );
        assert!(matches!(
            create_array(StorageKind::Sparse, ValueType::Bit),
            Err(ArrayError::UnsupportedValueType(ValueType::Bit))
        ));
    }

    #[test]
    fn resize_rejects_negative_extents() {
        let mut a = create_array(StorageKind::Dense, ValueType::Float).unwrap();
        a.resize(&ArrayExtents::from([2, 2])).unwrap();
        let err = a.resize(&ArrayExtents::from([3, -2])).unwrap_err();
        assert_eq!(err, ArrayError::NegativeExtent { dimension: 1, extent: -2 });
        assert_eq!(a.extents(), &ArrayExtents::from([2, 2]));
    }

    #[test]
    fn downcast_to_concrete() {
        let mut a = create_array(StorageKind::Sparse, ValueType::Double).unwrap();
        assert!(a.downcast_ref::<SparseArray<f64>>().is_some());
        assert!(a.downcast_ref::<DenseArray<f64>>().is_none());
        a.downcast_mut::<SparseArray<f64>>().unwrap().set_null_value(-1.0);
    }

    #[test]
    fn variant_conversion_failure() {
        let err = convert_variant::<i32>(&Variant::from("x")).unwrap_err();
        assert_eq!(
            err,
            ArrayError::InvalidConversion { from: ValueType::String, to: ValueType::Int }
        );
    }
}
