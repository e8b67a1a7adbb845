//! DenseArray: contiguous N-dimensional storage.
//!
//! Values are laid out in Fortran order: the first coordinate varies fastest.
//! The stride table is recomputed on every resize, and a resize discards the
//! previous contents (new elements hold `T::default()`).

use std::any::Any;

use crate::array_error::ArrayError;
use crate::debug_invariants::DebugInvariants;
use crate::nd::array::{Array, ArrayValue, StorageKind, TypedArray, convert_variant};
use crate::nd::coordinates::ArrayCoordinates;
use crate::nd::extents::ArrayExtents;
use crate::types::scalar::IdType;
use crate::types::value_type::ValueType;
use crate::types::variant::Variant;

/// Contiguous N-dimensional array of `T`.
///
/// # Invariants
/// - `values.len() == extents.size()`
/// - `strides.len() == labels.len() == extents.dimensions()`
/// - `strides[0] == 1` and `strides[i] == strides[i-1] * extents[i-1]`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DenseArray<T> {
    name: String,
    labels: Vec<String>,
    extents: ArrayExtents,
    strides: Vec<IdType>,
    values: Vec<T>,
}

impl<T: ArrayValue> DenseArray<T> {
    /// Empty, zero-dimensional array.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            labels: Vec::new(),
            extents: ArrayExtents::default(),
            strides: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Array of the given shape, every element `T::default()`.
    pub fn with_extents(extents: impl Into<ArrayExtents>) -> Result<Self, ArrayError> {
        let mut a = Self::new();
        a.resize(&extents.into())?;
        Ok(a)
    }

    /// Stride of each dimension, in elements.
    pub fn strides(&self) -> &[IdType] {
        &self.strides
    }

    /// Storage in Fortran order.
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Linear offset of `coordinates`.
    ///
    /// # Errors
    /// `DimensionMismatch` or `CoordinatesOutOfBounds`.
    pub fn offset(&self, coordinates: &ArrayCoordinates) -> Result<usize, ArrayError> {
        if coordinates.dimensions() != self.extents.dimensions() {
            return Err(ArrayError::DimensionMismatch {
                expected: self.extents.dimensions(),
                found: coordinates.dimensions(),
            });
        }
        if !self.extents.contains(coordinates) {
            return Err(ArrayError::CoordinatesOutOfBounds {
                coordinates: coordinates.to_string(),
                extents: self.extents.to_string(),
            });
        }
        let offset: IdType = coordinates
            .as_slice()
            .iter()
            .zip(&self.strides)
            .map(|(c, s)| c * s)
            .sum();
        Ok(offset as usize)
    }

    fn check_n(&self, n: usize) -> Result<(), ArrayError> {
        if n >= self.values.len() {
            return Err(ArrayError::IndexOutOfRange {
                index: n as i64,
                len: self.values.len(),
            });
        }
        Ok(())
    }

    fn compute_strides(extents: &ArrayExtents) -> Vec<IdType> {
        let mut strides = Vec::with_capacity(extents.dimensions());
        let mut stride = 1;
        for &e in extents.as_slice() {
            strides.push(stride);
            stride *= e;
        }
        strides
    }
}

impl<T: ArrayValue> Array for DenseArray<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    fn dimension_label(&self, i: usize) -> &str {
        self.labels.get(i).map_or("", String::as_str)
    }

    fn set_dimension_label(&mut self, i: usize, label: &str) -> Result<(), ArrayError> {
        let dims = self.labels.len();
        let slot = self.labels.get_mut(i).ok_or(ArrayError::IndexOutOfRange {
            index: i as i64,
            len: dims,
        })?;
        *slot = label.to_owned();
        Ok(())
    }

    fn extents(&self) -> &ArrayExtents {
        &self.extents
    }

    fn non_null_size(&self) -> usize {
        self.values.len()
    }

    fn internal_resize(&mut self, extents: &ArrayExtents) {
        self.strides = Self::compute_strides(extents);
        self.values = vec![T::default(); extents.size() as usize];
        self.labels.resize(extents.dimensions(), String::new());
        self.extents = extents.clone();
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        self.debug_assert_invariants();
    }

    fn storage_kind(&self) -> StorageKind {
        StorageKind::Dense
    }

    fn value_type(&self) -> ValueType {
        T::VALUE_TYPE
    }

    fn variant_value(&self, coordinates: &ArrayCoordinates) -> Result<Variant, ArrayError> {
        Ok(self.values[self.offset(coordinates)?].to_variant())
    }

    fn set_variant_value(
        &mut self,
        coordinates: &ArrayCoordinates,
        value: &Variant,
    ) -> Result<(), ArrayError> {
        let v = convert_variant::<T>(value)?;
        self.set_value(coordinates, v)
    }

    fn variant_value_n(&self, n: usize) -> Result<Variant, ArrayError> {
        self.value_n(n).map(ArrayValue::to_variant)
    }

    fn set_variant_value_n(&mut self, n: usize, value: &Variant) -> Result<(), ArrayError> {
        let v = convert_variant::<T>(value)?;
        self.set_value_n(n, v)
    }

    fn coordinates_n(&self, n: usize) -> Result<ArrayCoordinates, ArrayError> {
        self.check_n(n)?;
        let n = n as IdType;
        let coords: Vec<IdType> = self
            .strides
            .iter()
            .zip(self.extents.as_slice())
            .map(|(&stride, &extent)| (n / stride) % extent)
            .collect();
        Ok(coords.into())
    }

    fn deep_copy(&self) -> Box<dyn Array> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: ArrayValue> TypedArray<T> for DenseArray<T> {
    fn value(&self, coordinates: &ArrayCoordinates) -> Result<T, ArrayError> {
        Ok(self.values[self.offset(coordinates)?].clone())
    }

    fn set_value(&mut self, coordinates: &ArrayCoordinates, value: T) -> Result<(), ArrayError> {
        let offset = self.offset(coordinates)?;
        self.values[offset] = value;
        Ok(())
    }

    fn value_n(&self, n: usize) -> Result<&T, ArrayError> {
        self.check_n(n)?;
        Ok(&self.values[n])
    }

    fn set_value_n(&mut self, n: usize, value: T) -> Result<(), ArrayError> {
        self.check_n(n)?;
        self.values[n] = value;
        Ok(())
    }

    fn fill(&mut self, value: T) {
        self.values.fill(value);
    }
}

impl<T: ArrayValue> DebugInvariants for DenseArray<T> {
    const CONTAINER: &'static str = "DenseArray";

    fn validate_invariants(&self) -> Result<(), ArrayError> {
        self.extents.validate_invariants()?;
        let dims = self.extents.dimensions();
        for len in [self.strides.len(), self.labels.len()] {
            if len != dims {
                return Err(ArrayError::DimensionMismatch { expected: dims, found: len });
            }
        }
        let expected = self.extents.size() as usize;
        if self.values.len() != expected {
            return Err(ArrayError::IndexOutOfRange {
                index: self.values.len() as i64,
                len: expected,
            });
        }
        if self.strides != Self::compute_strides(&self.extents) {
            return Err(ArrayError::DimensionMismatch { expected: dims, found: self.strides.len() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_then_set_single_value() {
        let mut a = DenseArray::<f64>::with_extents([2, 3]).unwrap();
        a.fill(0.0);
        a.set_value(&[1, 2].into(), 5.0).unwrap();
        assert_eq!(a.value(&[1, 2].into()).unwrap(), 5.0);
        let zeros = a.as_slice().iter().filter(|&&v| v == 0.0).count();
        assert_eq!(zeros, 5);
    }

    #[test]
    fn fortran_strides() {
        let a = DenseArray::<i32>::with_extents([2, 3, 4]).unwrap();
        assert_eq!(a.strides(), &[1, 2, 6]);
        assert_eq!(a.offset(&[1, 0, 0].into()).unwrap(), 1);
        assert_eq!(a.offset(&[0, 1, 0].into()).unwrap(), 2);
        assert_eq!(a.offset(&[1, 2, 3].into()).unwrap(), 23);
    }

    #[test]
    fn coordinates_n_round_trip() {
        let mut a = DenseArray::<i32>::with_extents([3, 2]).unwrap();
        for n in 0..a.non_null_size() {
            a.set_value_n(n, n as i32 * 10).unwrap();
        }
        for n in 0..a.non_null_size() {
            let c = a.coordinates_n(n).unwrap();
            assert_eq!(a.value(&c).unwrap(), *a.value_n(n).unwrap());
        }
    }

    #[test]
    fn out_of_bounds_is_error() {
        let a = DenseArray::<u8>::with_extents([2, 2]).unwrap();
        assert!(matches!(
            a.value(&[2, 0].into()),
            Err(ArrayError::CoordinatesOutOfBounds { .. })
        ));
        assert!(matches!(
            a.value(&[0].into()),
            Err(ArrayError::DimensionMismatch { expected: 2, found: 1 })
        ));
        assert!(a.value_n(4).is_err());
    }

    #[test]
    fn resize_discards_contents_and_keeps_labels() {
        let mut a = DenseArray::<f32>::with_extents([2]).unwrap();
        a.set_dimension_label(0, "rows").unwrap();
        a.fill(3.0);
        a.resize(&ArrayExtents::from([2, 2])).unwrap();
        assert!(a.as_slice().iter().all(|&v| v == 0.0));
        assert_eq!(a.dimension_label(0), "rows");
        assert_eq!(a.dimension_label(1), "");
        assert!(a.set_dimension_label(2, "x").is_err());
    }

    #[test]
    fn variant_access_converts() {
        let mut a = DenseArray::<i16>::with_extents([2]).unwrap();
        a.set_variant_value(&[1].into(), &Variant::from("7")).unwrap();
        assert_eq!(a.variant_value(&[1].into()).unwrap(), Variant::Short(7));
        assert!(a.set_variant_value_n(0, &Variant::from("seven")).is_err());
    }

    #[test]
    fn deep_copy_is_independent() {
        let mut a = DenseArray::<String>::with_extents([2]).unwrap();
        a.set_value(&[0].into(), "a".to_owned()).unwrap();
        let copy = a.deep_copy();
        a.set_value(&[0].into(), "b".to_owned()).unwrap();
        let copy = copy.downcast_ref::<DenseArray<String>>().unwrap();
        assert_eq!(copy.value(&[0].into()).unwrap(), "a");
        assert_eq!(copy.value_type(), ValueType::String);
    }
}
