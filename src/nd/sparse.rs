//! SparseArray: coordinate-list N-dimensional storage.
//!
//! Each materialized entry is one row across a set of per-dimension coordinate
//! columns and a value column. Any coordinate without an entry reads as the
//! array's null value.
//!
//! [`SparseArray::add_value`] appends without looking for an existing entry at
//! the same coordinates. Callers that cannot guarantee uniqueness should use
//! [`TypedArray::set_value`] or check with [`SparseArray::validate`]. When
//! duplicates exist, lookups return the entry that was added first.

use std::any::Any;
use std::cmp::Ordering;

use itertools::Itertools;

use crate::array_error::ArrayError;
use crate::debug_invariants::DebugInvariants;
use crate::nd::array::{Array, ArrayValue, StorageKind, TypedArray, convert_variant};
use crate::nd::coordinates::ArrayCoordinates;
use crate::nd::extents::ArrayExtents;
use crate::nd::sort::ArraySort;
use crate::types::scalar::IdType;
use crate::types::value_type::ValueType;
use crate::types::variant::Variant;

/// Sparse N-dimensional array of `T`.
///
/// # Invariants
/// - `coordinates.len() == extents.dimensions()`
/// - every coordinate column has `values.len()` entries
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseArray<T> {
    name: String,
    labels: Vec<String>,
    extents: ArrayExtents,
    coordinates: Vec<Vec<IdType>>,
    values: Vec<T>,
    null_value: T,
}

impl<T: ArrayValue> SparseArray<T> {
    /// Empty, zero-dimensional array with a `T::default()` null value.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            labels: Vec::new(),
            extents: ArrayExtents::default(),
            coordinates: Vec::new(),
            values: Vec::new(),
            null_value: T::default(),
        }
    }

    /// Empty array of the given shape.
    pub fn with_extents(extents: impl Into<ArrayExtents>) -> Result<Self, ArrayError> {
        let mut a = Self::new();
        a.resize(&extents.into())?;
        Ok(a)
    }

    /// Value returned for coordinates without an entry.
    pub fn null_value(&self) -> &T {
        &self.null_value
    }

    pub fn set_null_value(&mut self, value: T) {
        self.null_value = value;
    }

    /// Remove every entry, keeping the extents.
    pub fn clear(&mut self) {
        for column in &mut self.coordinates {
            column.clear();
        }
        self.values.clear();
    }

    /// Reserve room for `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        for column in &mut self.coordinates {
            column.reserve(additional);
        }
        self.values.reserve(additional);
    }

    /// Append an entry without checking for an existing one.
    ///
    /// # Errors
    /// `DimensionMismatch` if `coordinates` has the wrong dimensions.
    pub fn add_value(&mut self, coordinates: &ArrayCoordinates, value: T) -> Result<(), ArrayError> {
        self.check_dimensions(coordinates)?;
        for (column, &c) in self.coordinates.iter_mut().zip(coordinates.as_slice()) {
            column.push(c);
        }
        self.values.push(value);
        Ok(())
    }

    /// Coordinates along dimension `dim` for every entry, in entry order.
    pub fn coordinate_storage(&self, dim: usize) -> Option<&[IdType]> {
        self.coordinates.get(dim).map(Vec::as_slice)
    }

    /// Values for every entry, in entry order.
    pub fn value_storage(&self) -> &[T] {
        &self.values
    }

    pub fn value_storage_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Index of the first entry at `coordinates`.
    pub fn find(&self, coordinates: &ArrayCoordinates) -> Option<usize> {
        let target = coordinates.as_slice();
        if target.len() != self.coordinates.len() {
            return None;
        }
        (0..self.values.len()).find(|&row| {
            self.coordinates
                .iter()
                .zip(target)
                .all(|(column, &c)| column[row] == c)
        })
    }

    /// Stable-sort the entries by the dimensions listed in `sort`.
    ///
    /// # Errors
    /// `IndexOutOfRange` if `sort` names a dimension the array does not have.
    pub fn sort(&mut self, sort: &ArraySort) -> Result<(), ArrayError> {
        let dims = self.coordinates.len();
        if let Some(&bad) = sort.as_slice().iter().find(|&&d| d >= dims) {
            log::error!("sort dimension {bad} out of range for {dims}-d array");
            return Err(ArrayError::IndexOutOfRange { index: bad as i64, len: dims });
        }
        let mut order: Vec<usize> = (0..self.values.len()).collect();
        order.sort_by(|&a, &b| {
            sort.as_slice()
                .iter()
                .map(|&d| self.coordinates[d][a].cmp(&self.coordinates[d][b]))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        for column in &mut self.coordinates {
            *column = order.iter().map(|&i| column[i]).collect();
        }
        self.values = order.iter().map(|&i| self.values[i].clone()).collect();
        Ok(())
    }

    /// Sorted, distinct coordinates used along dimension `dim`.
    pub fn unique_coordinates(&self, dim: usize) -> Vec<IdType> {
        self.coordinates
            .get(dim)
            .map(|column| column.iter().copied().sorted_unstable().dedup().collect())
            .unwrap_or_default()
    }

    /// Replace the extents without touching the entries.
    ///
    /// # Errors
    /// `DimensionMismatch` if the dimensions change, `NegativeExtent` for a
    /// negative size, `CoordinatesOutOfBounds` if an entry would fall outside.
    pub fn set_extents(&mut self, extents: &ArrayExtents) -> Result<(), ArrayError> {
        if extents.dimensions() != self.coordinates.len() {
            log::error!("new extents {extents} must match array dimensions");
            return Err(ArrayError::DimensionMismatch {
                expected: self.coordinates.len(),
                found: extents.dimensions(),
            });
        }
        extents.validate_invariants()?;
        for row in 0..self.values.len() {
            let c = self.row_coordinates(row);
            if !extents.contains(&c) {
                return Err(ArrayError::CoordinatesOutOfBounds {
                    coordinates: c.to_string(),
                    extents: extents.to_string(),
                });
            }
        }
        self.extents = extents.clone();
        Ok(())
    }

    /// Shrink or grow the extents to the smallest shape holding every entry.
    pub fn set_extents_from_contents(&mut self) {
        let sizes: Vec<IdType> = self
            .coordinates
            .iter()
            .map(|column| column.iter().max().map_or(0, |m| m + 1))
            .collect();
        self.extents = sizes.into();
    }

    /// Check that every entry is in bounds and no coordinates repeat.
    pub fn validate(&self) -> Result<(), ArrayError> {
        let mut seen: Vec<ArrayCoordinates> = Vec::with_capacity(self.values.len());
        for row in 0..self.values.len() {
            let c = self.row_coordinates(row);
            if !self.extents.contains(&c) {
                log::error!("sparse entry {c} lies outside extents {}", self.extents);
                return Err(ArrayError::CoordinatesOutOfBounds {
                    coordinates: c.to_string(),
                    extents: self.extents.to_string(),
                });
            }
            seen.push(c);
        }
        seen.sort_unstable();
        if let Some((a, _)) = seen.iter().tuple_windows().find(|(a, b)| a == b) {
            log::error!("sparse array holds duplicate entries at {a}");
            return Err(ArrayError::DuplicateCoordinates(a.to_string()));
        }
        Ok(())
    }

    fn row_coordinates(&self, row: usize) -> ArrayCoordinates {
        self.coordinates
            .iter()
            .map(|column| column[row])
            .collect::<Vec<_>>()
            .into()
    }

    fn check_dimensions(&self, coordinates: &ArrayCoordinates) -> Result<(), ArrayError> {
        if coordinates.dimensions() != self.coordinates.len() {
            return Err(ArrayError::DimensionMismatch {
                expected: self.coordinates.len(),
                found: coordinates.dimensions(),
            });
        }
        Ok(())
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
}

impl<T: ArrayValue> Array for SparseArray<T> {
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
        self.coordinates = vec![Vec::new(); extents.dimensions()];
        self.values.clear();
        self.labels.resize(extents.dimensions(), String::new());
        self.extents = extents.clone();
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        self.debug_assert_invariants();
    }

    fn storage_kind(&self) -> StorageKind {
        StorageKind::Sparse
    }

    fn value_type(&self) -> ValueType {
        T::VALUE_TYPE
    }

    fn variant_value(&self, coordinates: &ArrayCoordinates) -> Result<Variant, ArrayError> {
        self.value(coordinates).map(|v| v.to_variant())
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
        Ok(self.row_coordinates(n))
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

impl<T: ArrayValue> TypedArray<T> for SparseArray<T> {
    /// Value at `coordinates`, or the null value when there is no entry.
    fn value(&self, coordinates: &ArrayCoordinates) -> Result<T, ArrayError> {
        self.check_dimensions(coordinates)?;
        Ok(self
            .find(coordinates)
            .map_or_else(|| self.null_value.clone(), |row| self.values[row].clone()))
    }

    /// Overwrite the first entry at `coordinates`, or append a new one.
    fn set_value(&mut self, coordinates: &ArrayCoordinates, value: T) -> Result<(), ArrayError> {
        self.check_dimensions(coordinates)?;
        if !self.extents.contains(coordinates) {
            return Err(ArrayError::CoordinatesOutOfBounds {
                coordinates: coordinates.to_string(),
                extents: self.extents.to_string(),
            });
        }
        match self.find(coordinates) {
            Some(row) => self.values[row] = value,
            None => self.add_value(coordinates, value)?,
        }
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

impl<T: ArrayValue> DebugInvariants for SparseArray<T> {
    const CONTAINER: &'static str = "SparseArray";

    fn validate_invariants(&self) -> Result<(), ArrayError> {
        self.extents.validate_invariants()?;
        let dims = self.extents.dimensions();
        if self.coordinates.len() != dims {
            return Err(ArrayError::DimensionMismatch {
                expected: dims,
                found: self.coordinates.len(),
            });
        }
        if let Some(column) = self.coordinates.iter().find(|c| c.len() != self.values.len()) {
            return Err(ArrayError::TupleCountMismatch {
                left: column.len(),
                right: self.values.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> SparseArray<f64> {
        let mut a = SparseArray::with_extents([4, 4]).unwrap();
        a.add_value(&[3, 1].into(), 31.0).unwrap();
        a.add_value(&[0, 2].into(), 2.0).unwrap();
        a.add_value(&[1, 1].into(), 11.0).unwrap();
        a
    }

    #[test]
    fn unset_coordinates_read_null() {
        let mut a = matrix();
        assert_eq!(a.value(&[2, 2].into()).unwrap(), 0.0);
        a.set_null_value(-1.0);
        assert_eq!(a.value(&[2, 2].into()).unwrap(), -1.0);
        assert_eq!(a.value(&[3, 1].into()).unwrap(), 31.0);
        assert_eq!(a.non_null_size(), 3);
        assert_eq!(a.size(), 16);
    }

    #[test]
    fn huge_shapes_stay_usable() {
        let mut a = SparseArray::<i32>::with_extents([1 << 32, 1 << 32]).unwrap();
        a.add_value(&[(1 << 32) - 1, 7].into(), 5).unwrap();
        assert_eq!(a.size(), IdType::MAX);
        assert_eq!(a.value(&[(1 << 32) - 1, 7].into()).unwrap(), 5);
    }

    #[test]
    fn set_value_overwrites_or_appends() {
        let mut a = matrix();
        a.set_value(&[3, 1].into(), 5.0).unwrap();
        assert_eq!(a.non_null_size(), 3);
        a.set_value(&[2, 3].into(), 23.0).unwrap();
        assert_eq!(a.non_null_size(), 4);
        assert!(a.set_value(&[4, 0].into(), 1.0).is_err());
    }

    #[test]
    fn duplicates_first_entry_wins_and_validate_reports() {
        let mut a = matrix();
        a.add_value(&[3, 1].into(), 99.0).unwrap();
        assert_eq!(a.value(&[3, 1].into()).unwrap(), 31.0);
        assert!(matches!(a.validate(), Err(ArrayError::DuplicateCoordinates(_))));
    }

    #[test]
    fn validate_reports_out_of_bounds() {
        let mut a = matrix();
        a.add_value(&[9, 0].into(), 1.0).unwrap();
        assert!(matches!(a.validate(), Err(ArrayError::CoordinatesOutOfBounds { .. })));
        a.set_extents_from_contents();
        assert_eq!(a.extents(), &ArrayExtents::from([10, 3]));
        assert!(a.validate().is_ok());
    }

    #[test]
    fn sort_orders_entries() {
        let mut a = matrix();
        a.sort(&ArraySort::natural(2)).unwrap();
        assert_eq!(a.coordinate_storage(0).unwrap(), &[0, 1, 3]);
        assert_eq!(a.value_storage(), &[2.0, 11.0, 31.0]);
        a.sort(&ArraySort::new(vec![1, 0])).unwrap();
        assert_eq!(a.coordinate_storage(1).unwrap(), &[1, 1, 2]);
        assert_eq!(a.value_storage(), &[11.0, 31.0, 2.0]);
        assert!(a.sort(&ArraySort::new(vec![2])).is_err());
    }

    #[test]
    fn coordinates_n_matches_value_n() {
        let a = matrix();
        for n in 0..a.non_null_size() {
            let c = a.coordinates_n(n).unwrap();
            assert_eq!(a.value(&c).unwrap(), *a.value_n(n).unwrap());
        }
    }

    #[test]
    fn unique_coordinates_and_extents() {
        let mut a = matrix();
        assert_eq!(a.unique_coordinates(1), vec![1, 2]);
        assert!(a.set_extents(&ArrayExtents::from([4, 2])).is_err());
        assert!(a.set_extents(&ArrayExtents::from([4, 3])).is_ok());
        assert!(a.set_extents(&ArrayExtents::from([4])).is_err());
    }

    #[test]
    fn resize_drops_entries() {
        let mut a = matrix();
        a.resize(&ArrayExtents::from([2, 2, 2])).unwrap();
        assert_eq!(a.non_null_size(), 0);
        assert_eq!(a.dimensions(), 3);
        assert!(a.validate_invariants().is_ok());
    }
}
