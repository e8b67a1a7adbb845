//! Slice extraction over per-dimension [`ArrayRange`]s.
//!
//! A slice is returned as a new, zero-based array whose extents are the range
//! sizes. Dense slices copy every element in the region; sparse slices keep
//! only the entries whose coordinates fall inside every range.

use crate::array_error::ArrayError;
use crate::nd::array::{Array, ArrayValue, TypedArray};
use crate::nd::coordinates::ArrayCoordinates;
use crate::nd::dense::DenseArray;
use crate::nd::extents::ArrayExtents;
use crate::nd::range::ArrayRange;
use crate::nd::sparse::SparseArray;
use crate::types::scalar::IdType;

fn check_ranges(extents: &ArrayExtents, ranges: &[ArrayRange]) -> Result<(), ArrayError> {
    if ranges.len() != extents.dimensions() {
        return Err(ArrayError::DimensionMismatch {
            expected: extents.dimensions(),
            found: ranges.len(),
        });
    }
    for (whole, r) in extents.zero_based_ranges().iter().zip(ranges) {
        if !whole.contains_range(r) {
            log::error!("slice range {r} exceeds array extents {extents}");
            return Err(ArrayError::CoordinatesOutOfBounds {
                coordinates: r.to_string(),
                extents: extents.to_string(),
            });
        }
    }
    Ok(())
}

fn shift(c: &ArrayCoordinates, ranges: &[ArrayRange], sign: IdType) -> ArrayCoordinates {
    c.as_slice()
        .iter()
        .zip(ranges)
        .map(|(&x, r)| x + sign * r.begin())
        .collect::<Vec<_>>()
        .into()
}

/// Copy the region `ranges` of a dense array.
pub fn dense_slice<T: ArrayValue>(
    array: &DenseArray<T>,
    ranges: &[ArrayRange],
) -> Result<DenseArray<T>, ArrayError> {
    check_ranges(array.extents(), ranges)?;
    let mut out = DenseArray::with_extents(ArrayExtents::from_ranges(ranges))?;
    for d in 0..array.dimensions() {
        out.set_dimension_label(d, array.dimension_label(d))?;
    }
    for n in 0..out.non_null_size() {
        let local = out.coordinates_n(n)?;
        let v = array.value(&shift(&local, ranges, 1))?;
        out.set_value_n(n, v)?;
    }
    Ok(out)
}

/// Keep the entries of a sparse array that fall inside `ranges`.
pub fn sparse_slice<T: ArrayValue>(
    array: &SparseArray<T>,
    ranges: &[ArrayRange],
) -> Result<SparseArray<T>, ArrayError> {
    check_ranges(array.extents(), ranges)?;
    let mut out = SparseArray::with_extents(ArrayExtents::from_ranges(ranges))?;
    out.set_null_value(array.null_value().clone());
    for d in 0..array.dimensions() {
        out.set_dimension_label(d, array.dimension_label(d))?;
    }
    for n in 0..array.non_null_size() {
        let c = array.coordinates_n(n)?;
        let inside = c.as_slice().iter().zip(ranges).all(|(&x, r)| r.contains(x));
        if inside {
            out.add_value(&shift(&c, ranges, -1), array.value_n(n)?.clone())?;
        }
    }
    Ok(out)
}
