//! Key/value sorting of 1-D arrays.
//!
//! Keys must have one component. A permutation is computed from the keys
//! with a comparator passed in by the caller (or the default for the key
//! kind) and then applied tuple-wise, so every value tuple stays with its
//! key. Sorting is stable.
//!
//! Default comparators: integer keys exactly in their own type, floating
//! point keys by `f64::total_cmp`, strings
//! lexicographically, variants by [`Variant::compare`].

use std::cmp::Ordering;

use crate::array_error::ArrayError;
use crate::data::abstract_array::AbstractArray;
use crate::types::scalar::IdType;
use crate::types::variant::Variant;

fn check_keys(keys: &AbstractArray) -> Result<usize, ArrayError> {
    let nc = keys.number_of_components();
    if nc != 1 {
        log::warn!("sort keys `{}` have {nc} components; expected 1", keys.name());
        return Err(ArrayError::MultiComponentKeys(nc));
    }
    Ok(keys.number_of_tuples())
}

fn check_values(n: usize, values: &AbstractArray) -> Result<(), ArrayError> {
    let m = values.number_of_tuples();
    if m != n {
        log::warn!("sort values `{}` have {m} tuples; keys have {n}", values.name());
        return Err(ArrayError::TupleCountMismatch { left: n, right: m });
    }
    Ok(())
}

/// Stable permutation that orders `keys` with the default comparator.
///
/// `perm[k]` is the index of the key that moves to position `k`.
pub fn sort_permutation(keys: &AbstractArray) -> Result<Vec<usize>, ArrayError> {
    let n = check_keys(keys)?;
    let mut perm: Vec<usize> = (0..n).collect();
    match keys {
        AbstractArray::Data(a) => {
            perm = a.sorted_order();
        }
        AbstractArray::String(a) => {
            let v = a.as_slice();
            perm.sort_by(|&i, &j| v[i].cmp(&v[j]));
        }
        AbstractArray::Variant(a) => {
            let v = a.as_slice();
            perm.sort_by(|&i, &j| v[i].compare(&v[j]));
        }
    }
    Ok(perm)
}

/// Stable permutation that orders `keys` with `cmp`.
pub fn sort_permutation_by<F>(keys: &AbstractArray, mut cmp: F) -> Result<Vec<usize>, ArrayError>
where
    F: FnMut(&Variant, &Variant) -> Ordering,
{
    let n = check_keys(keys)?;
    let v: Vec<Variant> = (0..n).filter_map(|i| keys.variant_value(i)).collect();
    let mut perm: Vec<usize> = (0..n).collect();
    perm.sort_by(|&i, &j| cmp(&v[i], &v[j]));
    Ok(perm)
}

/// Reorder the tuples of `array` so tuple `k` becomes old tuple `perm[k]`.
pub fn apply_permutation(array: &mut AbstractArray, perm: &[usize]) -> Result<(), ArrayError> {
    check_values(perm.len(), array)?;
    let source = array.clone();
    for (k, &from) in perm.iter().enumerate() {
        array.set_tuple_from(k as IdType, from as IdType, &source)?;
    }
    Ok(())
}

/// Sort `keys` in place.
///
/// # Errors
/// `MultiComponentKeys` when the keys carry more than one component.
pub fn sort_keys(keys: &mut AbstractArray) -> Result<(), ArrayError> {
    let perm = sort_permutation(keys)?;
    apply_permutation(keys, &perm)
}

/// Sort `keys` and move the tuples of `values` along with them.
///
/// `values` may have any number of components but must have as many tuples
/// as `keys` has values.
///
/// # Errors
/// `MultiComponentKeys` or `TupleCountMismatch`; neither array is modified.
pub fn sort_keys_values(
    keys: &mut AbstractArray,
    values: &mut AbstractArray,
) -> Result<(), ArrayError> {
    let n = check_keys(keys)?;
    check_values(n, values)?;
    let perm = sort_permutation(keys)?;
    apply_permutation(keys, &perm)?;
    apply_permutation(values, &perm)
}

/// Like [`sort_keys_values`], ordering keys with `cmp`.
pub fn sort_keys_values_by<F>(
    keys: &mut AbstractArray,
    values: &mut AbstractArray,
    cmp: F,
) -> Result<(), ArrayError>
where
    F: FnMut(&Variant, &Variant) -> Ordering,
{
    let n = check_keys(keys)?;
    check_values(n, values)?;
    let perm = sort_permutation_by(keys, cmp)?;
    apply_permutation(keys, &perm)?;
    apply_permutation(values, &perm)
}
