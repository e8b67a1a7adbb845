//! ArrayExtents: the shape of an N-dimensional array.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::array_error::ArrayError;
use crate::debug_invariants::DebugInvariants;
use crate::nd::coordinates::ArrayCoordinates;
use crate::nd::range::ArrayRange;
use crate::types::scalar::IdType;

/// Size of each dimension of an N-dimensional array.
///
/// # Invariants
/// Every entry is non-negative once the extents have been accepted by an
/// array (see [`validate_invariants`](DebugInvariants::validate_invariants)).
/// Plain construction does not check, so a caller can build malformed extents
/// and have `resize` reject them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayExtents(Vec<IdType>);

impl ArrayExtents {
    /// Extents from an explicit list of sizes.
    pub fn new(sizes: impl Into<Vec<IdType>>) -> Self {
        Self(sizes.into())
    }

    /// `n` dimensions, each of size `size`.
    pub fn uniform(n: usize, size: IdType) -> Self {
        Self(vec![size; n])
    }

    /// Number of dimensions.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    /// Total number of addressable elements; `0` for zero dimensions.
    ///
    /// A product too large for [`IdType`] saturates at `IdType::MAX`, so
    /// huge sparse shapes report a size instead of overflowing.
    pub fn size(&self) -> IdType {
        if self.0.is_empty() {
            return 0;
        }
        self.0.iter().fold(1, |acc: IdType, &e| acc.saturating_mul(e))
    }

    /// Add a dimension of the given size.
    pub fn append(&mut self, extent: IdType) {
        self.0.push(extent);
    }

    /// Change the number of dimensions; new dimensions get size 0.
    pub fn set_dimensions(&mut self, n: usize) {
        self.0.resize(n, 0);
    }

    /// Sizes as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[IdType] {
        &self.0
    }

    /// True when both extents have the same dimensions and sizes.
    pub fn same_shape(&self, other: &ArrayExtents) -> bool {
        self == other
    }

    /// True when `coordinates` has matching dimensions and lies in bounds.
    pub fn contains(&self, coordinates: &ArrayCoordinates) -> bool {
        coordinates.dimensions() == self.dimensions()
            && coordinates
                .as_slice()
                .iter()
                .zip(&self.0)
                .all(|(&c, &e)| c >= 0 && c < e)
    }

    /// One `[0, extent)` range per dimension.
    pub fn zero_based_ranges(&self) -> Vec<ArrayRange> {
        self.0.iter().map(|&e| ArrayRange::new(0, e)).collect()
    }

    /// Extents whose dimensions are the sizes of `ranges`.
    pub fn from_ranges(ranges: &[ArrayRange]) -> Self {
        Self(ranges.iter().map(ArrayRange::size).collect())
    }

    /// First dimension with a negative size, with that size.
    pub fn first_negative(&self) -> Option<(usize, IdType)> {
        self.0
            .iter()
            .copied()
            .enumerate()
            .find(|&(_, e)| e < 0)
    }
}

impl Index<usize> for ArrayExtents {
    type Output = IdType;
    fn index(&self, i: usize) -> &IdType {
        &self.0[i]
    }
}

impl IndexMut<usize> for ArrayExtents {
    fn index_mut(&mut self, i: usize) -> &mut IdType {
        &mut self.0[i]
    }
}

impl From<Vec<IdType>> for ArrayExtents {
    fn from(v: Vec<IdType>) -> Self {
        Self(v)
    }
}

impl<const N: usize> From<[IdType; N]> for ArrayExtents {
    fn from(v: [IdType; N]) -> Self {
        Self(v.to_vec())
    }
}

/// Prints as `2x3x4`.
impl fmt::Display for ArrayExtents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("x")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl DebugInvariants for ArrayExtents {
    const CONTAINER: &'static str = "ArrayExtents";

    fn validate_invariants(&self) -> Result<(), ArrayError> {
        match self.first_negative() {
            Some((dimension, extent)) => Err(ArrayError::NegativeExtent { dimension, extent }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_product_or_zero() {
        assert_eq!(ArrayExtents::default().size(), 0);
        assert_eq!(ArrayExtents::from([2, 3, 4]).size(), 24);
        assert_eq!(ArrayExtents::from([5, 0]).size(), 0);
        assert_eq!(ArrayExtents::uniform(3, 2).size(), 8);
    }

    #[test]
    fn size_saturates_on_overflow() {
        assert_eq!(ArrayExtents::from([1 << 32, 1 << 32]).size(), IdType::MAX);
        assert_eq!(ArrayExtents::from([1 << 32, 1 << 32, 0]).size(), 0);
    }

    #[test]
    fn append_and_set_dimensions() {
        let mut e = ArrayExtents::from([4]);
        e.append(2);
        assert_eq!(e.dimensions(), 2);
        e.set_dimensions(3);
        assert_eq!(e.as_slice(), &[4, 2, 0]);
        e[2] = 7;
        assert_eq!(e.to_string(), "4x2x7");
    }

    #[test]
    fn containment() {
        let e = ArrayExtents::from([2, 3]);
        assert!(e.contains(&ArrayCoordinates::from([1, 2])));
        assert!(!e.contains(&ArrayCoordinates::from([2, 0])));
        assert!(!e.contains(&ArrayCoordinates::from([-1, 0])));
        assert!(!e.contains(&ArrayCoordinates::from([1])));
    }

    #[test]
    fn negative_entries_fail_validation() {
        let e = ArrayExtents::from([3, -1]);
        assert_eq!(
            e.validate_invariants(),
            Err(ArrayError::NegativeExtent { dimension: 1, extent: -1 })
        );
    }
}
