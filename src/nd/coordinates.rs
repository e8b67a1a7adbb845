//! ArrayCoordinates: the index tuple of one element in an N-dimensional array.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::types::scalar::IdType;

/// One index per dimension.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArrayCoordinates(Vec<IdType>);

impl ArrayCoordinates {
    pub fn new(indices: impl Into<Vec<IdType>>) -> Self {
        Self(indices.into())
    }

    /// Zero coordinates with `n` dimensions.
    pub fn zeros(n: usize) -> Self {
        Self(vec![0; n])
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    /// Change the number of dimensions; new entries are zero.
    pub fn set_dimensions(&mut self, n: usize) {
        self.0.resize(n, 0);
    }

    #[inline]
    pub fn as_slice(&self) -> &[IdType] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<IdType> {
        self.0
    }
}

impl Index<usize> for ArrayCoordinates {
    type Output = IdType;
    fn index(&self, i: usize) -> &IdType {
        &self.0[i]
    }
}

impl IndexMut<usize> for ArrayCoordinates {
    fn index_mut(&mut self, i: usize) -> &mut IdType {
        &mut self.0[i]
    }
}

impl From<Vec<IdType>> for ArrayCoordinates {
    fn from(v: Vec<IdType>) -> Self {
        Self(v)
    }
}

impl From<&[IdType]> for ArrayCoordinates {
    fn from(v: &[IdType]) -> Self {
        Self(v.to_vec())
    }
}

impl<const N: usize> From<[IdType; N]> for ArrayCoordinates {
    fn from(v: [IdType; N]) -> Self {
        Self(v.to_vec())
    }
}

/// Prints as `{1,2,3}`.
impl fmt::Display for ArrayCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str("}")
    }
}
