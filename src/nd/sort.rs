//! ArraySort: the dimension order used to sort sparse array entries.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Ordered list of dimensions; entries are compared on the first listed
/// dimension, ties broken by the second, and so on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArraySort(Vec<usize>);

impl ArraySort {
    pub fn new(dimensions: impl Into<Vec<usize>>) -> Self {
        Self(dimensions.into())
    }

    /// Sort on dimensions `0, 1, .., n-1` in that order.
    pub fn natural(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Number of sort dimensions.
    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl Index<usize> for ArraySort {
    type Output = usize;
    fn index(&self, i: usize) -> &usize {
        &self.0[i]
    }
}

impl fmt::Display for ArraySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}
