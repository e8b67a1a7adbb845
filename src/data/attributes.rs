//! Attribute slots, their component-count rules, and copy modes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::array_error::ArrayError;
use crate::data::abstract_array::AbstractArray;

/// Number of attribute slots.
pub const NUM_ATTRIBUTES: usize = 5;

/// Named role an array can play in a [`DataSetAttributes`](crate::data::DataSetAttributes).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeType {
    Scalars,
    Vectors,
    Normals,
    TCoords,
    Tensors,
}

impl AttributeType {
    pub const ALL: [AttributeType; NUM_ATTRIBUTES] = [
        AttributeType::Scalars,
        AttributeType::Vectors,
        AttributeType::Normals,
        AttributeType::TCoords,
        AttributeType::Tensors,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AttributeType::Scalars => "Scalars",
            AttributeType::Vectors => "Vectors",
            AttributeType::Normals => "Normals",
            AttributeType::TCoords => "TCoords",
            AttributeType::Tensors => "Tensors",
        }
    }

    /// Slot position, `0..NUM_ATTRIBUTES`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn limit(self) -> AttributeLimit {
        match self {
            AttributeType::Scalars => AttributeLimit::NoLimit,
            AttributeType::Vectors | AttributeType::Normals => AttributeLimit::Exact(3),
            AttributeType::TCoords => AttributeLimit::Max(3),
            AttributeType::Tensors => AttributeLimit::Exact(9),
        }
    }

    /// Check that `array` may fill this slot.
    ///
    /// # Errors
    /// `AttributeNotNumeric` for string and variant arrays,
    /// `AttributeComponentLimit` when the tuple width breaks the slot rule.
    pub fn check(self, array: &AbstractArray) -> Result<(), ArrayError> {
        if !array.is_numeric() {
            return Err(ArrayError::AttributeNotNumeric {
                attribute: self.name(),
                found: array.value_type(),
            });
        }
        let found = array.number_of_components();
        let limit = self.limit();
        if !limit.admits(found) {
            return Err(ArrayError::AttributeComponentLimit {
                attribute: self.name(),
                limit: limit.to_string(),
                found,
            });
        }
        Ok(())
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Component-count rule of an attribute slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum AttributeLimit {
    NoLimit,
    Exact(usize),
    Max(usize),
}

impl AttributeLimit {
    pub fn admits(self, components: usize) -> bool {
        match self {
            AttributeLimit::NoLimit => true,
            AttributeLimit::Exact(n) => components == n,
            AttributeLimit::Max(n) => components <= n,
        }
    }
}

impl fmt::Display for AttributeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeLimit::NoLimit => f.write_str("any number of"),
            AttributeLimit::Exact(n) => write!(f, "exactly {n}"),
            AttributeLimit::Max(n) => write!(f, "at most {n}"),
        }
    }
}

/// Operation family a copy flag applies to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CopyMode {
    CopyTuple,
    Interpolate,
    PassData,
    /// All three of the above.
    AllCopy,
}

impl CopyMode {
    pub(crate) fn slots(self) -> &'static [usize] {
        match self {
            CopyMode::CopyTuple => &[0],
            CopyMode::Interpolate => &[1],
            CopyMode::PassData => &[2],
            CopyMode::AllCopy => &[0, 1, 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::typed_array::TypedDataArray;
    use crate::data::value_array::StringArray;

    fn array(nc: usize) -> AbstractArray {
        TypedDataArray::<f32>::with_components("a", nc).unwrap().into()
    }

    #[test]
    fn limits_table() {
        assert!(AttributeType::Scalars.check(&array(7)).is_ok());
        assert!(AttributeType::Vectors.check(&array(3)).is_ok());
        assert!(AttributeType::Normals.check(&array(2)).is_err());
        assert!(AttributeType::TCoords.check(&array(2)).is_ok());
        assert!(AttributeType::TCoords.check(&array(4)).is_err());
        assert!(AttributeType::Tensors.check(&array(9)).is_ok());
    }

    #[test]
    fn rejection_names_the_rule() {
        let err = AttributeType::Vectors.check(&array(2)).unwrap_err();
        assert_eq!(err.to_string(), "Vectors requires exactly 3 components, array has 2");
        let strings: AbstractArray = StringArray::new("s").into();
        assert!(matches!(
            AttributeType::Scalars.check(&strings),
            Err(ArrayError::AttributeNotNumeric { .. })
        ));
    }
}
