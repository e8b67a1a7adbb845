//! ArrayRange: a half-open interval of indices along one dimension.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::scalar::IdType;

/// Half-open interval `[begin, end)`.
///
/// # Invariants
/// `end >= begin`; the constructor clamps `end` up to `begin`, and so does
/// deserialization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRange")]
pub struct ArrayRange {
    begin: IdType,
    end: IdType,
}

/// Unchecked wire form of [`ArrayRange`].
#[derive(Deserialize)]
struct RawRange {
    begin: IdType,
    end: IdType,
}

impl From<RawRange> for ArrayRange {
    fn from(raw: RawRange) -> Self {
        ArrayRange::new(raw.begin, raw.end)
    }
}

static_assertions::assert_eq_size!(ArrayRange, [IdType; 2]);

impl ArrayRange {
    /// Construct `[begin, max(begin, end))`.
    pub fn new(begin: IdType, end: IdType) -> Self {
        Self {
            begin,
            end: end.max(begin),
        }
    }

    #[inline]
    pub fn begin(&self) -> IdType {
        self.begin
    }

    #[inline]
    pub fn end(&self) -> IdType {
        self.end
    }

    /// Number of indices in the range.
    #[inline]
    pub fn size(&self) -> IdType {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// True when `other` lies entirely inside this range.
    pub fn contains_range(&self, other: &ArrayRange) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    /// True when `i` lies inside this range.
    pub fn contains(&self, i: IdType) -> bool {
        self.begin <= i && i < self.end
    }

    /// True when the two ranges share at least one index.
    pub fn intersects(&self, other: &ArrayRange) -> bool {
        self.begin < other.end && other.begin < self.end
    }
}

/// Prints as `[begin,end)`.
impl fmt::Display for ArrayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{})", self.begin, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_clamps() {
        let r = ArrayRange::new(5, 2);
        assert_eq!(r.begin(), 5);
        assert_eq!(r.end(), 5);
        assert!(r.is_empty());
    }

    #[test]
    fn deserialize_clamps_like_new() {
        let r: ArrayRange = serde_json::from_str(r#"{"begin":5,"end":2}"#).unwrap();
        assert_eq!(r, ArrayRange::new(5, 5));
        assert_eq!(r.size(), 0);

        let json = serde_json::to_string(&ArrayRange::new(1, 4)).unwrap();
        assert_eq!(serde_json::from_str::<ArrayRange>(&json).unwrap().size(), 3);
    }

    #[test]
    fn containment() {
        let r = ArrayRange::new(2, 6);
        assert!(r.contains(2));
        assert!(!r.contains(6));
        assert!(r.contains_range(&ArrayRange::new(3, 6)));
        assert!(!r.contains_range(&ArrayRange::new(1, 3)));
        assert!(r.intersects(&ArrayRange::new(5, 9)));
        assert!(!r.intersects(&ArrayRange::new(6, 9)));
        assert_eq!(r.to_string(), "[2,6)");
    }
}
