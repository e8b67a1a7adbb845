//! ArrayError: Unified error type for fieldarray public APIs
//!
//! Every fallible operation in the crate reports through this enum. Operations
//! that historically "logged and continued" still emit a `log` record, but the
//! caller also receives one of these variants so the failure cannot be ignored.

use thiserror::Error;

use crate::types::value_type::ValueType;

/// Unified error type for array, variant and attribute operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArrayError {
    /// A requested extent was negative.
    #[error("extent {extent} for dimension {dimension} must be non-negative")]
    NegativeExtent { dimension: usize, extent: i64 },
    /// Coordinates or extents with the wrong number of dimensions.
    #[error("dimension mismatch: expected {expected} dimensions, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    /// Coordinates fall outside the array extents.
    #[error("coordinates {coordinates} lie outside extents {extents}")]
    CoordinatesOutOfBounds { coordinates: String, extents: String },
    /// A linear (value, tuple or entry) index is out of range.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: i64, len: usize },
    /// Two arrays (or a tuple and an array) disagree on component count.
    #[error("component count mismatch: expected {expected}, found {found}")]
    ComponentCountMismatch { expected: usize, found: usize },
    /// A component index is outside `[0, number_of_components)`.
    #[error("component {component} out of range ({components} components)")]
    ComponentOutOfRange { component: i64, components: usize },
    /// Arrays must carry at least one component per tuple.
    #[error("number of components must be at least 1")]
    ZeroComponents,
    /// An array rejected from an attribute slot by the component-count rule.
    #[error("{attribute} requires {limit} components, array has {found}")]
    AttributeComponentLimit {
        attribute: &'static str,
        limit: String,
        found: usize,
    },
    /// An attribute slot only accepts numeric data arrays.
    #[error("{attribute} requires a numeric data array, got {found}")]
    AttributeNotNumeric {
        attribute: &'static str,
        found: ValueType,
    },
    /// The value type has no implementation for the requested operation.
    #[error("value type {0} is not supported here")]
    UnsupportedValueType(ValueType),
    /// Two arrays of different value types where equal types are required.
    #[error("value type mismatch: expected {expected}, found {found}")]
    ValueTypeMismatch { expected: ValueType, found: ValueType },
    /// Dense and sparse storage were mixed where one kind is required.
    #[error("storage mismatch: expected {expected}, found {found}")]
    StorageMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// No array with the given name or index exists.
    #[error("no array named or indexed `{0}`")]
    MissingArray(String),
    /// Copy or interpolation attempted without a prior allocation call.
    #[error("copy/interpolate called before copy_allocate/interpolate_allocate")]
    NotAllocated,
    /// A sparse array holds the same coordinates more than once.
    #[error("sparse array holds duplicate coordinates {0}")]
    DuplicateCoordinates(String),
    /// Two named arrays in one field data share a name.
    #[error("field data holds more than one array named `{0}`")]
    DuplicateArrayName(String),
    /// A variant payload cannot be converted to the requested type.
    #[error("cannot convert {from} variant to {to}")]
    InvalidConversion { from: ValueType, to: ValueType },
    /// Two parallel arrays disagree on their tuple count.
    #[error("tuple count mismatch: {left} vs {right}")]
    TupleCountMismatch { left: usize, right: usize },
    /// Sorting keys must carry exactly one component.
    #[error("sort keys must have a single component, found {0}")]
    MultiComponentKeys(usize),
    /// An operation targets an input list entry that does not exist.
    #[error("input {index} out of range ({count} inputs)")]
    InputOutOfRange { index: usize, count: usize },
}
