#![cfg_attr(docsrs, feature(doc_cfg))]
//! # fieldarray
//!
//! fieldarray is a typed-array library for scientific data management. It
//! provides the array model a visualization or simulation pipeline keeps its
//! per-point and per-cell data in.
//!
//! ## Features
//! - N-dimensional [`DenseArray`](nd::DenseArray) and
//!   [`SparseArray`](nd::SparseArray) behind the object-safe
//!   [`Array`](nd::Array) interface, built at runtime by
//!   [`create_array`](nd::create_array)
//! - A [`Variant`](types::Variant) value type with checked conversions and a
//!   sort ordering for heterogeneous keys
//! - 1-D tuple arrays for every primitive type, packed bits, strings and
//!   variants, unified by [`AbstractArray`](data::AbstractArray)
//! - [`FieldData`](data::FieldData) and
//!   [`DataSetAttributes`](data::DataSetAttributes) with attribute slots and
//!   copy/interpolate/pass-through driven by copy flags
//! - Key/value sorting with an explicit comparator
//!
//! ## Errors
//!
//! Every fallible operation returns [`ArrayError`]. Rejected operations also
//! emit a `log` record at `warn` (or `error` for malformed extents), and leave
//! their target unchanged.
//!
//! ## Invariant checking
//!
//! Containers implement [`DebugInvariants`]. Checks run after mutation in
//! debug builds; enable the `check-invariants` feature to keep them in
//! release builds, or `strict-invariants` to make every check fatal.
//!
//! ```
//! use fieldarray::prelude::*;
//!
//! let mut a = DenseArray::<f64>::with_extents([2, 3]).unwrap();
//! a.fill(0.0);
//! a.set_value(&[1, 2].into(), 5.0).unwrap();
//! assert_eq!(a.value(&[1, 2].into()).unwrap(), 5.0);
//! ```

pub mod array_error;
pub mod data;
pub mod debug_invariants;
pub mod nd;
pub mod types;

pub use array_error::ArrayError;
pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::array_error::ArrayError;
    pub use crate::data::{
        AbstractArray, AttributeType, BitArray, CopyMode, DataArray, DataSetAttributes, FieldData,
        FieldList, StringArray, TupleAccess, TypedDataArray, VariantArray, create_data_array,
    };
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::nd::{
        Array, ArrayCoordinates, ArrayExtents, ArrayRange, ArraySort, DenseArray, SparseArray,
        StorageKind, TypedArray, create_array,
    };
    pub use crate::types::{IdType, Scalar, ValueType, Variant, VariantKey};
}
