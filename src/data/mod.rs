//! 1-D arrays and the collections built from them.
//!
//! - [`TypedDataArray`], [`BitArray`], [`StringArray`] and [`VariantArray`]
//!   are the concrete arrays; [`DataArray`] and [`AbstractArray`] are the
//!   runtime-typed sums over them.
//! - [`FieldData`] holds named arrays; [`DataSetAttributes`] adds the five
//!   attribute slots and the copy/interpolate protocol.
//! - [`sort`] orders key arrays and moves value tuples along with them.

pub mod abstract_array;
pub mod attributes;
pub mod bit_array;
pub mod data_array;
pub mod dataset_attributes;
pub mod field_data;
pub mod sort;
pub mod tuples;
pub mod typed_array;
pub mod value_array;

pub use abstract_array::{AbstractArray, create_data_array};
pub use attributes::{AttributeLimit, AttributeType, CopyMode, NUM_ATTRIBUTES};
pub use bit_array::BitArray;
pub use data_array::{DataArray, DataScalar};
pub use dataset_attributes::{DataSetAttributes, FieldList};
pub use field_data::FieldData;
pub use sort::{sort_keys, sort_keys_values, sort_keys_values_by};
pub use tuples::TupleAccess;
pub use typed_array::TypedDataArray;
pub use value_array::{StringArray, ValueArray, VariantArray};
