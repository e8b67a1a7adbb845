//! N-dimensional arrays: extents, coordinates, ranges and the dense/sparse
//! storage strategies behind the [`Array`] interface.

pub mod array;
pub mod coordinates;
pub mod dense;
pub mod extents;
pub mod range;
pub mod slice;
pub mod sort;
pub mod sparse;

pub use array::{Array, ArrayValue, StorageKind, TypedArray, create_array};
pub use coordinates::ArrayCoordinates;
pub use dense::DenseArray;
pub use extents::ArrayExtents;
pub use range::ArrayRange;
pub use slice::{dense_slice, sparse_slice};
pub use sort::ArraySort;
pub use sparse::SparseArray;
