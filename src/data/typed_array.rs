//! TypedDataArray: a growable 1-D array of one primitive type, grouped into
//! fixed-width tuples.
//!
//! The buffer holds `size()` slots of which `[0, max_id]` are in use. Inserting
//! past the end grows the buffer additively (new size = old size + requested
//! length); `resize` reallocates to an exact capacity.

use std::fmt;

use crate::array_error::ArrayError;
use crate::data::data_array::{DataArray, DataScalar};
use crate::data::tuples::TupleAccess;
use crate::debug_invariants::DebugInvariants;
use crate::types::scalar::{IdType, Scalar};
use crate::types::value_type::ValueType;

/// Growable 1-D numeric array.
///
/// # Invariants
/// - `number_of_components >= 1`
/// - `-1 <= max_id < values.len()`
#[derive(Clone, PartialEq)]
pub struct TypedDataArray<T> {
    name: String,
    values: Vec<T>,
    max_id: IdType,
    number_of_components: usize,
    component_names: Vec<Option<String>>,
}

impl<T: DataScalar> TypedDataArray<T> {
    /// Empty single-component array.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            values: Vec::new(),
            max_id: -1,
            number_of_components: 1,
            component_names: Vec::new(),
        }
    }

    /// Empty array with `components` values per tuple.
    pub fn with_components(name: &str, components: usize) -> Result<Self, ArrayError> {
        let mut a = Self::new(name);
        a.set_number_of_components(components)?;
        Ok(a)
    }

    /// Single-component array holding `values`.
    pub fn from_values(name: &str, values: impl Into<Vec<T>>) -> Self {
        let values = values.into();
        Self {
            name: name.to_owned(),
            max_id: values.len() as IdType - 1,
            values,
            number_of_components: 1,
            component_names: Vec::new(),
        }
    }

    /// Array of `components`-wide tuples holding `values`.
    ///
    /// A trailing partial tuple is kept but not counted by
    /// [`number_of_tuples`](TupleAccess::number_of_tuples).
    pub fn from_tuples(
        name: &str,
        components: usize,
        values: impl Into<Vec<T>>,
    ) -> Result<Self, ArrayError> {
        let mut a = Self::from_values(name, values);
        a.set_number_of_components(components)?;
        Ok(a)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    pub fn value_type(&self) -> ValueType {
        <T as Scalar>::VALUE_TYPE
    }

    /// Change the tuple width.
    ///
    /// # Errors
    /// `ZeroComponents` when `components == 0`.
    pub fn set_number_of_components(&mut self, components: usize) -> Result<(), ArrayError> {
        if components == 0 {
            log::warn!("array `{}`: number of components must be at least 1", self.name);
            return Err(ArrayError::ZeroComponents);
        }
        self.number_of_components = components;
        Ok(())
    }

    /// Name of component `j`, if one was set.
    pub fn component_name(&self, j: usize) -> Option<&str> {
        self.component_names.get(j).and_then(|n| n.as_deref())
    }

    pub fn set_component_name(&mut self, j: usize, name: &str) -> Result<(), ArrayError> {
        self.check_component(j as i64)?;
        if self.component_names.len() <= j {
            self.component_names.resize(j + 1, None);
        }
        self.component_names[j] = Some(name.to_owned());
        Ok(())
    }

    /// Reserve at least `size` value slots.
    ///
    /// The buffer is replaced (and its contents dropped) only when it must
    /// grow. The array is always left empty.
    pub fn allocate(&mut self, size: usize) {
        if size > self.values.len() {
            self.values = vec![T::zero(); size.max(1)];
        }
        self.max_id = -1;
    }

    /// Release all storage.
    pub fn initialize(&mut self) {
        self.values = Vec::new();
        self.max_id = -1;
    }

    /// Mark the array empty, keeping the buffer.
    pub fn reset(&mut self) {
        self.max_id = -1;
    }

    /// Shrink the buffer to the values in use.
    pub fn squeeze(&mut self) {
        self.resize_values((self.max_id + 1) as usize);
    }

    /// Reallocate to exactly `num_tuples` tuples, truncating if shrinking.
    pub fn resize(&mut self, num_tuples: usize) {
        self.resize_values(num_tuples * self.number_of_components);
    }

    fn resize_values(&mut self, new_size: usize) {
        if new_size == self.values.len() {
            return;
        }
        if new_size == 0 {
            self.initialize();
            return;
        }
        self.values.resize(new_size, T::zero());
        self.values.shrink_to_fit();
        if self.max_id >= new_size as IdType {
            self.max_id = new_size as IdType - 1;
        }
    }

    /// Allocate `n` values and mark them all in use.
    pub fn set_number_of_values(&mut self, n: usize) {
        self.allocate(n);
        self.max_id = n as IdType - 1;
    }

    /// Allocate `n` tuples and mark them all in use.
    pub fn set_number_of_tuples(&mut self, n: usize) {
        self.set_number_of_values(n * self.number_of_components);
    }

    fn check_value(&self, id: IdType) -> Result<usize, ArrayError> {
        if id < 0 || id > self.max_id {
            return Err(ArrayError::IndexOutOfRange {
                index: id,
                len: self.number_of_values(),
            });
        }
        Ok(id as usize)
    }

    /// Value at `id`.
    pub fn value(&self, id: IdType) -> Result<T, ArrayError> {
        Ok(self.values[self.check_value(id)?])
    }

    /// Overwrite an in-use value; does not extend the array.
    pub fn set_value(&mut self, id: IdType, v: T) -> Result<(), ArrayError> {
        let index = self.check_value(id)?;
        self.values[index] = v;
        Ok(())
    }

    /// Write `v` at `id`, growing the array if needed.
    pub fn insert_value(&mut self, id: IdType, v: T) -> Result<(), ArrayError> {
        if id < 0 {
            return Err(ArrayError::IndexOutOfRange { index: id, len: self.number_of_values() });
        }
        let index = id as usize;
        if index >= self.values.len() {
            self.grow_to(index + 1);
        }
        self.values[index] = v;
        if id > self.max_id {
            self.max_id = id;
        }
        Ok(())
    }

    /// Append `v` and return its index.
    pub fn insert_next_value(&mut self, v: T) -> IdType {
        let id = self.max_id + 1;
        let index = id as usize;
        if index >= self.values.len() {
            self.grow_to(index + 1);
        }
        self.values[index] = v;
        self.max_id = id;
        id
    }

    /// Values in use.
    pub fn as_slice(&self) -> &[T] {
        &self.values[..self.number_of_values()]
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let n = self.number_of_values();
        &mut self.values[..n]
    }

    /// Raw bytes of the values in use.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }

    /// Allocated size in KiB, rounded up.
    pub fn memory_size(&self) -> usize {
        (self.values.len() * std::mem::size_of::<T>()).div_ceil(1024)
    }

    /// Smallest value representable by `T`.
    pub fn data_type_min(&self) -> f64 {
        T::min_value().as_f64()
    }

    /// Largest value representable by `T`.
    pub fn data_type_max(&self) -> f64 {
        T::max_value().as_f64()
    }

    /// Empty array with the same name, type and tuple width.
    pub fn new_instance(&self) -> Self {
        Self {
            name: self.name.clone(),
            values: Vec::new(),
            max_id: -1,
            number_of_components: self.number_of_components,
            component_names: self.component_names.clone(),
        }
    }

    /// Replace the contents with a value-cast copy of `source`.
    pub fn deep_copy_from(&mut self, source: &DataArray) {
        if let Some(same) = T::unwrap(source) {
            *self = same.clone();
            return;
        }
        self.name = source.name().to_owned();
        self.number_of_components = source.number_of_components();
        self.component_names = (0..self.number_of_components)
            .map(|j| source.component_name(j).map(str::to_owned))
            .collect();
        let n = source.number_of_values();
        self.values = (0..n).map(|i| source.value_cast::<T>(i)).collect();
        self.max_id = n as IdType - 1;
    }

    /// Write at tuple `i` a copy of tuple `j` of `source`, growing if needed.
    ///
    /// Same-typed sources copy exactly; other types are value-cast.
    pub fn insert_tuple_from(
        &mut self,
        i: IdType,
        j: IdType,
        source: &DataArray,
    ) -> Result<(), ArrayError> {
        let nc = self.number_of_components;
        if source.number_of_components() != nc {
            log::warn!(
                "array `{}`: cannot copy tuple from `{}` ({} vs {} components)",
                self.name,
                source.name(),
                nc,
                source.number_of_components()
            );
            return Err(ArrayError::ComponentCountMismatch {
                expected: nc,
                found: source.number_of_components(),
            });
        }
        source.check_tuple(j)?;
        if i < 0 {
            return Err(ArrayError::IndexOutOfRange { index: i, len: self.number_of_tuples() });
        }
        let base = i as usize * nc;
        let src = j as usize * nc;
        if base + nc > self.values.len() {
            self.grow_to(base + nc);
        }
        for k in 0..nc {
            self.values[base + k] = source.value_cast::<T>(src + k);
        }
        let last = (base + nc) as IdType - 1;
        if last > self.max_id {
            self.max_id = last;
        }
        Ok(())
    }

    /// Copy component `from_j` of every tuple of `source` into component `j`.
    ///
    /// # Errors
    /// `TupleCountMismatch` when the tuple counts differ, or a component
    /// index error.
    pub fn copy_component(
        &mut self,
        j: i64,
        source: &DataArray,
        from_j: i64,
    ) -> Result<(), ArrayError> {
        let (mine, theirs) = (self.number_of_tuples(), source.number_of_tuples());
        if mine != theirs {
            log::warn!(
                "array `{}`: cannot copy component from `{}` ({mine} vs {theirs} tuples)",
                self.name,
                source.name()
            );
            return Err(ArrayError::TupleCountMismatch { left: mine, right: theirs });
        }
        self.check_component(j)?;
        for i in 0..mine as IdType {
            let v = source.component(i, from_j)?;
            self.set_component(i, j, v)?;
        }
        Ok(())
    }
}

impl<T: DataScalar> TupleAccess for TypedDataArray<T> {
    fn number_of_components(&self) -> usize {
        self.number_of_components
    }

    fn max_id(&self) -> IdType {
        self.max_id
    }

    fn size(&self) -> usize {
        self.values.len()
    }

    fn value_f64(&self, index: usize) -> f64 {
        self.values[index].as_f64()
    }

    fn store_f64(&mut self, index: usize, v: f64) {
        self.values[index] = T::from_f64(v);
    }

    fn grow_to(&mut self, len: usize) {
        if len > self.values.len() {
            let new_size = self.values.len() + len;
            self.values.resize(new_size, T::zero());
        }
    }

    fn set_max_id(&mut self, id: IdType) {
        self.max_id = id;
    }
}

impl<T: DataScalar> DebugInvariants for TypedDataArray<T> {
    const CONTAINER: &'static str = "TypedDataArray";

    fn validate_invariants(&self) -> Result<(), ArrayError> {
        if self.number_of_components == 0 {
            return Err(ArrayError::ZeroComponents);
        }
        if self.max_id < -1 || self.max_id >= self.values.len() as IdType {
            return Err(ArrayError::IndexOutOfRange {
                index: self.max_id,
                len: self.values.len(),
            });
        }
        Ok(())
    }
}

impl<T: DataScalar> fmt::Debug for TypedDataArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedDataArray")
            .field("name", &self.name)
            .field("type", &self.value_type())
            .field("components", &self.number_of_components)
            .field("tuples", &self.number_of_tuples())
            .field("size", &self.values.len())
            .finish()
    }
}
