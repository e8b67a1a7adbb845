//! BitArray: a 1-D array of packed single-bit values.
//!
//! Eight values share one byte, least significant bit first. Writes through
//! the tuple interface truncate the incoming `f64` and store `1` for any
//! nonzero result.

use std::fmt;

use crate::array_error::ArrayError;
use crate::data::data_array::DataArray;
use crate::data::tuples::TupleAccess;
use crate::debug_invariants::DebugInvariants;
use crate::types::scalar::IdType;
use crate::types::value_type::ValueType;

/// Growable array of packed bits.
///
/// # Invariants
/// - `bits.len() == size.div_ceil(8)`
/// - bits at positions `>= size` are zero
/// - `-1 <= max_id < size`
#[derive(Clone, PartialEq)]
pub struct BitArray {
    name: String,
    bits: Vec<u8>,
    size: usize,
    max_id: IdType,
    number_of_components: usize,
    component_names: Vec<Option<String>>,
}

impl BitArray {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            bits: Vec::new(),
            size: 0,
            max_id: -1,
            number_of_components: 1,
            component_names: Vec::new(),
        }
    }

    /// Single-component array holding `values`; nonzero entries become `1`.
    pub fn from_bits(name: &str, values: &[u8]) -> Self {
        let mut a = Self::new(name);
        a.resize_bits(values.len());
        for (i, &v) in values.iter().enumerate() {
            a.put(i, v != 0);
        }
        a.max_id = values.len() as IdType - 1;
        a
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    pub fn value_type(&self) -> ValueType {
        ValueType::Bit
    }

    pub fn set_number_of_components(&mut self, components: usize) -> Result<(), ArrayError> {
        if components == 0 {
            log::warn!("array `{}`: number of components must be at least 1", self.name);
            return Err(ArrayError::ZeroComponents);
        }
        self.number_of_components = components;
        Ok(())
    }

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

    fn get(&self, i: usize) -> bool {
        self.bits[i / 8] & (1 << (i % 8)) != 0
    }

    fn put(&mut self, i: usize, on: bool) {
        let mask = 1u8 << (i % 8);
        if on {
            self.bits[i / 8] |= mask;
        } else {
            self.bits[i / 8] &= !mask;
        }
    }

    fn resize_bits(&mut self, new_size: usize) {
        self.bits.resize(new_size.div_ceil(8), 0);
        let tail = new_size % 8;
        if tail != 0 {
            if let Some(last) = self.bits.last_mut() {
                *last &= (1u8 << tail) - 1;
            }
        }
        self.size = new_size;
        if self.max_id >= new_size as IdType {
            self.max_id = new_size as IdType - 1;
        }
    }

    /// Reserve at least `size` bits; the array is left empty.
    pub fn allocate(&mut self, size: usize) {
        if size > self.size {
            self.bits = vec![0; size.max(1).div_ceil(8)];
            self.size = size.max(1);
        }
        self.max_id = -1;
    }

    pub fn initialize(&mut self) {
        self.bits = Vec::new();
        self.size = 0;
        self.max_id = -1;
    }

    pub fn reset(&mut self) {
        self.max_id = -1;
    }

    pub fn squeeze(&mut self) {
        self.resize_bits((self.max_id + 1) as usize);
        self.bits.shrink_to_fit();
    }

    /// Reallocate to exactly `num_tuples` tuples.
    pub fn resize(&mut self, num_tuples: usize) {
        self.resize_bits(num_tuples * self.number_of_components);
        self.bits.shrink_to_fit();
    }

    pub fn set_number_of_values(&mut self, n: usize) {
        self.allocate(n);
        self.max_id = n as IdType - 1;
    }

    pub fn set_number_of_tuples(&mut self, n: usize) {
        self.set_number_of_values(n * self.number_of_components);
    }

    /// Bit at `id` as `0` or `1`.
    pub fn value(&self, id: IdType) -> Result<u8, ArrayError> {
        if id < 0 || id > self.max_id {
            return Err(ArrayError::IndexOutOfRange { index: id, len: self.number_of_values() });
        }
        Ok(self.get(id as usize) as u8)
    }

    pub fn set_value(&mut self, id: IdType, v: u8) -> Result<(), ArrayError> {
        if id < 0 || id > self.max_id {
            return Err(ArrayError::IndexOutOfRange { index: id, len: self.number_of_values() });
        }
        self.put(id as usize, v != 0);
        Ok(())
    }

    pub fn insert_value(&mut self, id: IdType, v: u8) -> Result<(), ArrayError> {
        if id < 0 {
            return Err(ArrayError::IndexOutOfRange { index: id, len: self.number_of_values() });
        }
        let index = id as usize;
        if index >= self.size {
            self.grow_to(index + 1);
        }
        self.put(index, v != 0);
        if id > self.max_id {
            self.max_id = id;
        }
        Ok(())
    }

    pub fn insert_next_value(&mut self, v: u8) -> IdType {
        let id = self.max_id + 1;
        if id as usize >= self.size {
            self.grow_to(id as usize + 1);
        }
        self.put(id as usize, v != 0);
        self.max_id = id;
        id
    }

    /// Packed storage, including unused trailing slots.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn memory_size(&self) -> usize {
        self.bits.len().div_ceil(1024)
    }

    pub fn data_type_min(&self) -> f64 {
        0.0
    }

    pub fn data_type_max(&self) -> f64 {
        1.0
    }

    pub fn new_instance(&self) -> Self {
        Self {
            name: self.name.clone(),
            number_of_components: self.number_of_components,
            component_names: self.component_names.clone(),
            ..Self::new("")
        }
    }

    /// Replace the contents with a copy of `source`, nonzero values becoming `1`.
    pub fn deep_copy_from(&mut self, source: &DataArray) {
        if let DataArray::Bit(same) = source {
            *self = same.clone();
            return;
        }
        let n = source.number_of_values();
        *self = Self::new(source.name());
        self.number_of_components = source.number_of_components();
        self.component_names = (0..self.number_of_components)
            .map(|j| source.component_name(j).map(str::to_owned))
            .collect();
        self.resize_bits(n);
        for i in 0..n {
            self.put(i, source.value_f64(i) as i64 != 0);
        }
        self.max_id = n as IdType - 1;
    }

    /// Write at tuple `i` a copy of tuple `j` of `source`.
    pub fn insert_tuple_from(
        &mut self,
        i: IdType,
        j: IdType,
        source: &DataArray,
    ) -> Result<(), ArrayError> {
        if source.number_of_components() != self.number_of_components {
            return Err(ArrayError::ComponentCountMismatch {
                expected: self.number_of_components,
                found: source.number_of_components(),
            });
        }
        let tuple = source.tuple(j)?;
        self.insert_tuple(i, &tuple)
    }
}

impl TupleAccess for BitArray {
    fn number_of_components(&self) -> usize {
        self.number_of_components
    }

    fn max_id(&self) -> IdType {
        self.max_id
    }

    fn size(&self) -> usize {
        self.size
    }

    fn value_f64(&self, index: usize) -> f64 {
        if self.get(index) { 1.0 } else { 0.0 }
    }

    fn store_f64(&mut self, index: usize, v: f64) {
        self.put(index, v as i64 != 0);
    }

    fn grow_to(&mut self, len: usize) {
        if len > self.size {
            let new_size = self.size + len;
            self.bits.resize(new_size.div_ceil(8), 0);
            self.size = new_size;
        }
    }

    fn set_max_id(&mut self, id: IdType) {
        self.max_id = id;
    }
}

impl DebugInvariants for BitArray {
    const CONTAINER: &'static str = "BitArray";

    fn validate_invariants(&self) -> Result<(), ArrayError> {
        if self.number_of_components == 0 {
            return Err(ArrayError::ZeroComponents);
        }
        if self.bits.len() != self.size.div_ceil(8) {
            return Err(ArrayError::IndexOutOfRange {
                index: self.bits.len() as i64,
                len: self.size.div_ceil(8),
            });
        }
        if self.max_id < -1 || self.max_id >= self.size as IdType {
            return Err(ArrayError::IndexOutOfRange { index: self.max_id, len: self.size });
        }
        Ok(())
    }
}

impl fmt::Debug for BitArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitArray")
            .field("name", &self.name)
            .field("components", &self.number_of_components)
            .field("values", &self.number_of_values())
            .field("size", &self.size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_bits() {
        let a = BitArray::from_bits("b", &[1, 0, 1, 1, 0, 0, 0, 0, 1]);
        assert_eq!(a.as_bytes(), &[0b0000_1101, 0b0000_0001]);
        assert_eq!(a.value(8).unwrap(), 1);
        assert_eq!(a.value(1).unwrap(), 0);
        assert!(a.value(9).is_err());
    }

    #[test]
    fn store_truncates_then_tests_nonzero() {
        let mut a = BitArray::new("b");
        a.insert_next_tuple(&[0.7]).unwrap();
        a.insert_next_tuple(&[-1.2]).unwrap();
        a.insert_next_tuple(&[2.0]).unwrap();
        assert_eq!(a.tuple(0).unwrap(), vec![0.0]);
        assert_eq!(a.tuple(1).unwrap(), vec![1.0]);
        assert_eq!(a.tuple(2).unwrap(), vec![1.0]);
    }

    #[test]
    fn shrinking_clears_stale_bits() {
        let mut a = BitArray::from_bits("b", &[1; 8]);
        a.resize(3);
        a.insert_value(7, 0).unwrap();
        assert_eq!(a.value(5).unwrap(), 0);
        assert_eq!(a.value(2).unwrap(), 1);
    }

    #[test]
    fn interpolation_rounds_down() {
        let src = BitArray::from_bits("s", &[0, 1]);
        let mut dst = BitArray::new("d");
        dst.interpolate_tuple_pair(0, 0, &src, 1, &src, 0.4).unwrap();
        dst.interpolate_tuple(1, &[0, 1], &src, &[0.0, 1.0]).unwrap();
        assert_eq!(dst.value(0).unwrap(), 0);
        assert_eq!(dst.value(1).unwrap(), 1);
    }

    #[test]
    fn deep_copy_from_numeric() {
        let src: DataArray =
            crate::data::typed_array::TypedDataArray::<f32>::from_values("f", vec![0.0, 3.5, 0.2])
                .into();
        let mut a = BitArray::new("b");
        a.deep_copy_from(&src);
        assert_eq!(a.name(), "f");
        assert_eq!((0..3).map(|i| a.value(i).unwrap()).collect::<Vec<_>>(), vec![0, 1, 0]);
    }
}
