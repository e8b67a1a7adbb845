//! ValueArray: 1-D tuple array of non-numeric values.
//!
//! [`StringArray`] and [`VariantArray`] share this implementation. The layout
//! and growth rules match the numeric arrays; values are cloned rather than
//! cast, and interpolation cannot blend, so it selects the contributing tuple
//! with the largest weight.

use std::fmt;

use crate::array_error::ArrayError;
use crate::debug_invariants::DebugInvariants;
use crate::nd::array::ArrayValue;
use crate::types::scalar::IdType;
use crate::types::value_type::ValueType;
use crate::types::variant::Variant;

/// Growable 1-D array of cloned values.
#[derive(Clone, PartialEq)]
pub struct ValueArray<V> {
    name: String,
    values: Vec<V>,
    max_id: IdType,
    number_of_components: usize,
    component_names: Vec<Option<String>>,
}

/// 1-D array of strings.
pub type StringArray = ValueArray<String>;

/// 1-D array of variants.
pub type VariantArray = ValueArray<Variant>;

impl<V: ArrayValue> ValueArray<V> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            values: Vec::new(),
            max_id: -1,
            number_of_components: 1,
            component_names: Vec::new(),
        }
    }

    pub fn with_components(name: &str, components: usize) -> Result<Self, ArrayError> {
        let mut a = Self::new(name);
        a.set_number_of_components(components)?;
        Ok(a)
    }

    /// Single-component array holding `values`.
    pub fn from_values(name: &str, values: impl IntoIterator<Item = impl Into<V>>) -> Self {
        let values: Vec<V> = values.into_iter().map(Into::into).collect();
        Self {
            name: name.to_owned(),
            max_id: values.len() as IdType - 1,
            values,
            number_of_components: 1,
            component_names: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    pub fn value_type(&self) -> ValueType {
        V::VALUE_TYPE
    }

    pub fn number_of_components(&self) -> usize {
        self.number_of_components
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
        if j >= self.number_of_components {
            return Err(ArrayError::ComponentOutOfRange {
                component: j as i64,
                components: self.number_of_components,
            });
        }
        if self.component_names.len() <= j {
            self.component_names.resize(j + 1, None);
        }
        self.component_names[j] = Some(name.to_owned());
        Ok(())
    }

    pub fn max_id(&self) -> IdType {
        self.max_id
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn number_of_values(&self) -> usize {
        (self.max_id + 1) as usize
    }

    /// Number of complete tuples.
    pub fn number_of_tuples(&self) -> usize {
        self.number_of_values() / self.number_of_components
    }

    pub fn allocate(&mut self, size: usize) {
        if size > self.values.len() {
            self.values = vec![V::default(); size.max(1)];
        }
        self.max_id = -1;
    }

    pub fn initialize(&mut self) {
        self.values = Vec::new();
        self.max_id = -1;
    }

    pub fn reset(&mut self) {
        self.max_id = -1;
    }

    pub fn squeeze(&mut self) {
        self.resize_values(self.number_of_values());
    }

    pub fn resize(&mut self, num_tuples: usize) {
        self.resize_values(num_tuples * self.number_of_components);
    }

    fn resize_values(&mut self, new_size: usize) {
        self.values.truncate(new_size);
        self.values.resize(new_size, V::default());
        self.values.shrink_to_fit();
        if self.max_id >= new_size as IdType {
            self.max_id = new_size as IdType - 1;
        }
    }

    fn grow_to(&mut self, len: usize) {
        if len > self.values.len() {
            let new_size = self.values.len() + len;
            self.values.resize(new_size, V::default());
        }
    }

    pub fn set_number_of_values(&mut self, n: usize) {
        self.allocate(n);
        self.max_id = n as IdType - 1;
    }

    pub fn set_number_of_tuples(&mut self, n: usize) {
        self.set_number_of_values(n * self.number_of_components);
    }

    fn check_value(&self, id: IdType) -> Result<usize, ArrayError> {
        if id < 0 || id > self.max_id {
            return Err(ArrayError::IndexOutOfRange { index: id, len: self.number_of_values() });
        }
        Ok(id as usize)
    }

    pub fn check_tuple(&self, i: IdType) -> Result<(), ArrayError> {
        let n = self.number_of_tuples();
        if i < 0 || i as usize >= n {
            return Err(ArrayError::IndexOutOfRange { index: i, len: n });
        }
        Ok(())
    }

    pub fn value(&self, id: IdType) -> Result<&V, ArrayError> {
        Ok(&self.values[self.check_value(id)?])
    }

    pub fn set_value(&mut self, id: IdType, v: impl Into<V>) -> Result<(), ArrayError> {
        let index = self.check_value(id)?;
        self.values[index] = v.into();
        Ok(())
    }

    /// Write `v` at `id`, growing the array if needed.
    pub fn insert_value(&mut self, id: IdType, v: impl Into<V>) -> Result<(), ArrayError> {
        if id < 0 {
            return Err(ArrayError::IndexOutOfRange { index: id, len: self.number_of_values() });
        }
        let index = id as usize;
        if index >= self.values.len() {
            self.grow_to(index + 1);
        }
        self.values[index] = v.into();
        self.max_id = self.max_id.max(id);
        Ok(())
    }

    pub fn insert_next_value(&mut self, v: impl Into<V>) -> IdType {
        let id = self.max_id + 1;
        if id as usize >= self.values.len() {
            self.grow_to(id as usize + 1);
        }
        self.values[id as usize] = v.into();
        self.max_id = id;
        id
    }

    pub fn as_slice(&self) -> &[V] {
        &self.values[..self.number_of_values()]
    }

    /// Index of the first value equal to `v`.
    pub fn lookup_value(&self, v: &V) -> Option<IdType> {
        self.as_slice().iter().position(|x| x == v).map(|i| i as IdType)
    }

    /// Indices of every value equal to `v`.
    pub fn lookup_all(&self, v: &V) -> Vec<IdType> {
        self.as_slice()
            .iter()
            .enumerate()
            .filter(|(_, x)| *x == v)
            .map(|(i, _)| i as IdType)
            .collect()
    }

    pub fn tuple(&self, i: IdType) -> Result<&[V], ArrayError> {
        self.check_tuple(i)?;
        let nc = self.number_of_components;
        let base = i as usize * nc;
        Ok(&self.values[base..base + nc])
    }

    fn check_tuple_len(&self, n: usize) -> Result<(), ArrayError> {
        if n != self.number_of_components {
            return Err(ArrayError::ComponentCountMismatch {
                expected: self.number_of_components,
                found: n,
            });
        }
        Ok(())
    }

    pub fn set_tuple(&mut self, i: IdType, values: &[V]) -> Result<(), ArrayError> {
        self.check_tuple(i)?;
        self.insert_tuple(i, values)
    }

    /// Write tuple `i`, growing the array if needed.
    pub fn insert_tuple(&mut self, i: IdType, values: &[V]) -> Result<(), ArrayError> {
        if i < 0 {
            return Err(ArrayError::IndexOutOfRange { index: i, len: self.number_of_tuples() });
        }
        self.check_tuple_len(values.len())?;
        let nc = self.number_of_components;
        let base = i as usize * nc;
        if base + nc > self.values.len() {
            self.grow_to(base + nc);
        }
        self.values[base..base + nc].clone_from_slice(values);
        self.max_id = self.max_id.max((base + nc) as IdType - 1);
        Ok(())
    }

    pub fn insert_next_tuple(&mut self, values: &[V]) -> Result<IdType, ArrayError> {
        let i = self.number_of_tuples() as IdType;
        self.insert_tuple(i, values)?;
        Ok(i)
    }

    /// Write at tuple `i` a copy of tuple `j` of `source`.
    pub fn insert_tuple_from(&mut self, i: IdType, j: IdType, source: &Self) -> Result<(), ArrayError> {
        self.check_tuple_len(source.number_of_components)?;
        let tuple = source.tuple(j)?.to_vec();
        self.insert_tuple(i, &tuple)
    }

    pub fn set_tuple_from(&mut self, i: IdType, j: IdType, source: &Self) -> Result<(), ArrayError> {
        self.check_tuple(i)?;
        self.insert_tuple_from(i, j, source)
    }

    /// Write at tuple `i` the tuple of `source` named in `ids` whose weight
    /// is largest; ties go to the earliest entry. With no ids a default
    /// tuple is written, as numeric arrays write zeros.
    pub fn interpolate_tuple(
        &mut self,
        i: IdType,
        ids: &[IdType],
        source: &Self,
        weights: &[f64],
    ) -> Result<(), ArrayError> {
        if ids.len() != weights.len() {
            return Err(ArrayError::TupleCountMismatch { left: ids.len(), right: weights.len() });
        }
        let mut best: Option<(IdType, f64)> = None;
        for (&id, &w) in ids.iter().zip(weights) {
            if best.is_none_or(|(_, bw)| w > bw) {
                best = Some((id, w));
            }
        }
        match best {
            Some((id, _)) => self.insert_tuple_from(i, id, source),
            None => {
                self.check_tuple_len(source.number_of_components)?;
                let blank = vec![V::default(); self.number_of_components];
                self.insert_tuple(i, &blank)
            }
        }
    }

    /// Write at tuple `i` tuple `id1` of `source1` when `t < 0.5`, otherwise
    /// tuple `id2` of `source2`.
    pub fn interpolate_tuple_pair(
        &mut self,
        i: IdType,
        id1: IdType,
        source1: &Self,
        id2: IdType,
        source2: &Self,
        t: f64,
    ) -> Result<(), ArrayError> {
        if t < 0.5 {
            self.insert_tuple_from(i, id1, source1)
        } else {
            self.insert_tuple_from(i, id2, source2)
        }
    }

    /// Empty array with the same name and tuple width.
    pub fn new_instance(&self) -> Self {
        Self {
            name: self.name.clone(),
            number_of_components: self.number_of_components,
            component_names: self.component_names.clone(),
            ..Self::new("")
        }
    }

    pub fn variant_value(&self, index: usize) -> Option<Variant> {
        self.as_slice().get(index).map(ArrayValue::to_variant)
    }

    pub fn memory_size(&self) -> usize {
        (self.values.len() * std::mem::size_of::<V>()).div_ceil(1024)
    }
}

impl StringArray {
    /// Heap bytes held by the strings in use, in KiB rounded up.
    pub fn text_size(&self) -> usize {
        self.as_slice().iter().map(String::len).sum::<usize>().div_ceil(1024)
    }
}

impl<V: ArrayValue> DebugInvariants for ValueArray<V> {
    const CONTAINER: &'static str = "ValueArray";

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

impl<V: ArrayValue> fmt::Debug for ValueArray<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueArray")
            .field("name", &self.name)
            .field("type", &V::VALUE_TYPE)
            .field("components", &self.number_of_components)
            .field("values", &self.as_slice())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_grow_and_lookup() {
        let mut a = StringArray::new("names");
        a.insert_next_value("a");
        a.insert_next_value("b");
        a.insert_value(4, "a").unwrap();
        assert_eq!(a.number_of_values(), 5);
        assert_eq!(a.value(2).unwrap(), "");
        assert_eq!(a.lookup_value(&"a".to_owned()), Some(0));
        assert_eq!(a.lookup_all(&"a".to_owned()), vec![0, 4]);
        assert_eq!(a.lookup_value(&"z".to_owned()), None);
    }

    #[test]
    fn interpolation_picks_largest_weight() {
        let src = StringArray::from_values("s", ["lo", "mid", "hi"]);
        let mut dst = StringArray::new("d");
        dst.interpolate_tuple(0, &[0, 1, 2], &src, &[0.2, 0.5, 0.3]).unwrap();
        dst.interpolate_tuple_pair(1, 0, &src, 2, &src, 0.49).unwrap();
        dst.interpolate_tuple_pair(2, 0, &src, 2, &src, 0.5).unwrap();
        assert_eq!(dst.as_slice(), &["mid", "lo", "hi"]);
    }

    #[test]
    fn interpolation_without_ids_writes_blank_tuple() {
        let src = VariantArray::from_values("s", [Variant::from(1i32)]);
        let mut dst = VariantArray::new("d");
        dst.interpolate_tuple(1, &[], &src, &[]).unwrap();
        assert_eq!(dst.number_of_tuples(), 2);
        assert!(!dst.value(1).unwrap().is_valid());
    }

    #[test]
    fn tuples_of_variants() {
        let mut a = VariantArray::with_components("v", 2).unwrap();
        a.insert_next_tuple(&[Variant::from(1i32), Variant::from("x")]).unwrap();
        assert_eq!(a.number_of_tuples(), 1);
        assert_eq!(a.tuple(0).unwrap()[1], Variant::from("x"));
        assert!(a.insert_next_tuple(&[Variant::Empty]).is_err());
        assert_eq!(a.variant_value(0), Some(Variant::Int(1)));
        assert_eq!(a.value_type(), ValueType::Variant);
    }

    #[test]
    fn resize_and_squeeze() {
        let mut a = StringArray::from_values("s", ["a", "b", "c"]);
        a.resize(2);
        assert_eq!(a.as_slice(), &["a", "b"]);
        a.resize(4);
        assert_eq!(a.size(), 4);
        assert_eq!(a.number_of_values(), 2);
        a.squeeze();
        assert_eq!(a.size(), 2);
    }
}
