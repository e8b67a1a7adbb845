//! FieldData: an ordered collection of named 1-D arrays with per-name copy
//! flags.
//!
//! Array names are unique among named arrays: adding an array whose name is
//! already present replaces the earlier one in place. Unnamed arrays are
//! always appended.
//!
//! Whether [`FieldData::pass_data`] takes a source array is decided by the
//! per-name flag when one is set, and by the copy-all default otherwise.

use hashbrown::HashMap;

use crate::array_error::ArrayError;
use crate::data::abstract_array::AbstractArray;
use crate::debug_invariants::DebugInvariants;
use crate::types::scalar::IdType;

/// Ordered list of arrays plus copy flags.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldData {
    arrays: Vec<AbstractArray>,
    copy_flags: HashMap<String, bool>,
    copy_all: bool,
}

impl Default for FieldData {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldData {
    pub fn new() -> Self {
        Self {
            arrays: Vec::new(),
            copy_flags: HashMap::new(),
            copy_all: true,
        }
    }

    pub fn number_of_arrays(&self) -> usize {
        self.arrays.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbstractArray> {
        self.arrays.iter()
    }

    /// Add `array`, replacing a same-named array in place. Returns its index.
    pub fn add_array(&mut self, array: AbstractArray) -> usize {
        if !array.name().is_empty() {
            if let Some(i) = self.index_of(array.name()) {
                self.arrays[i] = array;
                return i;
            }
        }
        self.arrays.push(array);
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        self.debug_assert_invariants();
        self.arrays.len() - 1
    }

    /// Index of the first array named `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.arrays.iter().position(|a| a.name() == name)
    }

    pub fn has_array(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn array(&self, index: usize) -> Option<&AbstractArray> {
        self.arrays.get(index)
    }

    pub fn array_mut(&mut self, index: usize) -> Option<&mut AbstractArray> {
        self.arrays.get_mut(index)
    }

    pub fn array_by_name(&self, name: &str) -> Option<&AbstractArray> {
        self.index_of(name).map(|i| &self.arrays[i])
    }

    pub fn array_by_name_mut(&mut self, name: &str) -> Option<&mut AbstractArray> {
        self.index_of(name).map(move |i| &mut self.arrays[i])
    }

    /// Remove and return the array at `index`; later arrays shift down.
    pub fn remove_array_at(&mut self, index: usize) -> Option<AbstractArray> {
        (index < self.arrays.len()).then(|| self.arrays.remove(index))
    }

    /// Remove and return the array named `name`.
    pub fn remove_array(&mut self, name: &str) -> Option<AbstractArray> {
        let i = self.index_of(name)?;
        self.remove_array_at(i)
    }

    /// Tuple count of the first array, `0` when empty.
    pub fn number_of_tuples(&self) -> usize {
        self.arrays.first().map_or(0, AbstractArray::number_of_tuples)
    }

    /// Total component count across all arrays.
    pub fn number_of_components(&self) -> usize {
        self.arrays.iter().map(AbstractArray::number_of_components).sum()
    }

    /// Locate global component `i` as `(array index, component in array)`.
    pub fn array_containing_component(&self, i: usize) -> Option<(usize, usize)> {
        let mut first = 0;
        for (k, a) in self.arrays.iter().enumerate() {
            let nc = a.number_of_components();
            if i < first + nc {
                return Some((k, i - first));
            }
            first += nc;
        }
        None
    }

    pub fn copy_field_on(&mut self, name: &str) {
        self.copy_flags.insert(name.to_owned(), true);
    }

    pub fn copy_field_off(&mut self, name: &str) {
        self.copy_flags.insert(name.to_owned(), false);
    }

    /// Per-name flag, if one was set.
    pub fn copy_field_flag(&self, name: &str) -> Option<bool> {
        self.copy_flags.get(name).copied()
    }

    pub fn clear_field_flags(&mut self) {
        self.copy_flags.clear();
    }

    /// Copy every array without an explicit per-name flag.
    pub fn copy_all_on(&mut self) {
        self.copy_all = true;
    }

    /// Copy only arrays explicitly flagged on.
    pub fn copy_all_off(&mut self) {
        self.copy_all = false;
    }

    pub fn copy_all(&self) -> bool {
        self.copy_all
    }

    /// Whether an array named `name` would be copied: the per-name flag when
    /// set, otherwise the copy-all default.
    pub fn is_copy_field_on(&self, name: &str) -> bool {
        self.copy_field_flag(name).unwrap_or(self.copy_all)
    }

    /// Add a copy of every `source` array selected by the copy flags.
    pub fn pass_data(&mut self, source: &FieldData) {
        for a in &source.arrays {
            if self.is_copy_field_on(a.name()) {
                self.add_array(a.clone());
            }
        }
    }

    /// Replace the arrays with empty arrays shaped like those of `source`.
    pub fn copy_structure(&mut self, source: &FieldData) {
        self.arrays = source.arrays.iter().map(AbstractArray::new_instance).collect();
    }

    /// Allocate `size` values in every array.
    pub fn allocate_arrays(&mut self, size: usize) {
        for a in &mut self.arrays {
            a.allocate(size);
        }
    }

    /// Empty every array, keeping buffers.
    pub fn reset(&mut self) {
        for a in &mut self.arrays {
            a.reset();
        }
    }

    /// Remove every array and per-name flag.
    pub fn initialize(&mut self) {
        self.arrays.clear();
        self.copy_flags.clear();
        self.copy_all = true;
    }

    /// Write at tuple `i` of every array tuple `j` of the corresponding
    /// array of `source`.
    ///
    /// # Errors
    /// `MissingArray` when `source` has fewer arrays, or the first tuple copy
    /// failure.
    pub fn insert_tuple(&mut self, i: IdType, j: IdType, source: &FieldData) -> Result<(), ArrayError> {
        for (k, a) in self.arrays.iter_mut().enumerate() {
            let s = source
                .arrays
                .get(k)
                .ok_or_else(|| ArrayError::MissingArray(k.to_string()))?;
            a.insert_tuple_from(i, j, s)?;
        }
        Ok(())
    }

    /// Append tuple `j` of `source` to every array; returns the new index.
    pub fn insert_next_tuple(&mut self, j: IdType, source: &FieldData) -> Result<IdType, ArrayError> {
        let i = self.number_of_tuples() as IdType;
        self.insert_tuple(i, j, source)?;
        Ok(i)
    }

    /// New field data holding the tuples `ids` of every array, in order.
    pub fn extract_tuples(&self, ids: &[IdType]) -> Result<FieldData, ArrayError> {
        let mut out = FieldData::new();
        out.copy_structure(self);
        for a in &mut out.arrays {
            a.allocate(ids.len() * a.number_of_components());
        }
        for (k, &id) in ids.iter().enumerate() {
            out.insert_tuple(k as IdType, id, self)?;
        }
        Ok(out)
    }
}

impl DebugInvariants for FieldData {
    const CONTAINER: &'static str = "FieldData";

    /// Named arrays are unique; renaming through `array_mut` can break this.
    fn validate_invariants(&self) -> Result<(), ArrayError> {
        let mut seen = hashbrown::HashSet::new();
        for a in self.arrays.iter().filter(|a| !a.name().is_empty()) {
            if !seen.insert(a.name()) {
                return Err(ArrayError::DuplicateArrayName(a.name().to_owned()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::typed_array::TypedDataArray;
    use crate::data::value_array::StringArray;

    fn field() -> FieldData {
        let mut fd = FieldData::new();
        fd.add_array(TypedDataArray::<f64>::from_tuples("v", 3, vec![0.0; 6]).unwrap().into());
        fd.add_array(StringArray::from_values("label", ["a", "b"]).into());
        fd.add_array(TypedDataArray::<i32>::from_values("id", vec![10, 20]).into());
        fd
    }

    #[test]
    fn same_name_replaces_in_place() {
        let mut fd = field();
        let i = fd.add_array(TypedDataArray::<u8>::from_values("label", vec![1, 2]).into());
        assert_eq!(i, 1);
        assert_eq!(fd.number_of_arrays(), 3);
        assert!(fd.array(1).unwrap().is_numeric());
        assert_eq!(fd.add_array(StringArray::new("").into()), 3);
        assert_eq!(fd.add_array(StringArray::new("").into()), 4);
        assert!(fd.validate_invariants().is_ok());
    }

    #[test]
    fn renaming_into_a_clash_is_reported() {
        let mut fd = field();
        fd.array_mut(2).unwrap().set_name("v");
        assert_eq!(
            fd.validate_invariants(),
            Err(ArrayError::DuplicateArrayName("v".into()))
        );
    }

    #[test]
    fn component_lookup_spans_arrays() {
        let fd = field();
        assert_eq!(fd.number_of_components(), 5);
        assert_eq!(fd.array_containing_component(2), Some((0, 2)));
        assert_eq!(fd.array_containing_component(3), Some((1, 0)));
        assert_eq!(fd.array_containing_component(4), Some((2, 0)));
        assert_eq!(fd.array_containing_component(5), None);
    }

    #[test]
    fn pass_data_honours_flags() {
        let source = field();
        let mut dest = FieldData::new();
        dest.copy_field_off("label");
        dest.pass_data(&source);
        assert!(!dest.has_array("label"));
        assert_eq!(dest.number_of_arrays(), 2);

        let mut only = FieldData::new();
        only.copy_all_off();
        only.copy_field_on("id");
        only.pass_data(&source);
        assert_eq!(only.number_of_arrays(), 1);
        assert_eq!(only.array(0).unwrap().name(), "id");
    }

    #[test]
    fn extract_tuples_reorders() {
        let fd = field();
        let out = fd.extract_tuples(&[1, 0, 1]).unwrap();
        assert_eq!(out.number_of_tuples(), 3);
        let ids = out.array_by_name("id").unwrap();
        assert_eq!(ids.as_data().unwrap().to_f64_vec(), vec![20.0, 10.0, 20.0]);
        let labels = out.array_by_name("label").unwrap().as_string().unwrap();
        assert_eq!(labels.as_slice(), &["b", "a", "b"]);
        assert!(fd.extract_tuples(&[2]).is_err());
    }

    #[test]
    fn remove_and_initialize() {
        let mut fd = field();
        assert!(fd.remove_array("label").is_some());
        assert_eq!(fd.index_of("id"), Some(1));
        assert!(fd.remove_array("label").is_none());
        fd.copy_field_off("id");
        fd.initialize();
        assert_eq!(fd.number_of_arrays(), 0);
        assert!(fd.is_copy_field_on("id"));
    }
}
