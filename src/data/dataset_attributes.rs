//! DataSetAttributes: field data with five attribute slots and copy,
//! pass-through and interpolation driven by per-slot copy flags.
//!
//! # Copy protocol
//! [`copy_allocate`](DataSetAttributes::copy_allocate) (or
//! [`interpolate_allocate`](DataSetAttributes::interpolate_allocate)) picks
//! the source arrays to carry over, adds an empty counterpart for each, and
//! records where every source array landed. Only after that may
//! [`copy_data`](DataSetAttributes::copy_data) and the `interpolate_*`
//! methods run; before it they return [`ArrayError::NotAllocated`].
//!
//! # Required arrays
//! A source array is carried over when, in order of precedence:
//! 1. it fills an attribute slot of the source: the destination's flag for
//!    that slot and copy mode decides;
//! 2. the destination has a per-name flag for it: the flag decides;
//! 3. otherwise the destination's copy-all default decides.

use std::ops::Deref;

use crate::array_error::ArrayError;
use crate::data::abstract_array::AbstractArray;
use crate::data::attributes::{AttributeType, CopyMode, NUM_ATTRIBUTES};
use crate::data::field_data::FieldData;
use crate::types::scalar::IdType;
use crate::types::value_type::ValueType;

const NUM_MODES: usize = 3;
const COPY_TUPLE: usize = 0;
const INTERPOLATE: usize = 1;
const PASS_DATA: usize = 2;

/// Field data with attribute slots.
#[derive(Clone, Debug, PartialEq)]
pub struct DataSetAttributes {
    field: FieldData,
    attribute_indices: [Option<usize>; NUM_ATTRIBUTES],
    copy_flags: [[bool; NUM_ATTRIBUTES]; NUM_MODES],
    /// Source array index -> destination array index, set by the allocate calls.
    target_indices: Option<Vec<Option<usize>>>,
    /// Source arrays selected by the last allocate call.
    required_arrays: Vec<usize>,
    /// Destination index per [`FieldList`] entry, set by `copy_allocate_list`.
    list_targets: Option<Vec<usize>>,
}

impl Default for DataSetAttributes {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for DataSetAttributes {
    type Target = FieldData;

    fn deref(&self) -> &FieldData {
        &self.field
    }
}

impl DataSetAttributes {
    pub fn new() -> Self {
        Self {
            field: FieldData::new(),
            attribute_indices: [None; NUM_ATTRIBUTES],
            copy_flags: [[true; NUM_ATTRIBUTES]; NUM_MODES],
            target_indices: None,
            required_arrays: Vec::new(),
            list_targets: None,
        }
    }

    /// Underlying field data.
    pub fn field_data(&self) -> &FieldData {
        &self.field
    }

    /// Mutable access to an array; attribute slots are not rechecked.
    pub fn array_mut(&mut self, index: usize) -> Option<&mut AbstractArray> {
        self.field.array_mut(index)
    }

    pub fn array_by_name_mut(&mut self, name: &str) -> Option<&mut AbstractArray> {
        self.field.array_by_name_mut(name)
    }

    /// Add `array` as a plain (non-attribute) array; see [`FieldData::add_array`].
    ///
    /// When it replaces a same-named array that fills a slot, the slot keeps
    /// it only if it still meets that slot's rules.
    pub fn add_array(&mut self, array: AbstractArray) -> usize {
        self.add_field_array(array, None)
    }

    /// Add to the field data, then drop any slot other than `keep` whose
    /// array was replaced by one it no longer admits.
    fn add_field_array(&mut self, array: AbstractArray, keep: Option<AttributeType>) -> usize {
        let index = self.field.add_array(array);
        for ty in AttributeType::ALL {
            if Some(ty) == keep || self.attribute_indices[ty.index()] != Some(index) {
                continue;
            }
            let Some(replaced) = self.field.array(index) else { continue };
            if let Err(e) = ty.check(replaced) {
                log::warn!("clearing {ty}: replacement `{}` no longer fits ({e})", replaced.name());
                self.attribute_indices[ty.index()] = None;
            }
        }
        index
    }

    /// Remove the array at `index`, keeping attribute slots pointing at the
    /// same arrays. A slot holding the removed array is cleared.
    ///
    /// Pending copy targets are invalidated.
    pub fn remove_array_at(&mut self, index: usize) -> Option<AbstractArray> {
        let removed = self.field.remove_array_at(index)?;
        for slot in &mut self.attribute_indices {
            *slot = match *slot {
                Some(i) if i == index => None,
                Some(i) if i > index => Some(i - 1),
                other => other,
            };
        }
        self.target_indices = None;
        self.list_targets = None;
        Some(removed)
    }

    pub fn remove_array(&mut self, name: &str) -> Option<AbstractArray> {
        let i = self.field.index_of(name)?;
        self.remove_array_at(i)
    }

    /// Place `array` in slot `ty`, replacing (and removing) the array that
    /// held the slot. Returns the array's index.
    ///
    /// # Errors
    /// `AttributeNotNumeric` or `AttributeComponentLimit`; the slot and the
    /// arrays are left untouched.
    pub fn set_attribute(&mut self, array: AbstractArray, ty: AttributeType) -> Result<usize, ArrayError> {
        if let Err(e) = ty.check(&array) {
            log::warn!("cannot set `{}` as {ty}: {e}", array.name());
            return Err(e);
        }
        if let Some(current) = self.attribute_indices[ty.index()] {
            self.remove_array_at(current);
        }
        let index = self.add_field_array(array, Some(ty));
        self.attribute_indices[ty.index()] = Some(index);
        Ok(index)
    }

    /// Make the existing array named `name` the active `ty`.
    pub fn set_active_attribute(&mut self, name: &str, ty: AttributeType) -> Result<usize, ArrayError> {
        let index = self
            .field
            .index_of(name)
            .ok_or_else(|| ArrayError::MissingArray(name.to_owned()))?;
        self.set_active_attribute_index(index, ty)?;
        Ok(index)
    }

    /// Make the array at `index` the active `ty`.
    ///
    /// # Errors
    /// `MissingArray`, `AttributeNotNumeric` or `AttributeComponentLimit`;
    /// the slot keeps its previous array.
    pub fn set_active_attribute_index(&mut self, index: usize, ty: AttributeType) -> Result<(), ArrayError> {
        let array = self
            .field
            .array(index)
            .ok_or_else(|| ArrayError::MissingArray(index.to_string()))?;
        if let Err(e) = ty.check(array) {
            log::warn!("cannot activate `{}` as {ty}: {e}", array.name());
            return Err(e);
        }
        self.attribute_indices[ty.index()] = Some(index);
        Ok(())
    }

    /// Clear slot `ty`; the array stays in the collection.
    pub fn clear_attribute(&mut self, ty: AttributeType) {
        self.attribute_indices[ty.index()] = None;
    }

    pub fn attribute(&self, ty: AttributeType) -> Option<&AbstractArray> {
        self.attribute_indices[ty.index()].and_then(|i| self.field.array(i))
    }

    pub fn attribute_mut(&mut self, ty: AttributeType) -> Option<&mut AbstractArray> {
        let i = self.attribute_indices[ty.index()]?;
        self.field.array_mut(i)
    }

    pub fn attribute_index(&self, ty: AttributeType) -> Option<usize> {
        self.attribute_indices[ty.index()]
    }

    /// Slot filled by the array at `index`, if any.
    pub fn is_array_an_attribute(&self, index: usize) -> Option<AttributeType> {
        AttributeType::ALL
            .into_iter()
            .find(|ty| self.attribute_indices[ty.index()] == Some(index))
    }

    pub fn set_scalars(&mut self, array: AbstractArray) -> Result<usize, ArrayError> {
        self.set_attribute(array, AttributeType::Scalars)
    }

    pub fn set_vectors(&mut self, array: AbstractArray) -> Result<usize, ArrayError> {
        self.set_attribute(array, AttributeType::Vectors)
    }

    pub fn set_normals(&mut self, array: AbstractArray) -> Result<usize, ArrayError> {
        self.set_attribute(array, AttributeType::Normals)
    }

    pub fn set_tcoords(&mut self, array: AbstractArray) -> Result<usize, ArrayError> {
        self.set_attribute(array, AttributeType::TCoords)
    }

    pub fn set_tensors(&mut self, array: AbstractArray) -> Result<usize, ArrayError> {
        self.set_attribute(array, AttributeType::Tensors)
    }

    pub fn scalars(&self) -> Option<&AbstractArray> {
        self.attribute(AttributeType::Scalars)
    }

    pub fn vectors(&self) -> Option<&AbstractArray> {
        self.attribute(AttributeType::Vectors)
    }

    pub fn normals(&self) -> Option<&AbstractArray> {
        self.attribute(AttributeType::Normals)
    }

    pub fn tcoords(&self) -> Option<&AbstractArray> {
        self.attribute(AttributeType::TCoords)
    }

    pub fn tensors(&self) -> Option<&AbstractArray> {
        self.attribute(AttributeType::Tensors)
    }

    // ---- copy flags ----

    pub fn set_copy_attribute(&mut self, ty: AttributeType, on: bool, mode: CopyMode) {
        for &m in mode.slots() {
            self.copy_flags[m][ty.index()] = on;
        }
    }

    /// Whether slot `ty` is copied in `mode`; for `AllCopy`, in every mode.
    pub fn copy_attribute(&self, ty: AttributeType, mode: CopyMode) -> bool {
        mode.slots().iter().all(|&m| self.copy_flags[m][ty.index()])
    }

    /// Copy every slot in `mode` and every array without a per-name flag.
    pub fn copy_all_on(&mut self, mode: CopyMode) {
        self.field.copy_all_on();
        for ty in AttributeType::ALL {
            self.set_copy_attribute(ty, true, mode);
        }
    }

    /// Copy no slot in `mode` and only arrays flagged on by name.
    pub fn copy_all_off(&mut self, mode: CopyMode) {
        self.field.copy_all_off();
        for ty in AttributeType::ALL {
            self.set_copy_attribute(ty, false, mode);
        }
    }

    pub fn copy_field_on(&mut self, name: &str) {
        self.field.copy_field_on(name);
    }

    pub fn copy_field_off(&mut self, name: &str) {
        self.field.copy_field_off(name);
    }

    /// Indices of the `source` arrays carried over in `mode`.
    pub fn compute_required_arrays(&self, source: &DataSetAttributes, mode: CopyMode) -> Vec<usize> {
        let slots = mode.slots();
        (0..source.number_of_arrays())
            .filter(|&i| {
                let Some(array) = source.array(i) else {
                    return false;
                };
                match source.is_array_an_attribute(i) {
                    Some(ty) => slots.iter().all(|&m| self.copy_flags[m][ty.index()]),
                    None => self.field.is_copy_field_on(array.name()),
                }
            })
            .collect()
    }

    /// Arrays selected by the last allocate call, as source indices.
    pub fn required_arrays(&self) -> &[usize] {
        &self.required_arrays
    }

    // ---- pass / allocate ----

    /// Add a copy of every required `source` array and mirror its attribute
    /// slot when the pass-data flag for that slot is on.
    pub fn pass_data(&mut self, source: &DataSetAttributes) {
        let required = self.compute_required_arrays(source, CopyMode::PassData);
        for i in required {
            let Some(array) = source.array(i) else { continue };
            let index = self.add_field_array(array.clone(), None);
            if let Some(ty) = source.is_array_an_attribute(i) {
                if self.copy_flags[PASS_DATA][ty.index()] {
                    self.attribute_indices[ty.index()] = Some(index);
                }
            }
        }
    }

    fn internal_allocate(&mut self, source: &DataSetAttributes, size: usize, mode: CopyMode, slot: usize) {
        let required = self.compute_required_arrays(source, mode);
        let mut targets = vec![None; source.number_of_arrays()];
        for &i in &required {
            let Some(array) = source.array(i) else { continue };
            let mut fresh = array.new_instance();
            let nc = fresh.number_of_components();
            fresh.allocate(if size > 0 { size * nc } else { array.number_of_values() });
            let index = self.add_field_array(fresh, None);
            targets[i] = Some(index);
            if let Some(ty) = source.is_array_an_attribute(i) {
                if self.copy_flags[slot][ty.index()] {
                    self.attribute_indices[ty.index()] = Some(index);
                }
            }
        }
        log::debug!(
            "allocated {} of {} arrays for {:?} ({size} tuples)",
            required.len(),
            source.number_of_arrays(),
            mode
        );
        self.required_arrays = required;
        self.target_indices = Some(targets);
    }

    /// Prepare to copy tuples from `source`: add an empty counterpart of
    /// every required array, sized for `size` tuples (or the source length
    /// when `size == 0`).
    pub fn copy_allocate(&mut self, source: &DataSetAttributes, size: usize) {
        self.internal_allocate(source, size, CopyMode::CopyTuple, COPY_TUPLE);
    }

    /// Like [`copy_allocate`](Self::copy_allocate) for interpolation.
    pub fn interpolate_allocate(&mut self, source: &DataSetAttributes, size: usize) {
        self.internal_allocate(source, size, CopyMode::Interpolate, INTERPOLATE);
    }

    /// Prepare to copy tuples within this collection: every array is
    /// resized to `size` tuples and maps to itself.
    pub fn copy_allocate_self(&mut self, size: usize) {
        let n = self.field.number_of_arrays();
        for i in 0..n {
            if let Some(a) = self.field.array_mut(i) {
                a.resize(size);
            }
        }
        self.required_arrays = (0..n).collect();
        self.target_indices = Some((0..n).map(Some).collect());
    }

    fn targets(&self) -> Result<Vec<(usize, usize)>, ArrayError> {
        let targets = self.target_indices.as_ref().ok_or(ArrayError::NotAllocated)?;
        Ok(self
            .required_arrays
            .iter()
            .filter_map(|&i| targets.get(i).copied().flatten().map(|t| (i, t)))
            .collect())
    }

    /// Copy tuple `from` of every required `source` array to tuple `to` of
    /// its counterpart.
    ///
    /// # Errors
    /// `NotAllocated` before an allocate call, or the first tuple copy
    /// failure.
    pub fn copy_data(&mut self, source: &DataSetAttributes, from: IdType, to: IdType) -> Result<(), ArrayError> {
        for (i, t) in self.targets()? {
            let (Some(src), Some(dst)) = (source.array(i), self.field.array_mut(t)) else {
                return Err(ArrayError::MissingArray(i.to_string()));
            };
            Self::copy_tuple(src, dst, from, to)?;
        }
        Ok(())
    }

    /// Copy tuple `from` to tuple `to` within this collection; requires
    /// [`copy_allocate_self`](Self::copy_allocate_self).
    pub fn copy_data_within(&mut self, from: IdType, to: IdType) -> Result<(), ArrayError> {
        for (_, t) in self.targets()? {
            let Some(array) = self.field.array_mut(t) else {
                return Err(ArrayError::MissingArray(t.to_string()));
            };
            let mut tuple = array.new_instance();
            tuple.insert_tuple_from(0, from, array)?;
            array.insert_tuple_from(to, 0, &tuple)?;
        }
        Ok(())
    }

    /// Copy one tuple between two arrays of the same kind.
    pub fn copy_tuple(
        source: &AbstractArray,
        dest: &mut AbstractArray,
        from: IdType,
        to: IdType,
    ) -> Result<(), ArrayError> {
        dest.insert_tuple_from(to, from, source)
    }

    /// Write at tuple `to` of every counterpart the weighted combination of
    /// tuples `ids` of the source array.
    pub fn interpolate_point(
        &mut self,
        source: &DataSetAttributes,
        to: IdType,
        ids: &[IdType],
        weights: &[f64],
    ) -> Result<(), ArrayError> {
        for (i, t) in self.targets()? {
            let (Some(src), Some(dst)) = (source.array(i), self.field.array_mut(t)) else {
                return Err(ArrayError::MissingArray(i.to_string()));
            };
            dst.interpolate_tuple(to, ids, src, weights)?;
        }
        Ok(())
    }

    /// Write at tuple `to` the blend of source tuples `p1` and `p2` at `t`.
    pub fn interpolate_edge(
        &mut self,
        source: &DataSetAttributes,
        to: IdType,
        p1: IdType,
        p2: IdType,
        t: f64,
    ) -> Result<(), ArrayError> {
        for (i, k) in self.targets()? {
            let (Some(src), Some(dst)) = (source.array(i), self.field.array_mut(k)) else {
                return Err(ArrayError::MissingArray(i.to_string()));
            };
            dst.interpolate_tuple_pair(to, p1, src, p2, src, t)?;
        }
        Ok(())
    }

    /// Blend tuple `id` of the attributes of `from1` and `from2` at `t` into
    /// tuple `id` of this collection's attributes.
    ///
    /// Only slots with the interpolate flag on and filled in all three
    /// collections take part.
    pub fn interpolate_time(
        &mut self,
        from1: &DataSetAttributes,
        from2: &DataSetAttributes,
        id: IdType,
        t: f64,
    ) -> Result<(), ArrayError> {
        if self.target_indices.is_none() {
            return Err(ArrayError::NotAllocated);
        }
        for ty in AttributeType::ALL {
            if !self.copy_flags[INTERPOLATE][ty.index()] {
                continue;
            }
            let (Some(a1), Some(a2)) = (from1.attribute(ty), from2.attribute(ty)) else {
                continue;
            };
            if let Some(dst) = self.attribute_mut(ty) {
                dst.interpolate_tuple_pair(id, id, a1, id, a2, t)?;
            }
        }
        Ok(())
    }

    // ---- field lists ----

    /// Prepare to copy from several inputs described by `list`: one empty
    /// array is added per list entry, sized for `size` tuples.
    pub fn copy_allocate_list(&mut self, list: &FieldList, size: usize) {
        let mut targets = Vec::with_capacity(list.entries.len());
        for entry in &list.entries {
            let mut fresh = entry.template.clone();
            fresh.allocate(size * entry.components);
            let index = self.add_field_array(fresh, None);
            if let Some(ty) = entry.attribute {
                if self.copy_flags[COPY_TUPLE][ty.index()] {
                    self.attribute_indices[ty.index()] = Some(index);
                }
            }
            targets.push(index);
        }
        self.list_targets = Some(targets);
    }

    /// Copy tuple `from` of input `input_index` (described by `list`) to
    /// tuple `to` of the arrays set up by [`copy_allocate_list`](Self::copy_allocate_list).
    ///
    /// # Errors
    /// `NotAllocated`, `InputOutOfRange`, or a tuple copy failure.
    pub fn copy_data_list(
        &mut self,
        list: &FieldList,
        input_index: usize,
        source: &DataSetAttributes,
        from: IdType,
        to: IdType,
    ) -> Result<(), ArrayError> {
        let targets = self.list_targets.clone().ok_or(ArrayError::NotAllocated)?;
        if input_index >= list.number_of_inputs {
            return Err(ArrayError::InputOutOfRange { index: input_index, count: list.number_of_inputs });
        }
        for (entry, t) in list.entries.iter().zip(targets) {
            let i = entry.input_indices[input_index];
            let (Some(src), Some(dst)) = (source.array(i), self.field.array_mut(t)) else {
                return Err(ArrayError::MissingArray(entry.name.clone()));
            };
            dst.insert_tuple_from(to, from, src)?;
        }
        Ok(())
    }

    // ---- structure ----

    /// Replace the arrays with empty arrays shaped like those of `source`,
    /// keeping its attribute slots.
    pub fn copy_structure(&mut self, source: &DataSetAttributes) {
        self.field.copy_structure(&source.field);
        self.attribute_indices = source.attribute_indices;
        self.target_indices = None;
        self.list_targets = None;
    }

    /// Remove every array, slot and per-name flag; copy flags return to
    /// their defaults.
    pub fn initialize(&mut self) {
        *self = Self::new();
    }

    pub fn reset(&mut self) {
        self.field.reset();
    }
}

#[derive(Clone, Debug, PartialEq)]
struct FieldEntry {
    name: String,
    value_type: ValueType,
    components: usize,
    attribute: Option<AttributeType>,
    template: AbstractArray,
    /// Array index of this entry in each input.
    input_indices: Vec<usize>,
}

/// Arrays common to several [`DataSetAttributes`] inputs.
///
/// Attribute arrays match by slot, the others by name; in both cases the
/// value type and component count must agree. Arrays missing from any input
/// are dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldList {
    entries: Vec<FieldEntry>,
    number_of_inputs: usize,
}

impl FieldList {
    /// Intersection of the arrays of `inputs`.
    pub fn from_inputs(inputs: &[&DataSetAttributes]) -> Self {
        let mut list = FieldList::default();
        let Some((first, rest)) = inputs.split_first() else {
            return list;
        };
        list.entries = first
            .iter()
            .enumerate()
            .map(|(i, a)| FieldEntry {
                name: a.name().to_owned(),
                value_type: a.value_type(),
                components: a.number_of_components(),
                attribute: first.is_array_an_attribute(i),
                template: a.new_instance(),
                input_indices: vec![i],
            })
            .collect();
        list.number_of_inputs = 1;
        for input in rest {
            list.intersect(input);
        }
        list
    }

    /// Narrow the list to the arrays also present in `input`.
    pub fn intersect(&mut self, input: &DataSetAttributes) {
        self.entries.retain_mut(|entry| {
            let found = match entry.attribute {
                Some(ty) => input.attribute_index(ty),
                None => input.index_of(&entry.name),
            };
            let Some(i) = found else { return false };
            let Some(a) = input.array(i) else { return false };
            if a.value_type() != entry.value_type || a.number_of_components() != entry.components {
                return false;
            }
            entry.input_indices.push(i);
            true
        });
        self.number_of_inputs += 1;
    }

    pub fn number_of_inputs(&self) -> usize {
        self.number_of_inputs
    }

    pub fn number_of_fields(&self) -> usize {
        self.entries.len()
    }

    /// Names of the common arrays.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}
