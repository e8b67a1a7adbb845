//! AbstractArray: any 1-D array a field container can hold.
//!
//! Numeric arrays, string arrays and variant arrays share naming, tuple
//! bookkeeping, allocation and cross-array tuple copy. Tuple copy and
//! interpolation require both arrays to be of the same kind; numeric arrays
//! additionally cast between element types.

use crate::array_error::ArrayError;
use crate::data::bit_array::BitArray;
use crate::data::data_array::{DataArray, DataScalar};
use crate::data::tuples::TupleAccess;
use crate::data::typed_array::TypedDataArray;
use crate::data::value_array::{StringArray, VariantArray};
use crate::types::scalar::IdType;
use crate::types::value_type::ValueType;
use crate::types::variant::Variant;

/// Runtime-typed 1-D array.
#[derive(Clone, Debug, PartialEq)]
pub enum AbstractArray {
    Data(DataArray),
    String(StringArray),
    Variant(VariantArray),
}

macro_rules! each {
    ($self:expr, $a:ident => $body:expr) => {
        match $self {
            AbstractArray::Data($a) => $body,
            AbstractArray::String($a) => $body,
            AbstractArray::Variant($a) => $body,
        }
    };
}

/// Empty single-component array of any value type.
///
/// `IdType` is created as a `Long` array.
pub fn create_data_array(value_type: ValueType) -> AbstractArray {
    match value_type {
        ValueType::String => AbstractArray::String(StringArray::new("")),
        ValueType::Variant => AbstractArray::Variant(VariantArray::new("")),
        numeric => match DataArray::create(numeric) {
            Ok(a) => AbstractArray::Data(a),
            Err(_) => unreachable!("every numeric value type has a data array"),
        },
    }
}

impl AbstractArray {
    pub fn name(&self) -> &str {
        each!(self, a => a.name())
    }

    pub fn set_name(&mut self, name: &str) {
        each!(self, a => a.set_name(name))
    }

    /// Builder form of [`set_name`](Self::set_name).
    pub fn named(mut self, name: &str) -> Self {
        self.set_name(name);
        self
    }

    pub fn value_type(&self) -> ValueType {
        each!(self, a => a.value_type())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, AbstractArray::Data(_))
    }

    pub fn number_of_components(&self) -> usize {
        each!(self, a => a.number_of_components())
    }

    pub fn set_number_of_components(&mut self, components: usize) -> Result<(), ArrayError> {
        each!(self, a => a.set_number_of_components(components))
    }

    pub fn component_name(&self, j: usize) -> Option<&str> {
        each!(self, a => a.component_name(j))
    }

    pub fn number_of_tuples(&self) -> usize {
        each!(self, a => a.number_of_tuples())
    }

    pub fn number_of_values(&self) -> usize {
        each!(self, a => a.number_of_values())
    }

    pub fn max_id(&self) -> IdType {
        each!(self, a => a.max_id())
    }

    pub fn size(&self) -> usize {
        each!(self, a => a.size())
    }

    pub fn allocate(&mut self, size: usize) {
        each!(self, a => a.allocate(size))
    }

    pub fn initialize(&mut self) {
        each!(self, a => a.initialize())
    }

    pub fn reset(&mut self) {
        each!(self, a => a.reset())
    }

    pub fn squeeze(&mut self) {
        each!(self, a => a.squeeze())
    }

    pub fn resize(&mut self, num_tuples: usize) {
        each!(self, a => a.resize(num_tuples))
    }

    pub fn set_number_of_tuples(&mut self, n: usize) {
        each!(self, a => a.set_number_of_tuples(n))
    }

    pub fn memory_size(&self) -> usize {
        each!(self, a => a.memory_size())
    }

    /// Value at flat index `index` as a variant; `None` out of range.
    pub fn variant_value(&self, index: usize) -> Option<Variant> {
        each!(self, a => a.variant_value(index))
    }

    /// Empty array of the same kind, name and tuple width.
    pub fn new_instance(&self) -> Self {
        match self {
            AbstractArray::Data(a) => AbstractArray::Data(a.new_instance()),
            AbstractArray::String(a) => AbstractArray::String(a.new_instance()),
            AbstractArray::Variant(a) => AbstractArray::Variant(a.new_instance()),
        }
    }

    pub fn as_data(&self) -> Option<&DataArray> {
        match self {
            AbstractArray::Data(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_data_mut(&mut self) -> Option<&mut DataArray> {
        match self {
            AbstractArray::Data(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringArray> {
        match self {
            AbstractArray::String(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_string_mut(&mut self) -> Option<&mut StringArray> {
        match self {
            AbstractArray::String(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_variant(&self) -> Option<&VariantArray> {
        match self {
            AbstractArray::Variant(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_variant_mut(&mut self) -> Option<&mut VariantArray> {
        match self {
            AbstractArray::Variant(a) => Some(a),
            _ => None,
        }
    }

    /// Typed numeric view when the element type is `T`.
    pub fn as_typed<T: DataScalar>(&self) -> Option<&TypedDataArray<T>> {
        self.as_data().and_then(DataArray::as_typed)
    }

    pub fn as_typed_mut<T: DataScalar>(&mut self) -> Option<&mut TypedDataArray<T>> {
        self.as_data_mut().and_then(DataArray::as_typed_mut)
    }

    fn kind_mismatch(&self, other: &AbstractArray) -> ArrayError {
        log::warn!(
            "array `{}` ({}) cannot take tuples from `{}` ({})",
            self.name(),
            self.value_type(),
            other.name(),
            other.value_type()
        );
        ArrayError::ValueTypeMismatch {
            expected: self.value_type(),
            found: other.value_type(),
        }
    }

    /// Write at tuple `i` a copy of tuple `j` of `source`, growing if needed.
    ///
    /// # Errors
    /// `ValueTypeMismatch` when `source` is of a different kind (numeric,
    /// string or variant), `ComponentCountMismatch` for differing tuple
    /// widths, or an index error for `j`.
    pub fn insert_tuple_from(
        &mut self,
        i: IdType,
        j: IdType,
        source: &AbstractArray,
    ) -> Result<(), ArrayError> {
        match (&mut *self, source) {
            (AbstractArray::Data(a), AbstractArray::Data(s)) => a.insert_tuple_from(i, j, s),
            (AbstractArray::String(a), AbstractArray::String(s)) => a.insert_tuple_from(i, j, s),
            (AbstractArray::Variant(a), AbstractArray::Variant(s)) => a.insert_tuple_from(i, j, s),
            _ => Err(self.kind_mismatch(source)),
        }
    }

    /// Overwrite existing tuple `i` with tuple `j` of `source`.
    pub fn set_tuple_from(
        &mut self,
        i: IdType,
        j: IdType,
        source: &AbstractArray,
    ) -> Result<(), ArrayError> {
        match (&mut *self, source) {
            (AbstractArray::Data(a), AbstractArray::Data(s)) => a.set_tuple_from(i, j, s),
            (AbstractArray::String(a), AbstractArray::String(s)) => a.set_tuple_from(i, j, s),
            (AbstractArray::Variant(a), AbstractArray::Variant(s)) => a.set_tuple_from(i, j, s),
            _ => Err(self.kind_mismatch(source)),
        }
    }

    /// Append tuple `j` of `source` and return the new tuple index.
    pub fn insert_next_tuple_from(
        &mut self,
        j: IdType,
        source: &AbstractArray,
    ) -> Result<IdType, ArrayError> {
        let i = self.number_of_tuples() as IdType;
        self.insert_tuple_from(i, j, source)?;
        Ok(i)
    }

    /// Write at tuple `i` the weighted combination of tuples `ids` of
    /// `source`.
    ///
    /// Numeric arrays blend; string and variant arrays take the tuple with
    /// the largest weight.
    pub fn interpolate_tuple(
        &mut self,
        i: IdType,
        ids: &[IdType],
        source: &AbstractArray,
        weights: &[f64],
    ) -> Result<(), ArrayError> {
        match (&mut *self, source) {
            (AbstractArray::Data(a), AbstractArray::Data(s)) => {
                a.interpolate_tuple(i, ids, s, weights)
            }
            (AbstractArray::String(a), AbstractArray::String(s)) => {
                a.interpolate_tuple(i, ids, s, weights)
            }
            (AbstractArray::Variant(a), AbstractArray::Variant(s)) => {
                a.interpolate_tuple(i, ids, s, weights)
            }
            _ => Err(self.kind_mismatch(source)),
        }
    }

    /// Write at tuple `i` the blend of `source1[id1]` and `source2[id2]` at
    /// parameter `t`.
    pub fn interpolate_tuple_pair(
        &mut self,
        i: IdType,
        id1: IdType,
        source1: &AbstractArray,
        id2: IdType,
        source2: &AbstractArray,
        t: f64,
    ) -> Result<(), ArrayError> {
        match (&mut *self, source1, source2) {
            (AbstractArray::Data(a), AbstractArray::Data(s1), AbstractArray::Data(s2)) => {
                a.interpolate_tuple_pair(i, id1, s1, id2, s2, t)
            }
            (AbstractArray::String(a), AbstractArray::String(s1), AbstractArray::String(s2)) => {
                a.interpolate_tuple_pair(i, id1, s1, id2, s2, t)
            }
            (
                AbstractArray::Variant(a),
                AbstractArray::Variant(s1),
                AbstractArray::Variant(s2),
            ) => a.interpolate_tuple_pair(i, id1, s1, id2, s2, t),
            (_, s1, s2) => {
                let other = if std::mem::discriminant(self) != std::mem::discriminant(s1) {
                    s1
                } else {
                    s2
                };
                Err(self.kind_mismatch(other))
            }
        }
    }

    /// Replace the contents with a copy of `source`.
    ///
    /// Numeric arrays keep their own element type and cast; other kinds must
    /// match exactly.
    pub fn deep_copy_from(&mut self, source: &AbstractArray) -> Result<(), ArrayError> {
        match (&mut *self, source) {
            (AbstractArray::Data(a), AbstractArray::Data(s)) => {
                a.deep_copy_from(s);
                Ok(())
            }
            (AbstractArray::String(a), AbstractArray::String(s)) => {
                *a = s.clone();
                Ok(())
            }
            (AbstractArray::Variant(a), AbstractArray::Variant(s)) => {
                *a = s.clone();
                Ok(())
            }
            _ => Err(self.kind_mismatch(source)),
        }
    }
}

impl From<DataArray> for AbstractArray {
    fn from(a: DataArray) -> Self {
        AbstractArray::Data(a)
    }
}

impl<T: DataScalar> From<TypedDataArray<T>> for AbstractArray {
    fn from(a: TypedDataArray<T>) -> Self {
        AbstractArray::Data(a.into())
    }
}

impl From<BitArray> for AbstractArray {
    fn from(a: BitArray) -> Self {
        AbstractArray::Data(a.into())
    }
}

impl From<StringArray> for AbstractArray {
    fn from(a: StringArray) -> Self {
        AbstractArray::String(a)
    }
}

impl From<VariantArray> for AbstractArray {
    fn from(a: VariantArray) -> Self {
        AbstractArray::Variant(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_covers_every_type() {
        for t in ValueType::ALL {
            let a = create_data_array(t);
            assert_eq!(a.value_type(), t.canonical());
            assert_eq!(a.number_of_components(), 1);
        }
    }

    #[test]
    fn numeric_copy_casts() {
        let src: AbstractArray = TypedDataArray::<f64>::from_values("s", vec![2.75]).into();
        let mut dst = create_data_array(ValueType::Short);
        dst.insert_next_tuple_from(0, &src).unwrap();
        assert_eq!(dst.variant_value(0), Some(Variant::Short(2)));
    }

    #[test]
    fn cross_kind_copy_is_rejected() {
        let src: AbstractArray = StringArray::from_values("s", ["x"]).into();
        let mut dst = create_data_array(ValueType::Int);
        let err = dst.insert_tuple_from(0, 0, &src).unwrap_err();
        assert_eq!(
            err,
            ArrayError::ValueTypeMismatch { expected: ValueType::Int, found: ValueType::String }
        );
        assert_eq!(dst.number_of_tuples(), 0);
    }

    #[test]
    fn interpolation_dispatches_by_kind() {
        let num: AbstractArray = TypedDataArray::<f32>::from_values("n", vec![0.0, 4.0]).into();
        let mut out = num.new_instance();
        out.interpolate_tuple_pair(0, 0, &num, 1, &num, 0.25).unwrap();
        assert_eq!(out.variant_value(0), Some(Variant::Float(1.0)));

        let text: AbstractArray = StringArray::from_values("t", ["a", "b"]).into();
        let mut out = text.new_instance();
        out.interpolate_tuple(0, &[0, 1], &text, &[0.4, 0.6]).unwrap();
        assert_eq!(out.variant_value(0), Some(Variant::from("b")));
        assert!(out.interpolate_tuple_pair(1, 0, &text, 0, &num, 0.5).is_err());
    }
}
