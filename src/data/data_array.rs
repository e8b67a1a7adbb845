//! DataArray: runtime-typed numeric 1-D array.
//!
//! The enum holds one [`TypedDataArray`] per numeric [`ValueType`] plus the
//! packed [`BitArray`]. `IdType` has no case of its own: it is created as a
//! `Long` array. Typed access goes through [`DataScalar`], which wraps and
//! unwraps the matching case.

use std::cmp::Ordering;

use crate::array_error::ArrayError;
use crate::data::bit_array::BitArray;
use crate::data::tuples::TupleAccess;
use crate::data::typed_array::TypedDataArray;
use crate::types::scalar::{IdType, Scalar};
use crate::types::value_type::ValueType;
use crate::types::variant::Variant;

/// Numeric 1-D array of any supported element type.
#[derive(Clone, Debug, PartialEq)]
pub enum DataArray {
    Bit(BitArray),
    Char(TypedDataArray<i8>),
    UnsignedChar(TypedDataArray<u8>),
    Short(TypedDataArray<i16>),
    UnsignedShort(TypedDataArray<u16>),
    Int(TypedDataArray<i32>),
    UnsignedInt(TypedDataArray<u32>),
    Long(TypedDataArray<i64>),
    UnsignedLong(TypedDataArray<u64>),
    Float(TypedDataArray<f32>),
    Double(TypedDataArray<f64>),
}

/// Run `$body` with `$a` bound to whichever array the enum holds.
macro_rules! dispatch {
    ($self:expr, $a:ident => $body:expr) => {
        match $self {
            DataArray::Bit($a) => $body,
            DataArray::Char($a) => $body,
            DataArray::UnsignedChar($a) => $body,
            DataArray::Short($a) => $body,
            DataArray::UnsignedShort($a) => $body,
            DataArray::Int($a) => $body,
            DataArray::UnsignedInt($a) => $body,
            DataArray::Long($a) => $body,
            DataArray::UnsignedLong($a) => $body,
            DataArray::Float($a) => $body,
            DataArray::Double($a) => $body,
        }
    };
}

/// Like `dispatch!`, with the bit array handled by `$bit`.
macro_rules! dispatch_typed {
    ($self:expr, $b:ident => $bit:expr, $a:ident => $body:expr) => {
        match $self {
            DataArray::Bit($b) => $bit,
            DataArray::Char($a) => $body,
            DataArray::UnsignedChar($a) => $body,
            DataArray::Short($a) => $body,
            DataArray::UnsignedShort($a) => $body,
            DataArray::Int($a) => $body,
            DataArray::UnsignedInt($a) => $body,
            DataArray::Long($a) => $body,
            DataArray::UnsignedLong($a) => $body,
            DataArray::Float($a) => $body,
            DataArray::Double($a) => $body,
        }
    };
}

/// Primitive types with a [`DataArray`] case.
pub trait DataScalar: Scalar {
    /// Wrap a typed array into the runtime-typed enum.
    fn wrap(array: TypedDataArray<Self>) -> DataArray;
    /// Borrow the typed array if the case matches.
    fn unwrap(array: &DataArray) -> Option<&TypedDataArray<Self>>;
    /// Mutably borrow the typed array if the case matches.
    fn unwrap_mut(array: &mut DataArray) -> Option<&mut TypedDataArray<Self>>;
}

macro_rules! impl_data_scalar {
    ($($ty:ty => $case:ident),* $(,)?) => {
        $(
            impl DataScalar for $ty {
                fn wrap(array: TypedDataArray<Self>) -> DataArray {
                    DataArray::$case(array)
                }

                fn unwrap(array: &DataArray) -> Option<&TypedDataArray<Self>> {
                    if let DataArray::$case(a) = array { Some(a) } else { None }
                }

                fn unwrap_mut(array: &mut DataArray) -> Option<&mut TypedDataArray<Self>> {
                    if let DataArray::$case(a) = array { Some(a) } else { None }
                }
            }
        )*
    };
}

impl_data_scalar! {
    i8 => Char,
    u8 => UnsignedChar,
    i16 => Short,
    u16 => UnsignedShort,
    i32 => Int,
    u32 => UnsignedInt,
    i64 => Long,
    u64 => UnsignedLong,
    f32 => Float,
    f64 => Double,
}

impl DataArray {
    /// Empty single-component array of `value_type`.
    ///
    /// # Errors
    /// `UnsupportedValueType` for `String` and `Variant`, which are not
    /// numeric.
    pub fn create(value_type: ValueType) -> Result<Self, ArrayError> {
        Ok(match value_type {
            ValueType::Bit => DataArray::Bit(BitArray::new("")),
            ValueType::Char => DataArray::Char(TypedDataArray::new("")),
            ValueType::UnsignedChar => DataArray::UnsignedChar(TypedDataArray::new("")),
            ValueType::Short => DataArray::Short(TypedDataArray::new("")),
            ValueType::UnsignedShort => DataArray::UnsignedShort(TypedDataArray::new("")),
            ValueType::Int => DataArray::Int(TypedDataArray::new("")),
            ValueType::UnsignedInt => DataArray::UnsignedInt(TypedDataArray::new("")),
            ValueType::Long | ValueType::IdType => DataArray::Long(TypedDataArray::new("")),
            ValueType::UnsignedLong => DataArray::UnsignedLong(TypedDataArray::new("")),
            ValueType::Float => DataArray::Float(TypedDataArray::new("")),
            ValueType::Double => DataArray::Double(TypedDataArray::new("")),
            ValueType::String | ValueType::Variant => {
                log::warn!("{value_type} is not a numeric data array type");
                return Err(ArrayError::UnsupportedValueType(value_type));
            }
        })
    }

    pub fn name(&self) -> &str {
        dispatch!(self, a => a.name())
    }

    pub fn set_name(&mut self, name: &str) {
        dispatch!(self, a => a.set_name(name))
    }

    pub fn value_type(&self) -> ValueType {
        dispatch!(self, a => a.value_type())
    }

    pub fn set_number_of_components(&mut self, components: usize) -> Result<(), ArrayError> {
        dispatch!(self, a => a.set_number_of_components(components))
    }

    pub fn component_name(&self, j: usize) -> Option<&str> {
        dispatch!(self, a => a.component_name(j))
    }

    pub fn set_component_name(&mut self, j: usize, name: &str) -> Result<(), ArrayError> {
        dispatch!(self, a => a.set_component_name(j, name))
    }

    pub fn allocate(&mut self, size: usize) {
        dispatch!(self, a => a.allocate(size))
    }

    pub fn initialize(&mut self) {
        dispatch!(self, a => a.initialize())
    }

    pub fn reset(&mut self) {
        dispatch!(self, a => a.reset())
    }

    pub fn squeeze(&mut self) {
        dispatch!(self, a => a.squeeze())
    }

    pub fn resize(&mut self, num_tuples: usize) {
        dispatch!(self, a => a.resize(num_tuples))
    }

    pub fn set_number_of_tuples(&mut self, n: usize) {
        dispatch!(self, a => a.set_number_of_tuples(n))
    }

    pub fn set_number_of_values(&mut self, n: usize) {
        dispatch!(self, a => a.set_number_of_values(n))
    }

    pub fn memory_size(&self) -> usize {
        dispatch!(self, a => a.memory_size())
    }

    pub fn data_type_min(&self) -> f64 {
        dispatch!(self, a => a.data_type_min())
    }

    pub fn data_type_max(&self) -> f64 {
        dispatch!(self, a => a.data_type_max())
    }

    /// Empty array with the same name, type and tuple width.
    pub fn new_instance(&self) -> Self {
        dispatch_typed!(self, b => DataArray::Bit(b.new_instance()), a => a.new_instance().into())
    }

    /// Replace the contents with a value-cast copy of `source`, keeping this
    /// array's element type.
    pub fn deep_copy_from(&mut self, source: &DataArray) {
        dispatch!(self, a => a.deep_copy_from(source))
    }

    /// Value at flat index `index < number_of_values()`, cast to `T`.
    pub fn value_cast<T: Scalar>(&self, index: usize) -> T {
        dispatch_typed!(
            self,
            b => T::cast_from(b.value_f64(index) as u8),
            a => T::cast_from(a.as_slice()[index])
        )
    }

    /// Value at flat index `index` as a variant; `None` out of range.
    ///
    /// Bits read as `UnsignedChar` variants.
    pub fn variant_value(&self, index: usize) -> Option<Variant> {
        if index >= self.number_of_values() {
            return None;
        }
        Some(dispatch_typed!(
            self,
            b => Variant::UnsignedChar(b.value_f64(index) as u8),
            a => a.as_slice()[index].into_variant()
        ))
    }

    /// Write at tuple `i` a copy of tuple `j` of `source`, growing if needed.
    ///
    /// # Errors
    /// `ComponentCountMismatch` when the tuple widths differ, or an index
    /// error for `j`.
    pub fn insert_tuple_from(
        &mut self,
        i: IdType,
        j: IdType,
        source: &DataArray,
    ) -> Result<(), ArrayError> {
        dispatch!(self, a => a.insert_tuple_from(i, j, source))
    }

    /// Overwrite existing tuple `i` with tuple `j` of `source`.
    pub fn set_tuple_from(
        &mut self,
        i: IdType,
        j: IdType,
        source: &DataArray,
    ) -> Result<(), ArrayError> {
        self.check_tuple(i)?;
        self.insert_tuple_from(i, j, source)
    }

    /// Typed view when the element type is `T`.
    pub fn as_typed<T: DataScalar>(&self) -> Option<&TypedDataArray<T>> {
        T::unwrap(self)
    }

    pub fn as_typed_mut<T: DataScalar>(&mut self) -> Option<&mut TypedDataArray<T>> {
        T::unwrap_mut(self)
    }

    pub fn as_bit(&self) -> Option<&BitArray> {
        match self {
            DataArray::Bit(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_bit_mut(&mut self) -> Option<&mut BitArray> {
        match self {
            DataArray::Bit(b) => Some(b),
            _ => None,
        }
    }

    /// Flat values in use, widened to `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        (0..self.number_of_values()).map(|i| self.value_f64(i)).collect()
    }

    /// Stable order of the flat values. Integers compare exactly in their own
    /// type; floats use `f64::total_cmp`.
    pub fn sorted_order(&self) -> Vec<usize> {
        dispatch_typed!(self,
            b => {
                let v: Vec<f64> = (0..b.number_of_values()).map(|i| b.value_f64(i)).collect();
                let mut perm: Vec<usize> = (0..v.len()).collect();
                perm.sort_by(|&i, &j| v[i].total_cmp(&v[j]));
                perm
            },
            a => scalar_order(a.as_slice())
        )
    }
}

fn scalar_order<T: Scalar>(v: &[T]) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..v.len()).collect();
    if T::is_integral() {
        // integer PartialOrd is total
        perm.sort_by(|&i, &j| v[i].partial_cmp(&v[j]).unwrap_or(Ordering::Equal));
    } else {
        perm.sort_by(|&i, &j| v[i].as_f64().total_cmp(&v[j].as_f64()));
    }
    perm
}

impl TupleAccess for DataArray {
    fn number_of_components(&self) -> usize {
        dispatch!(self, a => a.number_of_components())
    }

    fn max_id(&self) -> IdType {
        dispatch!(self, a => a.max_id())
    }

    fn size(&self) -> usize {
        dispatch!(self, a => a.size())
    }

    fn value_f64(&self, index: usize) -> f64 {
        dispatch!(self, a => a.value_f64(index))
    }

    fn store_f64(&mut self, index: usize, v: f64) {
        dispatch!(self, a => a.store_f64(index, v))
    }

    fn grow_to(&mut self, len: usize) {
        dispatch!(self, a => a.grow_to(len))
    }

    fn set_max_id(&mut self, id: IdType) {
        dispatch!(self, a => a.set_max_id(id))
    }
}

impl<T: DataScalar> From<TypedDataArray<T>> for DataArray {
    fn from(a: TypedDataArray<T>) -> Self {
        T::wrap(a)
    }
}

impl From<BitArray> for DataArray {
    fn from(a: BitArray) -> Self {
        DataArray::Bit(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_covers_numeric_types() {
        for t in ValueType::ALL.iter().copied().filter(|t| t.is_numeric()) {
            let a = DataArray::create(t).unwrap();
            assert_eq!(a.value_type(), t.canonical());
            assert_eq!(a.number_of_tuples(), 0);
        }
        assert!(matches!(
            DataArray::create(ValueType::String),
            Err(ArrayError::UnsupportedValueType(ValueType::String))
        ));
    }

    #[test]
    fn typed_round_trip_through_enum() {
        let mut a: DataArray = TypedDataArray::<u16>::from_values("u", vec![1, 2, 3]).into();
        assert!(a.as_typed::<i16>().is_none());
        a.as_typed_mut::<u16>().unwrap().insert_next_value(4);
        assert_eq!(a.number_of_tuples(), 4);
        assert_eq!(a.value_cast::<f64>(3), 4.0);
        assert_eq!(a.variant_value(0), Some(Variant::UnsignedShort(1)));
        assert_eq!(a.variant_value(4), None);
    }

    #[test]
    fn new_instance_keeps_shape_metadata() {
        let a: DataArray =
            TypedDataArray::<f32>::from_tuples("v", 3, vec![0.0; 6]).unwrap().into();
        let b = a.new_instance();
        assert_eq!(b.name(), "v");
        assert_eq!(b.number_of_components(), 3);
        assert_eq!(b.number_of_tuples(), 0);
        assert_eq!(b.value_type(), ValueType::Float);
    }

    #[test]
    fn set_tuple_from_requires_existing_tuple() {
        let src: DataArray = TypedDataArray::<i32>::from_values("s", vec![5, 6]).into();
        let mut dst: DataArray = TypedDataArray::<f64>::from_values("d", vec![0.0]).into();
        dst.set_tuple_from(0, 1, &src).unwrap();
        assert_eq!(dst.to_f64_vec(), vec![6.0]);
        assert!(dst.set_tuple_from(1, 0, &src).is_err());
        dst.insert_tuple_from(1, 0, &src).unwrap();
        assert_eq!(dst.to_f64_vec(), vec![6.0, 5.0]);
    }

    #[test]
    fn bit_values_read_as_unsigned_char() {
        let a: DataArray = BitArray::from_bits("b", &[1, 0]).into();
        assert_eq!(a.variant_value(0), Some(Variant::UnsignedChar(1)));
        assert_eq!(a.value_cast::<i32>(1), 0);
        assert_eq!(a.data_type_max(), 1.0);
    }
}
