//! Variant: a runtime-tagged value holding any supported scalar, a string, or
//! a shared handle to an array.
//!
//! Conversions never panic. Numeric to numeric uses the cast rules of
//! [`Scalar`]; string to numeric parses the trimmed text; an array-valued
//! variant reads the first value of its array. A failed conversion yields
//! `None` from the checked accessors and the zero value from the convenience
//! accessors (`to_double`, `to_int`, ...).
//!
//! # Ordering
//! [`Variant::less_than`] orders invalid before valid, compares two strings
//! lexicographically, and otherwise compares the numeric readings. A string
//! that does not parse reads as `0`, so `"abc"` and `0` compare equal.
//! [`VariantKey`] provides a total order (type category first, then value)
//! suitable for map keys.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::abstract_array::AbstractArray;
use crate::types::scalar::{IdType, Scalar};
use crate::types::value_type::ValueType;

/// Tagged union over the supported value kinds.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum Variant {
    /// No value; the "invalid" variant.
    #[default]
    Empty,
    Char(i8),
    UnsignedChar(u8),
    Short(i16),
    UnsignedShort(u16),
    Int(i32),
    UnsignedInt(u32),
    Long(i64),
    UnsignedLong(u64),
    Float(f32),
    Double(f64),
    IdType(IdType),
    String(String),
    /// Shared handle to an array; cloning the variant shares the array.
    #[serde(skip)]
    Array(Arc<AbstractArray>),
}

/// Apply `$body` to the primitive payload of a numeric variant, or evaluate
/// `$other` for the non-numeric cases.
macro_rules! with_number {
    ($v:expr, $x:ident => $body:expr, _ => $other:expr) => {
        match $v {
            Variant::Char($x) => $body,
            Variant::UnsignedChar($x) => $body,
            Variant::Short($x) => $body,
            Variant::UnsignedShort($x) => $body,
            Variant::Int($x) => $body,
            Variant::UnsignedInt($x) => $body,
            Variant::Long($x) => $body,
            Variant::UnsignedLong($x) => $body,
            Variant::Float($x) => $body,
            Variant::Double($x) => $body,
            Variant::IdType($x) => $body,
            _ => $other,
        }
    };
}

impl Variant {
    /// Construct an id-typed variant.
    pub fn id(v: IdType) -> Self {
        Variant::IdType(v)
    }

    /// Wrap an array in a shared handle.
    pub fn array(a: AbstractArray) -> Self {
        Variant::Array(Arc::new(a))
    }

    /// False only for [`Variant::Empty`].
    pub fn is_valid(&self) -> bool {
        !matches!(self, Variant::Empty)
    }

    /// Value-type tag of the payload. `None` for empty and array variants.
    pub fn value_type(&self) -> Option<ValueType> {
        Some(match self {
            Variant::Empty | Variant::Array(_) => return None,
            Variant::Char(_) => ValueType::Char,
            Variant::UnsignedChar(_) => ValueType::UnsignedChar,
            Variant::Short(_) => ValueType::Short,
            Variant::UnsignedShort(_) => ValueType::UnsignedShort,
            Variant::Int(_) => ValueType::Int,
            Variant::UnsignedInt(_) => ValueType::UnsignedInt,
            Variant::Long(_) => ValueType::Long,
            Variant::UnsignedLong(_) => ValueType::UnsignedLong,
            Variant::Float(_) => ValueType::Float,
            Variant::Double(_) => ValueType::Double,
            Variant::IdType(_) => ValueType::IdType,
            Variant::String(_) => ValueType::String,
        })
    }

    /// Human-readable name of the payload kind.
    pub fn type_as_string(&self) -> &'static str {
        match self {
            Variant::Empty => "empty",
            Variant::Array(_) => "array",
            other => other.value_type().map_or("empty", ValueType::as_str),
        }
    }

    /// True for the primitive numeric cases.
    pub fn is_numeric(&self) -> bool {
        with_number!(self, _x => true, _ => false)
    }

    /// True for integral numeric cases.
    pub fn is_integral(&self) -> bool {
        self.is_numeric() && !matches!(self, Variant::Float(_) | Variant::Double(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Variant::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Variant::Array(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Variant::Float(_))
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Variant::Double(_))
    }

    /// Borrow the string payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the array payload.
    pub fn as_array(&self) -> Option<&Arc<AbstractArray>> {
        match self {
            Variant::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Checked numeric conversion.
    pub fn to_numeric<T: Scalar>(&self) -> Option<T> {
        match self {
            Variant::Empty => None,
            Variant::String(s) => parse_numeric::<T>(s),
            Variant::Array(a) => a.variant_value(0).and_then(|v| v.to_numeric::<T>()),
            number => with_number!(number, x => Some(T::cast_from(*x)), _ => None),
        }
    }

    /// Numeric reading as `f64`, `0.0` when there is none.
    pub fn to_double(&self) -> f64 {
        self.to_numeric::<f64>().unwrap_or(0.0)
    }

    pub fn to_float(&self) -> f32 {
        self.to_numeric::<f32>().unwrap_or(0.0)
    }

    pub fn to_int(&self) -> i32 {
        self.to_numeric::<i32>().unwrap_or(0)
    }

    pub fn to_long(&self) -> i64 {
        self.to_numeric::<i64>().unwrap_or(0)
    }

    pub fn to_unsigned_long(&self) -> u64 {
        self.to_numeric::<u64>().unwrap_or(0)
    }

    pub fn to_id(&self) -> IdType {
        self.to_long()
    }

    /// Text form of the value; see the `Display` impl.
    pub fn to_string_value(&self) -> String {
        self.to_string()
    }

    /// Ordering used by sorting heterogeneous keys.
    ///
    /// Invalid sorts before valid. Two strings compare lexicographically, two
    /// numbers compare by exact value (an integer against a float included),
    /// two arrays by handle identity, and every other pair by its `f64`
    /// reading. NaN compares equal to everything.
    pub fn less_than(&self, other: &Variant) -> bool {
        self.compare(other) == Ordering::Less
    }

    /// Three-way form of [`less_than`](Self::less_than).
    pub fn compare(&self, other: &Variant) -> Ordering {
        match (self, other) {
            (Variant::Empty, Variant::Empty) => Ordering::Equal,
            (Variant::Empty, _) => Ordering::Less,
            (_, Variant::Empty) => Ordering::Greater,
            (Variant::String(a), Variant::String(b)) => a.cmp(b),
            (Variant::Array(a), Variant::Array(b)) => {
                Arc::as_ptr(a).cmp(&Arc::as_ptr(b))
            }
            (a, b) if a.is_numeric() && b.is_numeric() => {
                numeric_cmp(a, b).unwrap_or(Ordering::Equal)
            }
            (a, b) => a
                .to_double()
                .partial_cmp(&b.to_double())
                .unwrap_or(Ordering::Equal),
        }
    }

    fn category(&self) -> u8 {
        match self {
            Variant::Empty => 0,
            Variant::String(_) => 2,
            Variant::Array(_) => 3,
            _ => 1,
        }
    }
}

fn integral_reading(v: &Variant) -> i128 {
    with_number!(v, x => num_traits::ToPrimitive::to_i128(x).unwrap_or(0), _ => 0)
}

/// Exact order of two numeric variants; `None` when a NaN is involved.
fn numeric_cmp(a: &Variant, b: &Variant) -> Option<Ordering> {
    match (a.is_integral(), b.is_integral()) {
        (true, true) => Some(integral_reading(a).cmp(&integral_reading(b))),
        (true, false) => int_float_cmp(integral_reading(a), b.to_double()),
        (false, true) => int_float_cmp(integral_reading(b), a.to_double()).map(Ordering::reverse),
        (false, false) => a.to_double().partial_cmp(&b.to_double()),
    }
}

/// Compare an integer with a float without rounding the integer.
fn int_float_cmp(i: i128, f: f64) -> Option<Ordering> {
    let limit = i128::MAX as f64; // rounds to 2^127
    if f.is_nan() {
        return None;
    }
    if f >= limit {
        return Some(Ordering::Less);
    }
    if f < -limit {
        return Some(Ordering::Greater);
    }
    let whole = f.trunc();
    // |whole| < 2^127 and integral, so the cast is exact
    Some(i.cmp(&(whole as i128)).then_with(|| {
        let frac = f - whole;
        if frac > 0.0 {
            Ordering::Less
        } else if frac < 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }))
}

fn is_nan(v: &Variant) -> bool {
    !v.is_integral() && v.to_double().is_nan()
}

fn parse_numeric<T: Scalar>(s: &str) -> Option<T> {
    let text = s.trim();
    if T::is_integral() {
        if let Ok(v) = text.parse::<i64>() {
            return Some(T::cast_from(v));
        }
        text.parse::<u64>().ok().map(T::cast_from)
    } else {
        text.parse::<f64>().ok().map(T::from_f64)
    }
}

/// Free-function form of [`Variant::less_than`], for use as a sort predicate.
pub fn variant_less_than(a: &Variant, b: &Variant) -> bool {
    a.less_than(b)
}

/// Free-function equality consistent with [`variant_less_than`].
pub fn variant_equal(a: &Variant, b: &Variant) -> bool {
    a.compare(b) == Ordering::Equal
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        variant_equal(self, other)
    }
}

impl PartialOrd for Variant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Empty => Ok(()),
            Variant::String(s) => f.write_str(s),
            Variant::Array(a) => {
                let n = a.number_of_values();
                for i in 0..n {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    if let Some(v) = a.variant_value(i) {
                        write!(f, "{v}")?;
                    }
                }
                Ok(())
            }
            number => with_number!(number, x => write!(f, "{x}"), _ => Ok(())),
        }
    }
}

impl From<&str> for Variant {
    fn from(s: &str) -> Self {
        Variant::String(s.to_owned())
    }
}

impl From<String> for Variant {
    fn from(s: String) -> Self {
        Variant::String(s)
    }
}

impl From<Arc<AbstractArray>> for Variant {
    fn from(a: Arc<AbstractArray>) -> Self {
        Variant::Array(a)
    }
}

impl From<AbstractArray> for Variant {
    fn from(a: AbstractArray) -> Self {
        Variant::array(a)
    }
}

/// Total-order wrapper around a [`Variant`], for use as a map or set key.
///
/// Orders by category (empty, number, string, array) and then by value.
/// Numbers compare by exact value with every NaN after every other number
/// and equal to each other, so `-0.0` and `0` are the same key.
#[derive(Clone, Debug)]
pub struct VariantKey(pub Variant);

impl VariantKey {
    fn key_cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (&self.0, &other.0);
        a.category().cmp(&b.category()).then_with(|| match (a, b) {
            (x, y) if x.is_numeric() && y.is_numeric() => is_nan(x)
                .cmp(&is_nan(y))
                .then_with(|| numeric_cmp(x, y).unwrap_or(Ordering::Equal)),
            (x, y) => x.compare(y),
        })
    }
}

impl PartialEq for VariantKey {
    fn eq(&self, other: &Self) -> bool {
        self.key_cmp(other) == Ordering::Equal
    }
}

impl Eq for VariantKey {}

impl PartialOrd for VariantKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VariantKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_cmp(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::typed_array::TypedDataArray;

    #[test]
    fn numbers_format_with_default_display() {
        assert_eq!(Variant::from(42i32).to_string(), "42");
        assert_eq!(Variant::from(-7i8).to_string(), "-7");
        assert_eq!(Variant::from(42.5f64).to_string(), "42.5");
        assert_eq!(Variant::from(1.0f64).to_string(), "1");
        assert_eq!(Variant::Empty.to_string(), "");
    }

    #[test]
    fn string_parse_failure_is_none() {
        let v = Variant::from("not a number");
        assert_eq!(v.to_numeric::<i32>(), None);
        assert_eq!(v.to_double(), 0.0);
        assert_eq!(Variant::from(" 12 ").to_int(), 12);
        assert_eq!(Variant::from("2.5").to_double(), 2.5);
        assert_eq!(Variant::from("2.5").to_numeric::<i32>(), None);
    }

    #[test]
    fn numeric_casts_follow_scalar_rules() {
        assert_eq!(Variant::from(3.9f64).to_int(), 3);
        assert_eq!(Variant::from(-1i32).to_numeric::<u8>(), Some(0));
        assert_eq!(Variant::id(9).to_long(), 9);
    }

    #[test]
    fn array_variant_reads_first_value() {
        let mut a = TypedDataArray::<f32>::new("a");
        a.insert_next_value(6.5);
        a.insert_next_value(1.0);
        let v = Variant::array(a.into());
        assert!(v.is_array());
        assert_eq!(v.to_double(), 6.5);
        assert_eq!(v.to_string(), "6.5 1");
    }

    #[test]
    fn ordering_rules() {
        assert!(Variant::Empty.less_than(&Variant::from(0i32)));
        assert!(Variant::from("abc").less_than(&Variant::from("abd")));
        assert!(Variant::from(2i32).less_than(&Variant::from(2.5f64)));
        assert!(Variant::from("10").less_than(&Variant::from(11u8)));
        // non-numeric strings read as zero against numbers
        assert!(variant_equal(&Variant::from("abc"), &Variant::from(0i32)));
        assert!(Variant::from(u64::MAX).compare(&Variant::from(-1i64)) == Ordering::Greater);
    }

    #[test]
    fn variant_key_is_total() {
        use std::collections::BTreeSet;
        let set: BTreeSet<VariantKey> = [
            Variant::from("b"),
            Variant::from(3i32),
            Variant::Empty,
            Variant::from("a"),
            Variant::from(3.0f64),
        ]
        .into_iter()
        .map(VariantKey)
        .collect();
        let order: Vec<String> = set.iter().map(|k| k.0.to_string()).collect();
        assert_eq!(order, vec!["", "3", "a", "b"]);
    }
}
