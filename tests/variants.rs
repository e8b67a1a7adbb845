use std::collections::BTreeSet;

use fieldarray::data::{AbstractArray, TypedDataArray};
use fieldarray::types::{ValueType, Variant, VariantKey, variant_equal, variant_less_than};

#[test]
fn numeric_variants_format_like_their_primitives() {
    assert_eq!(Variant::from(42i32).to_string(), "42");
    assert_eq!(Variant::from(-7i8).to_string(), "-7");
    assert_eq!(Variant::from(200u8).to_string(), "200");
    assert_eq!(Variant::from(u64::MAX).to_string(), u64::MAX.to_string());
    assert_eq!(Variant::from(42.5f64).to_string(), "42.5");
    assert_eq!(Variant::from(1.0f32).to_string(), "1");
    assert_eq!(Variant::id(9).to_string(), "9");
    assert_eq!(Variant::Empty.to_string(), "");
    assert_eq!(Variant::from("text").to_string_value(), "text");
}

#[test]
fn string_conversions_are_checked() {
    assert_eq!(Variant::from(" 17 ").to_numeric::<i32>(), Some(17));
    assert_eq!(Variant::from("2.5").to_numeric::<f32>(), Some(2.5));
    assert_eq!(Variant::from("2.5").to_numeric::<i32>(), None);
    assert_eq!(Variant::from("abc").to_numeric::<f64>(), None);
    assert_eq!(Variant::from("abc").to_double(), 0.0);
    assert_eq!(Variant::Empty.to_numeric::<u8>(), None);
}

#[test]
fn numeric_casts_truncate_and_saturate() {
    assert_eq!(Variant::from(3.9f64).to_int(), 3);
    assert_eq!(Variant::from(-1i32).to_unsigned_long(), 0);
    assert_eq!(Variant::from(1.0e20f64).to_long(), i64::MAX);
}

#[test]
fn array_variant_reads_first_value() {
    let mut a = TypedDataArray::<f64>::new("a");
    a.insert_next_value(6.25);
    a.insert_next_value(1.0);
    let v = Variant::array(a.into());
    assert!(v.is_array());
    assert_eq!(v.to_double(), 6.25);
    assert_eq!(v.to_string(), "6.25 1");
    assert_eq!(v.value_type(), None);

    let shared = v.clone();
    let (Some(x), Some(y)) = (v.as_array(), shared.as_array()) else {
        panic!("expected array variants");
    };
    assert!(std::sync::Arc::ptr_eq(x, y));
}

#[test]
fn ordering_rules() {
    let empty = Variant::Empty;
    let one = Variant::from(1i32);
    let half = Variant::from(0.5f64);
    assert!(variant_less_than(&empty, &half));
    assert!(variant_less_than(&half, &one));
    assert!(variant_less_than(&Variant::from("apple"), &Variant::from("banana")));
    assert!(variant_less_than(&Variant::from("10"), &Variant::from("9")));
    assert!(variant_less_than(&Variant::from("9"), &Variant::from(10i32)));
    assert!(variant_equal(&Variant::from("abc"), &Variant::from(0i32)));
    assert!(variant_equal(&Variant::from(3u8), &Variant::from(3.0f32)));
    assert!(variant_less_than(&Variant::from(u64::MAX - 1), &Variant::from(u64::MAX)));
}

#[test]
fn integer_float_comparisons_are_exact() {
    let big = 1i64 << 53;
    let above = Variant::from(big + 1);
    let float = Variant::from(big as f64);
    let exact = Variant::from(big);
    assert!(variant_equal(&float, &exact));
    assert!(variant_less_than(&float, &above));
    assert!(variant_less_than(&exact, &above));
    assert!(variant_less_than(&Variant::from(2i32), &Variant::from(2.5f64)));
    assert!(variant_less_than(&Variant::from(-3.5f32), &Variant::from(-3i8)));
    assert!(variant_less_than(&Variant::from(u64::MAX), &Variant::from(f64::INFINITY)));

    let keys: BTreeSet<VariantKey> = [above.clone(), float, exact, Variant::from(f64::NAN)]
        .into_iter()
        .map(VariantKey)
        .collect();
    let ordered: Vec<Variant> = keys.into_iter().map(|k| k.0).collect();
    assert_eq!(ordered.len(), 3);
    assert!(variant_equal(&ordered[1], &above));
    assert!(ordered[2].to_double().is_nan());
}

#[test]
fn keys_give_a_total_order() {
    let keys: BTreeSet<VariantKey> = [
        Variant::from("b"),
        Variant::from(2i32),
        Variant::Empty,
        Variant::from("a"),
        Variant::from(1.5f64),
    ]
    .into_iter()
    .map(VariantKey)
    .collect();
    let ordered: Vec<String> = keys.iter().map(|k| k.0.to_string()).collect();
    assert_eq!(ordered, vec!["", "1.5", "2", "a", "b"]);
}

#[test]
fn serde_round_trip() {
    for v in [Variant::from(3i16), Variant::from("x"), Variant::Empty, Variant::from(2.5f32)] {
        let json = serde_json::to_string(&v).unwrap();
        let back: Variant = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value_type(), v.value_type());
        assert!(variant_equal(&back, &v));
    }
    for t in ValueType::ALL {
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(serde_json::from_str::<ValueType>(&json).unwrap(), t);
        assert_eq!(ValueType::parse(t.as_str()), Some(t));
    }
}

#[test]
fn array_payload_is_not_serialized() {
    let a: AbstractArray = TypedDataArray::<i32>::from_values("a", vec![1]).into();
    assert!(serde_json::to_string(&Variant::array(a)).is_err());
}
