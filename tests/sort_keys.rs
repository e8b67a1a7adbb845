use fieldarray::data::sort::{sort_keys, sort_keys_values, sort_keys_values_by, sort_permutation};
use fieldarray::data::{AbstractArray, StringArray, TypedDataArray, VariantArray};
use fieldarray::types::Variant;
use proptest::prelude::*;

proptest! {
    #[test]
    fn keys_sorted_and_pairs_preserved(keys in proptest::collection::vec(-50i32..50, 0..40)) {
        let pairs: Vec<(i32, String)> =
            keys.iter().enumerate().map(|(i, &k)| (k, format!("v{i}"))).collect();
        let mut k: AbstractArray = TypedDataArray::from_values("k", keys.clone()).into();
        let mut v: AbstractArray =
            StringArray::from_values("v", pairs.iter().map(|(_, s)| s.clone())).into();

        sort_keys_values(&mut k, &mut v).unwrap();

        let sorted_keys = k.as_typed::<i32>().unwrap().as_slice().to_vec();
        prop_assert!(sorted_keys.windows(2).all(|w| w[0] <= w[1]));
        let sorted_values = v.as_string().unwrap().as_slice();
        for (key, value) in sorted_keys.iter().zip(sorted_values) {
            prop_assert!(pairs.contains(&(*key, value.clone())));
        }
        prop_assert_eq!(sorted_values.len(), pairs.len());
    }

    #[test]
    fn i64_keys_sort_exactly(keys in proptest::collection::vec(any::<i64>(), 0..30)) {
        let mut k: AbstractArray = TypedDataArray::from_values("k", keys.clone()).into();
        sort_keys(&mut k).unwrap();
        let mut expected = keys;
        expected.sort();
        prop_assert_eq!(k.as_typed::<i64>().unwrap().as_slice(), expected.as_slice());
    }

    #[test]
    fn u64_keys_sort_exactly(keys in proptest::collection::vec(any::<u64>(), 0..30)) {
        let mut k: AbstractArray = TypedDataArray::from_values("k", keys.clone()).into();
        sort_keys(&mut k).unwrap();
        let mut expected = keys;
        expected.sort();
        prop_assert_eq!(k.as_typed::<u64>().unwrap().as_slice(), expected.as_slice());
    }

    #[test]
    fn float_keys_sort_like_total_cmp(keys in proptest::collection::vec(any::<f64>(), 0..30)) {
        let mut k: AbstractArray = TypedDataArray::from_values("k", keys.clone()).into();
        sort_keys(&mut k).unwrap();
        let mut expected = keys;
        expected.sort_by(f64::total_cmp);
        let got = k.as_typed::<f64>().unwrap().as_slice();
        prop_assert_eq!(got.len(), expected.len());
        for (a, b) in got.iter().zip(&expected) {
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}

#[test]
fn multi_component_values_move_as_tuples() {
    let mut k: AbstractArray = StringArray::from_values("k", ["c", "a", "b"]).into();
    let mut v: AbstractArray =
        TypedDataArray::<i16>::from_tuples("v", 2, vec![30, 31, 10, 11, 20, 21]).unwrap().into();
    sort_keys_values(&mut k, &mut v).unwrap();
    assert_eq!(v.as_typed::<i16>().unwrap().as_slice(), &[10, 11, 20, 21, 30, 31]);
}

#[test]
fn equal_keys_keep_insertion_order() {
    let k: AbstractArray = TypedDataArray::<u8>::from_values("k", vec![2, 1, 2, 1]).into();
    assert_eq!(sort_permutation(&k).unwrap(), vec![1, 3, 0, 2]);
}

#[test]
fn mixed_variant_keys_with_custom_order() {
    let mut k: AbstractArray =
        VariantArray::from_values("k", [Variant::from("b"), Variant::from(1i32), Variant::from("a")])
            .into();
    let mut v: AbstractArray = TypedDataArray::<i32>::from_values("v", vec![0, 1, 2]).into();
    // strings before numbers, then natural order
    sort_keys_values_by(&mut k, &mut v, |x, y| {
        y.is_string().cmp(&x.is_string()).then_with(|| x.compare(y))
    })
    .unwrap();
    assert_eq!(v.as_typed::<i32>().unwrap().as_slice(), &[2, 0, 1]);
}
