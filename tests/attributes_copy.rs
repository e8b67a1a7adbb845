use fieldarray::array_error::ArrayError;
use fieldarray::data::{
    AbstractArray, AttributeType, BitArray, CopyMode, DataSetAttributes, StringArray, TupleAccess,
    TypedDataArray, VariantArray,
};
use fieldarray::types::Variant;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TUPLES: usize = 64;

fn rng() -> StdRng {
    StdRng::seed_from_u64(0xDEADBEEF)
}

fn random_source(rng: &mut StdRng) -> DataSetAttributes {
    let mut pd = DataSetAttributes::new();

    let scalars: Vec<f32> = (0..TUPLES).map(|_| rng.gen_range(-100.0..100.0)).collect();
    pd.set_scalars(TypedDataArray::from_values("temperature", scalars).into())
        .unwrap();

    let vectors: Vec<f64> = (0..TUPLES * 3).map(|_| rng.r#gen::<f64>()).collect();
    pd.set_vectors(TypedDataArray::from_tuples("velocity", 3, vectors).unwrap().into())
        .unwrap();

    let tcoords: Vec<u16> = (0..TUPLES * 2).map(|_| rng.r#gen::<u16>()).collect();
    pd.set_tcoords(TypedDataArray::from_tuples("uv", 2, tcoords).unwrap().into())
        .unwrap();

    let flags: Vec<u8> = (0..TUPLES).map(|_| rng.gen_range(0..2)).collect();
    pd.add_array(BitArray::from_bits("mask", &flags).into());

    pd.add_array(StringArray::from_values("region", (0..TUPLES).map(|i| format!("r{}", i % 5))).into());

    let mut tags = VariantArray::new("tag");
    for i in 0..TUPLES {
        if i % 2 == 0 {
            tags.insert_next_value(Variant::from(i as i32));
        } else {
            tags.insert_next_value(Variant::from(format!("t{i}")));
        }
    }
    pd.add_array(tags.into());
    pd
}

fn tuple_variants(a: &AbstractArray, i: usize) -> Vec<Variant> {
    let nc = a.number_of_components();
    (0..nc).filter_map(|k| a.variant_value(i * nc + k)).collect()
}

#[test]
fn copy_data_reproduces_every_required_tuple() {
    let mut rng = rng();
    let source = random_source(&mut rng);
    let mut dest = DataSetAttributes::new();
    dest.copy_allocate(&source, TUPLES);
    assert_eq!(dest.required_arrays().len(), source.number_of_arrays());

    let mapping: Vec<(usize, usize)> = (0..TUPLES).map(|to| (rng.gen_range(0..TUPLES), to)).collect();
    for &(from, to) in &mapping {
        dest.copy_data(&source, from as i64, to as i64).unwrap();
    }

    for &i in dest.required_arrays() {
        let src = source.array(i).unwrap();
        let dst = dest.array_by_name(src.name()).unwrap();
        assert_eq!(dst.value_type(), src.value_type());
        assert_eq!(dst.number_of_tuples(), TUPLES);
        for &(from, to) in &mapping {
            assert_eq!(tuple_variants(dst, to), tuple_variants(src, from), "array {}", src.name());
        }
    }
    for ty in [AttributeType::Scalars, AttributeType::Vectors, AttributeType::TCoords] {
        assert_eq!(
            dest.attribute(ty).map(AbstractArray::name),
            source.attribute(ty).map(AbstractArray::name)
        );
    }
}

#[test]
fn copy_flags_restrict_required_arrays() {
    let source = random_source(&mut rng());
    let mut dest = DataSetAttributes::new();
    dest.set_copy_attribute(AttributeType::Vectors, false, CopyMode::AllCopy);
    dest.copy_field_off("region");
    dest.copy_allocate(&source, 0);

    assert!(!dest.has_array("velocity"));
    assert!(!dest.has_array("region"));
    assert!(dest.has_array("mask"));
    assert!(dest.vectors().is_none());
    assert_eq!(dest.number_of_arrays(), source.number_of_arrays() - 2);
    assert!(!dest.copy_attribute(AttributeType::Vectors, CopyMode::Interpolate));
    assert!(dest.copy_attribute(AttributeType::Scalars, CopyMode::AllCopy));
}

#[test]
fn interpolate_point_blends_numeric_arrays() {
    let source = random_source(&mut rng());
    let mut dest = DataSetAttributes::new();
    dest.interpolate_allocate(&source, 1);
    let ids = [3, 10, 17];
    let weights = [0.2, 0.3, 0.5];
    dest.interpolate_point(&source, 0, &ids, &weights).unwrap();

    let src = source.vectors().unwrap().as_data().unwrap();
    let out = dest.vectors().unwrap().as_data().unwrap();
    for k in 0..3 {
        let expected: f64 = ids
            .iter()
            .zip(weights)
            .map(|(&id, w)| w * src.component(id, k).unwrap())
            .sum();
        assert!((out.component(0, k).unwrap() - expected).abs() < 1e-12);
    }

    let region = dest.array_by_name("region").unwrap();
    assert_eq!(region.variant_value(0), source.array_by_name("region").unwrap().variant_value(17));
}

#[test]
fn interpolation_without_ids_keeps_arrays_aligned() {
    let source = random_source(&mut rng());
    let mut dest = DataSetAttributes::new();
    dest.interpolate_allocate(&source, 2);
    dest.interpolate_point(&source, 1, &[], &[]).unwrap();
    for a in dest.iter() {
        assert_eq!(a.number_of_tuples(), 2, "array {}", a.name());
    }
    assert_eq!(dest.array_by_name("region").unwrap().variant_value(1), Some(Variant::from("")));
}

#[test]
fn guards_and_rejections() {
    let source = random_source(&mut rng());
    let mut dest = DataSetAttributes::new();
    assert_eq!(dest.copy_data(&source, 0, 0), Err(ArrayError::NotAllocated));
    assert_eq!(
        dest.interpolate_point(&source, 0, &[0], &[1.0]),
        Err(ArrayError::NotAllocated)
    );
    assert_eq!(dest.interpolate_time(&source, &source, 0, 0.5), Err(ArrayError::NotAllocated));

    let err = dest
        .set_normals(TypedDataArray::<f32>::with_components("n", 4).unwrap().into())
        .unwrap_err();
    assert!(matches!(err, ArrayError::AttributeComponentLimit { found: 4, .. }));
    let err = dest.set_tensors(StringArray::new("s").into()).unwrap_err();
    assert!(matches!(err, ArrayError::AttributeNotNumeric { .. }));
    assert_eq!(dest.number_of_arrays(), 0);
}
