use emri_core::EmriError;
use emri_stats::{
    argmax_counts, column_mean, column_std, normalized_abs, normalized_total_bias,
    relative_errors, row_argmax, row_max, BiasArray,
};

fn sample() -> BiasArray {
    BiasArray::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap()
}

#[test]
fn mean_bias_normalises_by_std() {
    let biases = sample();
    let mean = column_mean(&biases).unwrap();
    assert_eq!(mean, vec![2.0, 3.0]);
    assert_eq!(normalized_abs(&mean, &[1.0, 2.0]).unwrap(), vec![2.0, 1.5]);
    assert_eq!(
        normalized_total_bias(&biases, &[1.0, 2.0]).unwrap(),
        vec![2.0, 1.5]
    );
}

#[test]
fn population_std_per_column() {
    assert_eq!(column_std(sample().values()).unwrap(), vec![1.0, 1.0]);
}

#[test]
fn ratios_rank_parameters_per_background() {
    let biases = BiasArray::from_rows(&[vec![1.0, -4.0], vec![3.0, 1.0]]).unwrap();
    let ratios = relative_errors(&biases, &[1.0, 2.0]).unwrap();
    assert_eq!(ratios.values().row(0).to_vec(), vec![1.0, 2.0]);
    assert_eq!(ratios.values().row(1).to_vec(), vec![3.0, 0.5]);
    assert_eq!(row_max(&ratios), vec![2.0, 3.0]);
    assert_eq!(row_argmax(&ratios), vec![1, 0]);
    assert_eq!(argmax_counts(&ratios), vec![1, 1]);
}

#[test]
fn argmax_prefers_first_tie_and_flags_nan() {
    let ratios = BiasArray::from_rows(&[vec![2.0, 2.0, 1.0], vec![0.5, f64::NAN, 9.0]]).unwrap();
    assert_eq!(row_argmax(&ratios), vec![0, 1]);
    assert!(row_max(&ratios)[1].is_nan());
    assert_eq!(argmax_counts(&ratios), vec![1, 1, 0]);
}

#[test]
fn empty_and_mismatched_arrays_are_shape_errors() {
    let empty = BiasArray::from_rows(&[]).unwrap();
    assert!(matches!(column_mean(&empty), Err(EmriError::Shape(_))));
    let err = normalized_total_bias(&sample(), &[1.0, 2.0, 3.0]).unwrap_err();
    assert_eq!(err.info().code, "bias-columns");
    assert!(normalized_abs(&[1.0], &[1.0, 2.0]).is_err());
}
