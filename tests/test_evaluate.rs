// Accuracy by argmax agreement.

use mlp_sgd::{DataSet, Evaluation, Matrix, MlpError, Network};

/// Output unit j follows input j, so the predicted class is the argmax of the input.
fn identity_classifier() -> Network {
    Network::from_parameters(
        vec![Matrix::from_data(vec![vec![10.0, 0.0], vec![0.0, 10.0]])],
        vec![Matrix::column(vec![0.0, 0.0])],
    )
    .unwrap()
}

fn set(pairs: &[([f64; 2], [f64; 2])]) -> DataSet {
    DataSet::new(
        pairs.iter().map(|(x, _)| Matrix::column(x.to_vec())).collect(),
        pairs.iter().map(|(_, y)| Matrix::column(y.to_vec())).collect(),
    )
    .unwrap()
}

#[test]
fn all_matching_gives_exactly_one() {
    let data = set(&[
        ([1.0, 0.0], [1.0, 0.0]),
        ([0.2, 0.9], [0.0, 1.0]),
        ([0.7, 0.1], [1.0, 0.0]),
    ]);
    assert_eq!(identity_classifier().evaluate(&data).unwrap(), 1.0);
}

#[test]
fn none_matching_gives_exactly_zero() {
    let data = set(&[([1.0, 0.0], [0.0, 1.0]), ([0.0, 1.0], [1.0, 0.0])]);
    assert_eq!(identity_classifier().evaluate(&data).unwrap(), 0.0);
}

#[test]
fn counts_partial_matches() {
    let data = set(&[
        ([1.0, 0.0], [1.0, 0.0]),
        ([0.0, 1.0], [1.0, 0.0]),
        ([0.0, 1.0], [0.0, 1.0]),
        ([1.0, 0.0], [0.0, 1.0]),
    ]);
    let result = identity_classifier().evaluate_counts(&data).unwrap();
    assert_eq!((result.correct, result.total), (2, 4));
    assert_eq!(result.accuracy(), 0.5);
}

#[test]
fn empty_set_is_an_error() {
    let err = identity_classifier().evaluate(&DataSet::default()).unwrap_err();
    assert!(matches!(err, MlpError::EmptyDataSet("evaluate")));
}

#[test]
fn mismatched_target_width_is_an_error() {
    let data = DataSet::new(
        vec![Matrix::column(vec![1.0, 0.0])],
        vec![Matrix::column(vec![1.0, 0.0, 0.0])],
    )
    .unwrap();
    assert!(matches!(
        identity_classifier().evaluate(&data),
        Err(MlpError::ShapeMismatch { context: "target vector", .. })
    ));
}

#[test]
fn nan_output_and_nan_target_do_not_match() {
    let broken = Network::from_parameters(
        vec![Matrix::from_data(vec![vec![f64::NAN, f64::NAN], vec![f64::NAN, f64::NAN]])],
        vec![Matrix::column(vec![f64::NAN, f64::NAN])],
    )
    .unwrap();
    let data = set(&[([1.0, 0.0], [f64::NAN, f64::NAN]), ([0.0, 1.0], [0.0, 1.0])]);

    let result = broken.evaluate_counts(&data).unwrap();
    assert_eq!((result.correct, result.total), (0, 2));
}

#[test]
fn empty_count_has_zero_accuracy() {
    let result = Evaluation { correct: 0, total: 0 };
    assert_eq!(result.accuracy(), 0.0);
}
