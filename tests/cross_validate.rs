//! Integration tests for the CrossValidate wrapper and the cv_score helper.

use ndarray::{Array1, Array2};

use redeem_crossval::models::{ClassifierModel, KNeighborsClassifier};
use redeem_crossval::{
    CrossValError, CrossValidate, ParamGrid, ParamValue, SearchState, DEFAULT_CV_SPLITS,
    DEFAULT_METRIC,
};

/// Two well separated clusters of 6 samples each.
fn separable() -> (Array2<f64>, Array1<usize>) {
    let x = Array2::from_shape_vec(
        (12, 2),
        vec![
            1.0, 1.1, 1.2, 0.9, 0.8, 1.0, 1.1, 1.3, 0.9, 0.8, 1.3, 1.2, // class 0
            8.0, 8.2, 8.1, 7.9, 7.8, 8.3, 8.2, 8.0, 7.9, 8.1, 8.3, 7.8, // class 1
        ],
    )
    .expect("failed to create feature matrix");
    let y = Array1::from_vec(vec![0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1]);
    (x, y)
}

/// Points on a line with alternating labels: the closest neighbours always
/// carry the other label.
fn alternating() -> (Array2<f64>, Array1<usize>) {
    let x = Array2::from_shape_vec((12, 1), (0..12).map(|i| i as f64).collect())
        .expect("failed to create feature matrix");
    let y = Array1::from_vec((0..12).map(|i| i % 2).collect());
    (x, y)
}

fn knn_grid() -> ParamGrid {
    ParamGrid::new().add("k", [1i64, 3, 5])
}

// ---------------------------------------------------------------------------
// Untrained accessors
// ---------------------------------------------------------------------------

#[test]
fn untrained_accessors() {
    let cv = CrossValidate::new(knn_grid(), KNeighborsClassifier::default(), 3, None);
    assert_eq!(cv.state(), SearchState::Untrained);
    assert!(!cv.is_trained());

    assert!(cv.best_params().is_empty());
    assert!(cv.best_model().is_none());
    assert!(matches!(cv.best_score(), Err(CrossValError::NotTrained)));
}

// ---------------------------------------------------------------------------
// End-to-end search
// ---------------------------------------------------------------------------

#[test]
fn train_finds_grid_combination() {
    let (x, y) = separable();
    let grid = knn_grid();
    let mut cv = CrossValidate::new(grid.clone(), KNeighborsClassifier::default(), 3, Some("accuracy"));

    cv.train(x.view(), y.view()).expect("training should succeed");
    assert!(cv.is_trained());

    let best = cv.best_params();
    assert!(grid.contains(&best), "best params {:?} not in grid", best);
    let k = best["k"].as_i64().unwrap();
    assert!([1, 3, 5].contains(&k));

    let score = cv.best_score().unwrap();
    assert!(score.is_finite());
    assert!((0.0..=1.0).contains(&score));
    // every k separates the clusters, ties resolve to the first candidate
    assert_eq!(best["k"], ParamValue::Int(1));
    assert!((score - 1.0).abs() < 1e-6);
}

#[test]
fn train_on_six_samples_skips_oversized_k() {
    // 3 folds leave 4 training samples, so k = 5 cannot be fitted
    let x = Array2::from_shape_vec((6, 2), vec![0.0, 0.1, 0.2, 0.0, 0.1, 0.3, 6.0, 6.1, 6.2, 5.9, 5.8, 6.0])
        .expect("failed to create feature matrix");
    let y = Array1::from_vec(vec![0usize, 0, 0, 1, 1, 1]);
    let mut cv = CrossValidate::new(knn_grid(), KNeighborsClassifier::default(), 3, Some("accuracy"));

    cv.train(x.view(), y.view()).expect("training should succeed");
    assert!(cv.is_trained());

    let best = cv.best_params();
    assert!(knn_grid().contains(&best));
    assert_eq!(best["k"], ParamValue::Int(1));
    let score = cv.best_score().unwrap();
    assert!((0.0..=1.0).contains(&score));

    let results = cv.cv_results().unwrap();
    assert!(results[2].mean_score.is_nan());
    assert_eq!(results[2].rank, 3);
}

#[test]
fn train_fails_when_every_candidate_fails() {
    let x = Array2::from_shape_vec((6, 1), vec![0.0, 0.1, 0.2, 6.0, 6.1, 6.2])
        .expect("failed to create feature matrix");
    let y = Array1::from_vec(vec![0usize, 0, 0, 1, 1, 1]);
    let grid = ParamGrid::new().add("k", [5i64]);
    let mut cv = CrossValidate::new(grid, KNeighborsClassifier::default(), 3, None);

    let err = cv.train(x.view(), y.view()).unwrap_err();
    assert!(matches!(err, CrossValError::AllFitsFailed { n_fits: 3, .. }));
    assert!(!cv.is_trained());
}

#[test]
fn best_model_predicts() {
    let (x, y) = separable();
    let mut cv = CrossValidate::new(knn_grid(), KNeighborsClassifier::default(), 3, None);
    cv.search_best_params(x.view(), y.view()).unwrap();

    let model = cv.best_model().expect("model should be available after training");
    let predictions = model.predict(x.view()).unwrap();
    assert_eq!(predictions.len(), x.nrows());
    assert_eq!(predictions, y);
}

#[test]
fn cv_results_cover_grid() {
    let (x, y) = separable();
    let mut cv = CrossValidate::new(knn_grid(), KNeighborsClassifier::default(), 3, None);
    cv.train(x.view(), y.view()).unwrap();

    let results = cv.cv_results().unwrap();
    assert_eq!(results.len(), 3);
    for r in results {
        assert_eq!(r.fold_scores.len(), 3);
        assert!(r.rank >= 1);
    }
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn train_with_mismatched_lengths_fails() {
    let (x, _) = separable();
    let y = Array1::from_vec(vec![0usize, 1, 0, 1]);
    let mut cv = CrossValidate::new(knn_grid(), KNeighborsClassifier::default(), 3, None);

    let err = cv.train(x.view(), y.view()).unwrap_err();
    assert!(matches!(err, CrossValError::ShapeMismatch { samples: 12, labels: 4 }));
    assert!(err.to_string().contains("inconsistent numbers of samples"));
    assert_eq!(cv.state(), SearchState::Untrained);
    assert!(cv.best_params().is_empty());
}

#[test]
fn train_with_unknown_metric_fails() {
    let (x, y) = separable();
    let mut cv = CrossValidate::new(knn_grid(), KNeighborsClassifier::default(), 3, Some("roc_auc"));
    let err = cv.train(x.view(), y.view()).unwrap_err();
    assert!(matches!(err, CrossValError::UnknownMetric(ref m) if m == "roc_auc"));
    assert!(!cv.is_trained());
}

#[test]
fn failed_retrain_keeps_trained_state() {
    let (x, y) = separable();
    let mut cv = CrossValidate::new(knn_grid(), KNeighborsClassifier::default(), 3, None);
    cv.train(x.view(), y.view()).unwrap();

    let short = Array1::from_vec(vec![0usize, 1]);
    assert!(cv.train(x.view(), short.view()).is_err());
    assert!(cv.is_trained());
    assert!((cv.best_score().unwrap() - 1.0).abs() < 1e-6);
}

// ---------------------------------------------------------------------------
// Retraining
// ---------------------------------------------------------------------------

#[test]
fn second_train_overwrites_result() {
    let mut cv = CrossValidate::new(knn_grid(), KNeighborsClassifier::default(), 3, None);

    let (x1, y1) = separable();
    cv.train(x1.view(), y1.view()).unwrap();
    let first_score = cv.best_score().unwrap();
    assert!((first_score - 1.0).abs() < 1e-6);

    let (x2, y2) = alternating();
    cv.train(x2.view(), y2.view()).unwrap();
    let second_score = cv.best_score().unwrap();
    assert!(second_score < first_score);
    assert!(knn_grid().contains(&cv.best_params()));
    assert_eq!(cv.state(), SearchState::Trained);
}

// ---------------------------------------------------------------------------
// cv_score
// ---------------------------------------------------------------------------

#[test]
fn cv_score_is_deterministic() {
    let (x, y) = alternating();
    let model = KNeighborsClassifier::new(3);

    let first = CrossValidate::cv_score(&model, x.view(), y.view(), 3, DEFAULT_METRIC).unwrap();
    let second = CrossValidate::cv_score(&model, x.view(), y.view(), 3, DEFAULT_METRIC).unwrap();
    assert_eq!(first, second);
}

#[test]
fn cv_score_length_matches_folds() {
    let (x, y) = separable();
    let model = KNeighborsClassifier::new(1);

    let scores =
        CrossValidate::cv_score(&model, x.view(), y.view(), DEFAULT_CV_SPLITS, DEFAULT_METRIC)
            .unwrap();
    assert_eq!(scores.len(), DEFAULT_CV_SPLITS);
    assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));

    let scores = CrossValidate::cv_score(&model, x.view(), y.view(), 3, "f1").unwrap();
    assert_eq!(scores.len(), 3);
    assert!(scores.iter().all(|s| (s - 1.0).abs() < 1e-6));
}

#[test]
fn cv_score_rejects_too_many_folds() {
    let (x, y) = separable();
    let model = KNeighborsClassifier::new(1);
    let result = CrossValidate::cv_score(&model, x.view(), y.view(), 20, DEFAULT_METRIC);
    assert!(matches!(result, Err(CrossValError::InvalidFolds { n_splits: 20, n_samples: 12 })));
}
