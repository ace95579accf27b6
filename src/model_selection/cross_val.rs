use ndarray::{ArrayView1, ArrayView2, Axis};

use crate::error::{CrossValError, Result};
use crate::metrics::Metric;
use crate::model_selection::stratified::{FoldIndices, StratifiedKFold};
use crate::models::ClassifierModel;

/// Summary statistics over per-fold scores.
pub trait CvScores {
    fn mean(&self) -> f64;
    fn std(&self) -> f64;
}

impl CvScores for [f64] {
    fn mean(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.iter().sum::<f64>() / self.len() as f64
    }

    /// Population standard deviation.
    fn std(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let mean = CvScores::mean(self);
        let variance = self
            .iter()
            .map(|&score| (score - mean).powi(2))
            .sum::<f64>()
            / self.len() as f64;
        variance.sqrt()
    }
}

pub(crate) fn check_lengths(x: &ArrayView2<f64>, y: &ArrayView1<usize>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(CrossValError::ShapeMismatch {
            samples: x.nrows(),
            labels: y.len(),
        });
    }
    Ok(())
}

/// Fit a fresh clone of `model` on one training fold and score it on the
/// matching test fold.
pub(crate) fn score_fold<M: ClassifierModel>(
    model: &M,
    x: ArrayView2<f64>,
    y: ArrayView1<usize>,
    (train_idx, test_idx): &FoldIndices,
    metric: Metric,
) -> Result<f64> {
    let x_train = x.select(Axis(0), train_idx);
    let y_train = y.select(Axis(0), train_idx);
    let x_test = x.select(Axis(0), test_idx);
    let y_test = y.select(Axis(0), test_idx);

    let mut fold_model = model.clone();
    fold_model.fit(x_train.view(), y_train.view())?;
    let predictions = fold_model.predict(x_test.view())?;
    metric.score(y_test.view(), predictions.view())
}

/// Per-fold scores, NaN where the fold failed.
#[derive(Debug, Clone)]
pub(crate) struct FoldScores {
    pub scores: Vec<f64>,
    pub first_error: Option<String>,
}

impl FoldScores {
    pub fn all_failed(&self) -> bool {
        self.scores.iter().all(|s| s.is_nan())
    }
}

/// Score every fold. A fold whose fit, predict or scoring fails is logged
/// and scored NaN; `label` names the candidate in that warning.
pub(crate) fn score_folds<M: ClassifierModel>(
    model: &M,
    x: ArrayView2<f64>,
    y: ArrayView1<usize>,
    folds: &[FoldIndices],
    metric: Metric,
    label: &str,
) -> FoldScores {
    let mut scores = Vec::with_capacity(folds.len());
    let mut first_error = None;

    for (fold, indices) in folds.iter().enumerate() {
        match score_fold(model, x, y, indices, metric) {
            Ok(score) => {
                log::trace!("Fold {}: {} = {:.4}", fold, metric, score);
                scores.push(score);
            }
            Err(e) => {
                log::warn!("{}: fold {} failed, scoring it as NaN: {}", label, fold, e);
                if first_error.is_none() {
                    first_error = Some(e.to_string());
                }
                scores.push(f64::NAN);
            }
        }
    }

    FoldScores { scores, first_error }
}

/// Evaluate `model` by cross-validation and return the score of each fold.
///
/// # Arguments
///
/// * `model` - The model to cross-validate. It is cloned for every fold and left untouched.
/// * `x` - Feature matrix, shape (n_samples, n_features)
/// * `y` - Class labels, shape (n_samples,)
/// * `cv` - The fold splitter
/// * `metric` - The metric to score each held-out fold with
///
/// # Returns
///
/// One score per fold, in fold order. A fold that failed to fit or predict
/// scores NaN; if every fold fails the first error is returned.
pub fn cross_val_score<M: ClassifierModel>(
    model: &M,
    x: ArrayView2<f64>,
    y: ArrayView1<usize>,
    cv: &StratifiedKFold,
    metric: Metric,
) -> Result<Vec<f64>> {
    check_lengths(&x, &y)?;
    let folds = cv.split(y)?;
    let fold_scores = score_folds(model, x, y, &folds, metric, model.name());
    if fold_scores.all_failed() {
        return Err(CrossValError::AllFitsFailed {
            n_fits: folds.len(),
            first_error: fold_scores.first_error.unwrap_or_default(),
        });
    }
    Ok(fold_scores.scores)
}
