//! Scoring metrics for classifier predictions.
//!
//! Accuracy and MCC come from linfa's confusion matrix. Precision, recall
//! and F1 are counted one class against the rest: with labels in {0, 1}
//! they are reported for the positive label 1, otherwise they are the
//! unweighted mean over every label seen in either array (macro average).
//! A zero denominator scores 0.

use std::fmt;
use std::str::FromStr;

use linfa::metrics::ToConfusionMatrix;
use linfa::DatasetBase;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{CrossValError, Result};

/// Supported scoring metrics. Higher is better for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Accuracy,
    Precision,
    Recall,
    F1,
    Mcc,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Accuracy => "accuracy",
            Metric::Precision => "precision",
            Metric::Recall => "recall",
            Metric::F1 => "f1",
            Metric::Mcc => "mcc",
        }
    }

    /// Score predictions against ground truth.
    pub fn score(&self, y_true: ArrayView1<usize>, y_pred: ArrayView1<usize>) -> Result<f64> {
        if y_true.len() != y_pred.len() {
            return Err(CrossValError::ShapeMismatch {
                samples: y_pred.len(),
                labels: y_true.len(),
            });
        }

        match self {
            Metric::Accuracy | Metric::Mcc => {
                let ground_truth =
                    DatasetBase::new(Array2::<f64>::zeros((y_true.len(), 0)), y_true.to_owned());
                let predictions: Array1<usize> = y_pred.to_owned();
                let cm = predictions.confusion_matrix(&ground_truth)?;
                let value = if *self == Metric::Accuracy {
                    cm.accuracy()
                } else {
                    cm.mcc()
                };
                Ok(value as f64)
            }
            Metric::Precision | Metric::Recall | Metric::F1 => {
                Ok(self.one_vs_rest_average(y_true, y_pred))
            }
        }
    }

    fn one_vs_rest_average(&self, y_true: ArrayView1<usize>, y_pred: ArrayView1<usize>) -> f64 {
        let mut labels: Vec<usize> = y_true.iter().chain(y_pred.iter()).copied().collect();
        labels.sort_unstable();
        labels.dedup();
        if labels.iter().all(|&label| label <= 1) {
            labels = vec![1];
        }

        let total: f64 = labels
            .iter()
            .map(|&label| {
                let (tp, fp, fn_) = class_counts(y_true, y_pred, label);
                match self {
                    Metric::Precision => ratio(tp, tp + fp),
                    Metric::Recall => ratio(tp, tp + fn_),
                    _ => ratio(2.0 * tp, 2.0 * tp + fp + fn_),
                }
            })
            .sum();
        total / labels.len() as f64
    }
}

/// True positives, false positives and false negatives for `label`.
fn class_counts(y_true: ArrayView1<usize>, y_pred: ArrayView1<usize>, label: usize) -> (f64, f64, f64) {
    let (mut tp, mut fp, mut fn_) = (0.0, 0.0, 0.0);
    for (&truth, &pred) in y_true.iter().zip(y_pred.iter()) {
        match (truth == label, pred == label) {
            (true, true) => tp += 1.0,
            (false, true) => fp += 1.0,
            (true, false) => fn_ += 1.0,
            (false, false) => {}
        }
    }
    (tp, fp, fn_)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Metric {
    type Err = CrossValError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "accuracy" => Ok(Metric::Accuracy),
            "precision" => Ok(Metric::Precision),
            "recall" => Ok(Metric::Recall),
            "f1" | "f1_score" => Ok(Metric::F1),
            "mcc" | "matthews_corrcoef" => Ok(Metric::Mcc),
            _ => Err(CrossValError::UnknownMetric(s.to_string())),
        }
    }
}
