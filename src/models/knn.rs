use std::collections::BTreeMap;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{CrossValError, Result};
use crate::models::classifier_trait::ClassifierModel;
use crate::params::ParamSet;

/// Brute-force k-nearest-neighbours classifier (Euclidean distance,
/// majority vote).
#[derive(Debug, Clone)]
pub struct KNeighborsClassifier {
    k: usize,
    train_x: Option<Array2<f64>>,
    train_y: Option<Array1<usize>>,
}

impl KNeighborsClassifier {
    pub fn new(k: usize) -> Self {
        KNeighborsClassifier {
            k,
            train_x: None,
            train_y: None,
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    fn vote(&self, point: ArrayView1<f64>, train_x: &Array2<f64>, train_y: &Array1<usize>) -> usize {
        let mut distances: Vec<(f64, usize)> = train_x
            .axis_iter(Axis(0))
            .zip(train_y.iter())
            .map(|(row, &label)| {
                let d = row
                    .iter()
                    .zip(point.iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>();
                (d, label)
            })
            .collect();
        // stable sort keeps training order among equal distances
        distances.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for &(_, label) in distances.iter().take(self.k) {
            *counts.entry(label).or_insert(0) += 1;
        }

        // ties go to the smallest label
        let mut best = (0usize, 0usize);
        for (&label, &count) in counts.iter() {
            if count > best.1 {
                best = (label, count);
            }
        }
        best.0
    }
}

impl Default for KNeighborsClassifier {
    fn default() -> Self {
        KNeighborsClassifier::new(5)
    }
}

impl ClassifierModel for KNeighborsClassifier {
    fn set_params(&mut self, params: &ParamSet) -> Result<()> {
        for (name, value) in params {
            match name.as_str() {
                "k" | "n_neighbors" => {
                    let k = value
                        .as_i64()
                        .filter(|&k| k >= 1)
                        .ok_or_else(|| CrossValError::InvalidParameter {
                            name: name.clone(),
                            reason: format!("expected a positive integer, got {}", value),
                        })?;
                    self.k = k as usize;
                }
                _ => {
                    return Err(CrossValError::InvalidParameter {
                        name: name.clone(),
                        reason: "unknown parameter for KNeighborsClassifier".to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<usize>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(CrossValError::ShapeMismatch {
                samples: x.nrows(),
                labels: y.len(),
            });
        }
        if self.k > x.nrows() {
            return Err(CrossValError::InvalidParameter {
                name: "k".to_string(),
                reason: format!(
                    "expected k <= n_samples_fit, but k = {}, n_samples_fit = {}",
                    self.k,
                    x.nrows()
                ),
            });
        }
        self.train_x = Some(x.to_owned());
        self.train_y = Some(y.to_owned());
        Ok(())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<usize>> {
        let (train_x, train_y) = match (&self.train_x, &self.train_y) {
            (Some(tx), Some(ty)) => (tx, ty),
            _ => return Err(CrossValError::ModelNotFitted),
        };
        if x.ncols() != train_x.ncols() {
            return Err(CrossValError::InvalidParameter {
                name: "x".to_string(),
                reason: format!(
                    "expected {} features, got {}",
                    train_x.ncols(),
                    x.ncols()
                ),
            });
        }

        Ok(x
            .axis_iter(Axis(0))
            .map(|row| self.vote(row, train_x, train_y))
            .collect())
    }

    fn name(&self) -> &str {
        "knn"
    }
}
