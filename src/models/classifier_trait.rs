use ndarray::{Array1, ArrayView2, ArrayView1};

use crate::error::Result;
use crate::params::ParamSet;

/// A small trait abstraction for the classifier models a grid search can
/// tune. The search clones the configured model once per candidate and per
/// fold, so implementations must be cheap to clone before `fit`.
pub trait ClassifierModel: Clone {
    /// Apply a hyperparameter combination. Unknown names or wrongly typed
    /// values are an `InvalidParameter` error.
    fn set_params(&mut self, params: &ParamSet) -> Result<()>;

    /// Fit the model. `y` holds class labels as `usize`.
    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<usize>) -> Result<()>;

    /// Predict a class label for every row of `x`.
    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<usize>>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
