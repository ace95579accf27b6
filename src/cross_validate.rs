//! Convenience wrapper around `GridSearchCv`.
//!
//! `CrossValidate` keeps track of whether the search has run and guards the
//! result accessors: `best_params` warns and returns an empty map before
//! training, `best_model` returns `None`, and `best_score` returns a
//! `NotTrained` error.

use ndarray::{ArrayView1, ArrayView2};

use crate::config::CrossValConfig;
use crate::error::{CrossValError, Result};
use crate::metrics::Metric;
use crate::model_selection::{cross_val_score, CandidateResult, GridSearchCv, StratifiedKFold};
use crate::models::ClassifierModel;
use crate::params::{ParamGrid, ParamSet};

/// Metric used when none is given.
pub const DEFAULT_METRIC: &str = "accuracy";

/// Number of folds used by `cv_score` by default.
pub const DEFAULT_CV_SPLITS: usize = 5;

/// Seed for the shuffled stratified folds of `cv_score`.
pub const CV_RANDOM_STATE: u64 = 42;

/// Whether the hyperparameter search has completed successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Untrained,
    Trained,
}

/// Grid search with k-fold cross-validation over a fixed configuration.
pub struct CrossValidate<M> {
    params: ParamGrid,
    metric: String,
    k_fold: usize,
    grid_search: GridSearchCv<M>,
    state: SearchState,
}

impl<M> CrossValidate<M>
where
    M: ClassifierModel + Send + Sync,
{
    /// Create a new CrossValidate
    ///
    /// # Arguments
    ///
    /// * `params` - The hyperparameter grid to search
    /// * `model` - The model to tune
    /// * `k_fold` - The number of folds to use for cross-validation
    /// * `metric` - The metric to optimise, "accuracy" when `None`
    ///
    /// # Returns
    ///
    /// An untrained CrossValidate. The grid, fold count and metric are only
    /// checked when `train` is called.
    pub fn new(params: ParamGrid, model: M, k_fold: usize, metric: Option<&str>) -> Self {
        let metric = metric.unwrap_or(DEFAULT_METRIC).to_string();
        let grid_search = GridSearchCv::new(model, params.clone(), k_fold, &metric);

        CrossValidate {
            params,
            metric,
            k_fold,
            grid_search,
            state: SearchState::Untrained,
        }
    }

    /// Build from a loaded `CrossValConfig`.
    pub fn from_config(config: &CrossValConfig, model: M) -> Self {
        Self::new(
            config.param_grid.clone(),
            model,
            config.k_fold,
            Some(config.metric.as_str()),
        )
    }

    /// Run the hyperparameter search on the training data.
    ///
    /// On failure the error is logged and returned unchanged; the state is
    /// not modified.
    pub fn train(&mut self, x_train: ArrayView2<f64>, y_train: ArrayView1<usize>) -> Result<()> {
        match self.grid_search.fit(x_train, y_train) {
            Ok(()) => {
                self.state = SearchState::Trained;
                Ok(())
            }
            Err(e) => {
                log::error!("An error occurred during training: {}", e);
                Err(e)
            }
        }
    }

    /// Alias for `train`.
    pub fn search_best_params(
        &mut self,
        x_train: ArrayView2<f64>,
        y_train: ArrayView1<usize>,
    ) -> Result<()> {
        self.train(x_train, y_train)
    }

    pub fn is_trained(&self) -> bool {
        self.state == SearchState::Trained
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Best hyperparameters found, or an empty map (with a warning) if the
    /// search has not run yet.
    pub fn best_params(&self) -> ParamSet {
        match (self.state, self.grid_search.best_params()) {
            (SearchState::Trained, Some(params)) => params.clone(),
            _ => {
                log::warn!("The hyperparameter search has not been performed yet.");
                ParamSet::new()
            }
        }
    }

    /// Best model, refitted on the full training data.
    pub fn best_model(&self) -> Option<&M> {
        match self.state {
            SearchState::Trained => self.grid_search.best_estimator(),
            SearchState::Untrained => None,
        }
    }

    /// Mean cross-validated score of the best candidate.
    pub fn best_score(&self) -> Result<f64> {
        self.grid_search.best_score().ok_or(CrossValError::NotTrained)
    }

    /// Per-candidate results of the last successful search.
    pub fn cv_results(&self) -> Option<&[CandidateResult]> {
        self.grid_search.cv_results()
    }

    pub fn params(&self) -> &ParamGrid {
        &self.params
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn k_fold(&self) -> usize {
        self.k_fold
    }

    /// Evaluate `model` with shuffled stratified k-fold cross-validation.
    ///
    /// The folds are shuffled with a fixed seed, so repeated calls on the
    /// same data give the same fold assignment and the same scores. `model`
    /// is cloned for each fold and not modified.
    ///
    /// # Arguments
    ///
    /// * `model` - The model to evaluate
    /// * `x_train` - Feature matrix, shape (n_samples, n_features)
    /// * `y_train` - Class labels, shape (n_samples,)
    /// * `n_splits` - Number of folds (`DEFAULT_CV_SPLITS` is the usual choice)
    /// * `scoring` - Metric name (`DEFAULT_METRIC` is the usual choice)
    ///
    /// # Returns
    ///
    /// One score per fold, in fold order, NaN for a fold that failed to fit.
    pub fn cv_score(
        model: &M,
        x_train: ArrayView2<f64>,
        y_train: ArrayView1<usize>,
        n_splits: usize,
        scoring: &str,
    ) -> Result<Vec<f64>> {
        let metric: Metric = scoring.parse()?;
        let skf = StratifiedKFold::new(n_splits)
            .with_shuffle(true)
            .with_random_state(CV_RANDOM_STATE);
        cross_val_score(model, x_train, y_train, &skf, metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KNeighborsClassifier;

    #[test]
    fn test_new_is_untrained() {
        let grid = ParamGrid::new().add("k", [1i64, 3]);
        let cv = CrossValidate::new(grid, KNeighborsClassifier::default(), 3, None);
        assert_eq!(cv.state(), SearchState::Untrained);
        assert_eq!(cv.metric(), DEFAULT_METRIC);
        assert_eq!(cv.k_fold(), 3);
        assert_eq!(cv.params().len(), 2);
        assert!(cv.cv_results().is_none());
    }

    #[test]
    fn test_construction_does_not_validate() {
        // unknown metric and fold count are accepted until training
        let cv = CrossValidate::new(ParamGrid::new(), KNeighborsClassifier::default(), 0, Some("nope"));
        assert!(!cv.is_trained());
        assert_eq!(cv.metric(), "nope");
    }
}
