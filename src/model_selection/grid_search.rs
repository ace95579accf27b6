use ndarray::{ArrayView1, ArrayView2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{CrossValError, Result};
use crate::metrics::Metric;
use crate::model_selection::cross_val::{check_lengths, score_folds, CvScores, FoldScores};
use crate::model_selection::stratified::{FoldIndices, StratifiedKFold};
use crate::models::ClassifierModel;
use crate::params::{format_params, ParamGrid, ParamSet};

/// Cross-validation outcome of one grid candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub params: ParamSet,
    pub fold_scores: Vec<f64>,
    pub mean_score: f64,
    pub std_score: f64,
    /// 1 for the best mean score; equal means share the lower rank and
    /// candidates with a NaN mean rank last.
    pub rank: usize,
}

/// Everything a finished search produced.
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    pub best_params: ParamSet,
    pub best_estimator: M,
    pub best_score: f64,
    pub best_index: usize,
    pub cv_results: Vec<CandidateResult>,
}

/// Exhaustive search over a parameter grid, each candidate scored by
/// stratified k-fold cross-validation.
#[derive(Debug, Clone)]
pub struct GridSearchCv<M> {
    estimator: M,
    param_grid: ParamGrid,
    cv: usize,
    scoring: String,
    parallel: bool,
    refit: bool,
    result: Option<SearchResult<M>>,
}

impl<M> GridSearchCv<M>
where
    M: ClassifierModel + Send + Sync,
{
    /// Configure a search. Nothing is validated until `fit`.
    ///
    /// # Arguments
    ///
    /// * `estimator` - Base model, cloned for every candidate and fold
    /// * `param_grid` - Candidate values per hyperparameter
    /// * `cv` - Number of stratified folds
    /// * `scoring` - Metric name, e.g. "accuracy"
    pub fn new(estimator: M, param_grid: ParamGrid, cv: usize, scoring: &str) -> Self {
        GridSearchCv {
            estimator,
            param_grid,
            cv,
            scoring: scoring.to_string(),
            parallel: true,
            refit: true,
            result: None,
        }
    }

    /// Evaluate candidates on the rayon thread pool. Results are identical
    /// either way.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Refit the best candidate on the full data after the search.
    pub fn with_refit(mut self, refit: bool) -> Self {
        self.refit = refit;
        self
    }

    pub fn estimator(&self) -> &M {
        &self.estimator
    }

    pub fn param_grid(&self) -> &ParamGrid {
        &self.param_grid
    }

    pub fn cv(&self) -> usize {
        self.cv
    }

    pub fn scoring(&self) -> &str {
        &self.scoring
    }

    /// Run the search. On error any previous result is kept.
    ///
    /// A fold whose fit, predict or scoring fails is scored NaN and the
    /// search carries on. Candidates with a NaN fold have a NaN mean, rank
    /// last and are never picked as best. The search fails only when every
    /// candidate has a NaN mean.
    pub fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<usize>) -> Result<()> {
        check_lengths(&x, &y)?;
        self.param_grid.validate()?;
        let metric: Metric = self.scoring.parse()?;
        let folds = StratifiedKFold::new(self.cv).split(y)?;

        let candidates = self.param_grid.combinations();
        let n_fits = folds.len() * candidates.len();
        log::info!(
            "Fitting {} folds for each of {} candidates, totalling {} fits",
            folds.len(),
            candidates.len(),
            n_fits
        );

        let evaluations: Vec<FoldScores> = if self.parallel {
            candidates
                .par_iter()
                .map(|params| self.evaluate(params, x, y, &folds, metric))
                .collect::<Result<Vec<_>>>()?
        } else {
            candidates
                .iter()
                .map(|params| self.evaluate(params, x, y, &folds, metric))
                .collect::<Result<Vec<_>>>()?
        };

        let n_failed = evaluations
            .iter()
            .flat_map(|e| &e.scores)
            .filter(|s| s.is_nan())
            .count();
        if n_failed > 0 {
            log::warn!("{} fits failed out of a total of {}", n_failed, n_fits);
        }

        let means: Vec<f64> = evaluations.iter().map(|e| e.scores.as_slice().mean()).collect();

        // first candidate wins ties
        let mut best_index: Option<usize> = None;
        for (i, &m) in means.iter().enumerate() {
            if m.is_nan() {
                continue;
            }
            match best_index {
                Some(b) if means[b] >= m => {}
                _ => best_index = Some(i),
            }
        }
        let best_index = match best_index {
            Some(i) => i,
            None => {
                let first_error = evaluations
                    .into_iter()
                    .find_map(|e| e.first_error)
                    .unwrap_or_default();
                return Err(CrossValError::AllFitsFailed { n_fits, first_error });
            }
        };

        let n_scored = means.iter().filter(|m| !m.is_nan()).count();
        let cv_results: Vec<CandidateResult> = candidates
            .into_iter()
            .zip(evaluations)
            .zip(means.iter())
            .map(|((params, evaluation), &mean_score)| CandidateResult {
                std_score: evaluation.scores.as_slice().std(),
                rank: if mean_score.is_nan() {
                    n_scored + 1
                } else {
                    1 + means.iter().filter(|&&m| m > mean_score).count()
                },
                params,
                fold_scores: evaluation.scores,
                mean_score,
            })
            .collect();

        let best_params = cv_results[best_index].params.clone();
        let best_score = cv_results[best_index].mean_score;

        let mut best_estimator = self.estimator.clone();
        best_estimator.set_params(&best_params)?;
        if self.refit {
            best_estimator.fit(x, y)?;
        }

        log::info!(
            "Best {} = {:.4} with params {}",
            metric,
            best_score,
            format_params(&best_params)
        );

        self.result = Some(SearchResult {
            best_params,
            best_estimator,
            best_score,
            best_index,
            cv_results,
        });
        Ok(())
    }

    /// Cross-validate one candidate. Only an invalid parameter is an error;
    /// fold failures become NaN scores.
    fn evaluate(
        &self,
        params: &ParamSet,
        x: ArrayView2<f64>,
        y: ArrayView1<usize>,
        folds: &[FoldIndices],
        metric: Metric,
    ) -> Result<FoldScores> {
        let mut model = self.estimator.clone();
        model.set_params(params)?;

        let label = format!("{} {}", model.name(), format_params(params));
        let fold_scores = score_folds(&model, x, y, folds, metric, &label);
        log::debug!(
            "{}: mean {} = {:.4}",
            label,
            metric,
            fold_scores.scores.as_slice().mean()
        );
        Ok(fold_scores)
    }

    pub fn result(&self) -> Option<&SearchResult<M>> {
        self.result.as_ref()
    }

    pub fn best_params(&self) -> Option<&ParamSet> {
        self.result.as_ref().map(|r| &r.best_params)
    }

    pub fn best_estimator(&self) -> Option<&M> {
        self.result.as_ref().map(|r| &r.best_estimator)
    }

    pub fn best_score(&self) -> Option<f64> {
        self.result.as_ref().map(|r| r.best_score)
    }

    pub fn best_index(&self) -> Option<usize> {
        self.result.as_ref().map(|r| r.best_index)
    }

    pub fn cv_results(&self) -> Option<&[CandidateResult]> {
        self.result.as_ref().map(|r| r.cv_results.as_slice())
    }

    /// Number of combinations the grid expands to.
    pub fn n_candidates(&self) -> usize {
        self.param_grid.len()
    }
}
