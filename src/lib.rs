//! redeem-crossval: cross-validated hyperparameter search for classifiers.
//!
//! The `CrossValidate` wrapper runs an exhaustive grid search where each
//! candidate is scored by stratified k-fold cross-validation, and exposes the
//! best parameters, the refitted best model and the best score. A stateless
//! `CrossValidate::cv_score` helper scores a single model on shuffled,
//! seeded stratified folds.
//!
//! Scoring is delegated to linfa; the SVM model (linfa-svm) is behind the
//! `svm` feature.
pub mod config;
pub mod cross_validate;
pub mod error;
pub mod io;
pub mod metrics;
pub mod model_selection;
pub mod models;
pub mod params;

pub use cross_validate::{CrossValidate, SearchState, CV_RANDOM_STATE, DEFAULT_CV_SPLITS, DEFAULT_METRIC};
pub use error::{CrossValError, Result};
pub use metrics::Metric;
pub use params::{ParamGrid, ParamSet, ParamValue};
