//! Fold splitting, cross-validation scoring and exhaustive grid search.
//!
//! - `StratifiedKFold`: class-preserving fold assignment, optionally shuffled with a fixed seed
//! - `cross_val_score`: per-fold scores for one model
//! - `GridSearchCv`: every grid combination cross-validated, best one refitted
pub mod cross_val;
pub mod grid_search;
pub mod stratified;

pub use cross_val::{cross_val_score, CvScores};
pub use grid_search::{CandidateResult, GridSearchCv, SearchResult};
pub use stratified::{FoldIndices, StratifiedKFold};
