use thiserror::Error;

/// Errors raised while configuring, searching or scoring.
#[derive(Debug, Error)]
pub enum CrossValError {
    #[error("Found input variables with inconsistent numbers of samples: {samples} samples, {labels} labels")]
    ShapeMismatch { samples: usize, labels: usize },

    #[error("Parameter grid is empty")]
    EmptyGrid,

    #[error("Parameter grid entry '{0}' has no candidate values")]
    EmptyParameter(String),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Unknown scoring metric: {0}. Valid options are: accuracy, precision, recall, f1, mcc")]
    UnknownMetric(String),

    #[error("Cannot split {n_samples} samples into {n_splits} folds")]
    InvalidFolds { n_splits: usize, n_samples: usize },

    #[error("n_splits={n_splits} cannot be greater than the number of members in each class (largest class has {largest_class})")]
    TooFewClassMembers { n_splits: usize, largest_class: usize },

    #[error("All the {n_fits} fits failed. First error: {first_error}")]
    AllFitsFailed { n_fits: usize, first_error: String },

    #[error("Model must be fitted before calling predict")]
    ModelNotFitted,

    #[error("The hyperparameter search has not been run yet")]
    NotTrained,

    #[error("Metric computation failed: {0}")]
    Metric(String),

    #[error("Model backend error: {0}")]
    Model(String),
}

impl From<linfa::error::Error> for CrossValError {
    fn from(err: linfa::error::Error) -> Self {
        CrossValError::Metric(err.to_string())
    }
}

/// Result type for cross-validation operations
pub type Result<T> = std::result::Result<T, CrossValError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CrossValError::ShapeMismatch { samples: 10, labels: 8 };
        assert!(err.to_string().contains("10 samples"));
        assert!(err.to_string().contains("8 labels"));

        let err = CrossValError::UnknownMetric("roc".to_string());
        assert!(err.to_string().contains("roc"));

        let err = CrossValError::InvalidFolds { n_splits: 5, n_samples: 3 };
        assert!(err.to_string().contains("5 folds"));

        let err = CrossValError::AllFitsFailed {
            n_fits: 9,
            first_error: "k too large".to_string(),
        };
        assert!(err.to_string().contains("All the 9 fits failed"));
        assert!(err.to_string().contains("k too large"));
    }
}
