use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::config::{ModelConfig, ModelType};
use crate::error::Result;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::knn::KNeighborsClassifier;
#[cfg(feature = "svm")]
use crate::models::svm::SvmClassifier;
use crate::params::ParamSet;

/// A classifier chosen at runtime from a `ModelConfig`.
///
/// Grid search clones its estimator, so the runtime choice is an enum
/// rather than a boxed trait object.
#[derive(Debug, Clone)]
pub enum AnyClassifier {
    Knn(KNeighborsClassifier),
    #[cfg(feature = "svm")]
    Svm(SvmClassifier),
}

/// Build a classifier model from a `ModelConfig`.
pub fn build_model(params: &ModelConfig) -> AnyClassifier {
    match &params.model_type {
        ModelType::Knn { k } => AnyClassifier::Knn(KNeighborsClassifier::new(*k)),
        #[cfg(feature = "svm")]
        ModelType::Svm {
            eps,
            c,
            kernel,
            gaussian_kernel_eps,
            polynomial_kernel_constant,
            polynomial_kernel_degree,
        } => AnyClassifier::Svm(SvmClassifier::new(
            *eps,
            *c,
            kernel,
            *gaussian_kernel_eps,
            *polynomial_kernel_constant,
            *polynomial_kernel_degree,
        )),
        // When compiled, `ModelType` only contains the variants enabled by
        // features, so the arms above are exhaustive.
    }
}

impl ClassifierModel for AnyClassifier {
    fn set_params(&mut self, params: &ParamSet) -> Result<()> {
        match self {
            AnyClassifier::Knn(m) => m.set_params(params),
            #[cfg(feature = "svm")]
            AnyClassifier::Svm(m) => m.set_params(params),
        }
    }

    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<usize>) -> Result<()> {
        match self {
            AnyClassifier::Knn(m) => m.fit(x, y),
            #[cfg(feature = "svm")]
            AnyClassifier::Svm(m) => m.fit(x, y),
        }
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<usize>> {
        match self {
            AnyClassifier::Knn(m) => m.predict(x),
            #[cfg(feature = "svm")]
            AnyClassifier::Svm(m) => m.predict(x),
        }
    }

    fn name(&self) -> &str {
        match self {
            AnyClassifier::Knn(m) => m.name(),
            #[cfg(feature = "svm")]
            AnyClassifier::Svm(m) => m.name(),
        }
    }
}
