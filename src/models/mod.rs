pub mod knn;
#[cfg(feature = "svm")]
pub mod svm;

pub mod classifier_trait;
pub mod factory;

pub use classifier_trait::ClassifierModel;
pub use factory::{build_model, AnyClassifier};
pub use knn::KNeighborsClassifier;
#[cfg(feature = "svm")]
pub use svm::SvmClassifier;
