use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_svm::{Svm, SvmParams};
use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::error::{CrossValError, Result};
use crate::models::classifier_trait::ClassifierModel;
use crate::params::ParamSet;

/// Binary support vector classifier backed by linfa-svm. Labels must be
/// 0 (negative) or 1 (positive).
#[derive(Debug, Clone)]
pub struct SvmClassifier {
    pub eps: f64,
    pub c: (f64, f64),
    pub kernel: String,
    pub gaussian_kernel_eps: f64,
    pub polynomial_kernel_constant: f64,
    pub polynomial_kernel_degree: f64,
    model: Option<Svm<f64, bool>>,
}

impl SvmClassifier {
    pub fn new(
        eps: f64,
        c: (f64, f64),
        kernel: &str,
        gaussian_kernel_eps: f64,
        polynomial_kernel_constant: f64,
        polynomial_kernel_degree: f64,
    ) -> Self {
        SvmClassifier {
            eps,
            c,
            kernel: kernel.to_string(),
            gaussian_kernel_eps,
            polynomial_kernel_constant,
            polynomial_kernel_degree,
            model: None,
        }
    }

    fn params(&self) -> Result<SvmParams<f64, bool>> {
        let (c1, c2) = self.c;
        let params: SvmParams<f64, bool> = Svm::<f64, bool>::params()
            .eps(self.eps)
            .pos_neg_weights(c1, c2);

        // Chain the kernel configuration based on the kernel type
        match self.kernel.as_str() {
            "linear" => Ok(params.linear_kernel()),
            "gauss" => Ok(params.gaussian_kernel(self.gaussian_kernel_eps)),
            "poly" => Ok(params.polynomial_kernel(
                self.polynomial_kernel_constant,
                self.polynomial_kernel_degree,
            )),
            other => Err(CrossValError::InvalidParameter {
                name: "kernel".to_string(),
                reason: format!(
                    "unsupported kernel type: {}. Valid options are: linear, gauss, poly",
                    other
                ),
            }),
        }
    }
}

impl Default for SvmClassifier {
    fn default() -> Self {
        SvmClassifier::new(0.1, (1.0, 1.0), "linear", 0.1, 1.0, 3.0)
    }
}

fn float_param(name: &str, value: &crate::params::ParamValue) -> Result<f64> {
    value.as_f64().ok_or_else(|| CrossValError::InvalidParameter {
        name: name.to_string(),
        reason: format!("expected a number, got {}", value),
    })
}

impl ClassifierModel for SvmClassifier {
    fn set_params(&mut self, params: &ParamSet) -> Result<()> {
        for (name, value) in params {
            match name.as_str() {
                "eps" => self.eps = float_param(name, value)?,
                "c" => {
                    let c = float_param(name, value)?;
                    self.c = (c, c);
                }
                "c_pos" => self.c.0 = float_param(name, value)?,
                "c_neg" => self.c.1 = float_param(name, value)?,
                "gaussian_kernel_eps" => self.gaussian_kernel_eps = float_param(name, value)?,
                "polynomial_kernel_constant" => {
                    self.polynomial_kernel_constant = float_param(name, value)?
                }
                "polynomial_kernel_degree" => {
                    self.polynomial_kernel_degree = float_param(name, value)?
                }
                "kernel" => {
                    self.kernel = value
                        .as_str()
                        .ok_or_else(|| CrossValError::InvalidParameter {
                            name: name.clone(),
                            reason: format!("expected a string, got {}", value),
                        })?
                        .to_string();
                }
                _ => {
                    return Err(CrossValError::InvalidParameter {
                        name: name.clone(),
                        reason: "unknown parameter for SvmClassifier".to_string(),
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
        if let Some(&label) = y.iter().find(|&&l| l > 1) {
            return Err(CrossValError::Model(format!(
                "SvmClassifier supports binary labels 0 and 1, found {}",
                label
            )));
        }

        let targets: Array1<bool> = y.mapv(|l| l == 1);
        let dataset = Dataset::new(x.to_owned(), targets);
        let params = self.params()?;

        let model = params
            .fit(&dataset)
            .map_err(|e| CrossValError::Model(e.to_string()))?;
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<usize>> {
        let model = self.model.as_ref().ok_or(CrossValError::ModelNotFitted)?;
        let predictions: Array1<bool> = model.predict(&x);
        Ok(predictions.mapv(|p| p as usize))
    }

    fn name(&self) -> &str {
        "svm"
    }
}
