use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::metrics::Metric;
use crate::params::ParamGrid;

/// Model selection for the command line and config files.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ModelConfig {
    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their base hyper-parameters. Grid entries
/// override these values per candidate.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    Knn {
        k: usize,
    },
    #[cfg(feature = "svm")]
    Svm {
        eps: f64,
        c: (f64, f64),
        kernel: String,
        gaussian_kernel_eps: f64,
        polynomial_kernel_constant: f64,
        polynomial_kernel_degree: f64,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::Knn { k: 5 }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "knn" => Ok(ModelType::Knn { k: 5 }),
            #[cfg(feature = "svm")]
            "svm" => Ok(ModelType::Svm {
                eps: 0.1,
                c: (1.0, 1.0),
                kernel: "linear".to_string(),
                gaussian_kernel_eps: 0.1,
                polynomial_kernel_constant: 1.0,
                polynomial_kernel_degree: 3.0,
            }),
            _ => Err(format!(
                "Unknown model type: {}. To use svm, please compile with `--features svm`",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(model_type: ModelType) -> Self {
        Self { model_type }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_type: ModelType::default(),
        }
    }
}

/// Parameters for a cross-validated hyperparameter search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossValConfig {
    pub param_grid: ParamGrid,
    pub k_fold: usize,
    pub metric: String,
    pub model: ModelConfig,
}

impl Default for CrossValConfig {
    fn default() -> Self {
        Self {
            param_grid: ParamGrid::new(),
            k_fold: 5,
            metric: Metric::default().name().to_string(),
            model: ModelConfig::default(),
        }
    }
}

/// Load a search configuration from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CrossValConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: CrossValConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;

    #[test]
    fn test_config_defaults() {
        let config = CrossValConfig::default();
        assert_eq!(config.k_fold, 5);
        assert_eq!(config.metric, "accuracy");
        assert!(config.param_grid.is_empty());
        assert_eq!(config.model.model_type, ModelType::Knn { k: 5 });
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "param_grid": {"k": [1, 3, 5]},
            "k_fold": 3,
            "model": {"Knn": {"k": 1}}
        }"#;
        let config: CrossValConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.k_fold, 3);
        assert_eq!(config.metric, "accuracy");
        assert_eq!(config.param_grid.len(), 3);
        assert_eq!(config.param_grid.get("k").unwrap()[2], ParamValue::Int(5));
        assert_eq!(config.model.model_type, ModelType::Knn { k: 1 });
    }

    #[test]
    fn test_model_type_from_str() {
        assert_eq!("KNN".parse::<ModelType>().unwrap(), ModelType::Knn { k: 5 });
        assert!("xgboost".parse::<ModelType>().is_err());
    }
}
