//! Hyperparameter values, combinations and grids.
//!
//! A `ParamGrid` maps each parameter name to the candidate values to try.
//! Keys are kept sorted so the enumeration order of `combinations()` is
//! stable: the first key varies slowest, the last key fastest.

use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{CrossValError, Result};

/// A single hyperparameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Str(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

/// One combination of hyperparameters.
pub type ParamSet = BTreeMap<String, ParamValue>;

/// Format a parameter set as `{a: 1, b: rbf}` for log output.
pub fn format_params(params: &ParamSet) -> String {
    let body = params
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .join(", ");
    format!("{{{}}}", body)
}

/// Mapping from parameter name to its candidate values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamGrid {
    entries: BTreeMap<String, Vec<ParamValue>>,
}

impl ParamGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(entries: BTreeMap<String, Vec<ParamValue>>) -> Self {
        Self { entries }
    }

    /// Add (or replace) the candidates for `name`.
    pub fn add<N, V, I>(mut self, name: N, values: I) -> Self
    where
        N: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = V>,
    {
        self.entries
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&[ParamValue]> {
        self.entries.get(name).map(|v| v.as_slice())
    }

    /// Number of combinations in the grid.
    pub fn len(&self) -> usize {
        if self.entries.is_empty() {
            return 0;
        }
        self.entries.values().map(|v| v.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that the grid has at least one key and every key has candidates.
    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(CrossValError::EmptyGrid);
        }
        if let Some((name, _)) = self.entries.iter().find(|(_, values)| values.is_empty()) {
            return Err(CrossValError::EmptyParameter(name.clone()));
        }
        Ok(())
    }

    /// Every combination of the grid, first key slowest.
    pub fn combinations(&self) -> Vec<ParamSet> {
        if self.entries.is_empty() {
            return vec![ParamSet::new()];
        }
        let names: Vec<&String> = self.entries.keys().collect();
        self.entries
            .values()
            .map(|values| values.iter())
            .multi_cartesian_product()
            .map(|combo| {
                names
                    .iter()
                    .zip(combo)
                    .map(|(name, value)| ((*name).clone(), value.clone()))
                    .collect()
            })
            .collect()
    }

    /// True if `params` is one of the combinations of this grid.
    pub fn contains(&self, params: &ParamSet) -> bool {
        params.len() == self.entries.len()
            && params.iter().all(|(name, value)| {
                self.entries
                    .get(name)
                    .map_or(false, |values| values.contains(value))
            })
    }
}
