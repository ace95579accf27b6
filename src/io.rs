//! Reading labelled feature tables.
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use ndarray::{Array1, Array2};

/// Feature matrix and class labels read from a delimited file.
#[derive(Debug, Clone)]
pub struct LabeledData {
    pub x: Array2<f64>,
    pub y: Array1<usize>,
    pub feature_names: Vec<String>,
}

fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|s| s.to_str()).map(|s| s.to_lowercase()) {
        Some(ext) if ext == "tsv" => b'\t',
        _ => b',',
    }
}

/// Read a CSV/TSV file with a header row. `label_column` holds integer class
/// labels, every other column is parsed as a numeric feature.
pub fn read_labeled_csv<P: AsRef<Path>>(path: P, label_column: &str) -> Result<LabeledData> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_for(path))
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open data file: {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let label_idx = headers
        .iter()
        .position(|h| h == label_column)
        .ok_or_else(|| anyhow!("Label column '{}' not found in {}", label_column, path.display()))?;

    let feature_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != label_idx)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut data = Vec::new();
    let mut labels = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read row {}", row + 1))?;
        for (i, field) in record.iter().enumerate() {
            if i == label_idx {
                let label: usize = field.trim().parse().with_context(|| {
                    format!("Invalid label '{}' on row {}", field, row + 1)
                })?;
                labels.push(label);
            } else {
                let value: f64 = field.trim().parse().with_context(|| {
                    format!("Invalid value '{}' in column '{}' on row {}", field, &headers[i], row + 1)
                })?;
                data.push(value);
            }
        }
    }

    let x = Array2::from_shape_vec((labels.len(), feature_names.len()), data)
        .context("Rows have inconsistent numbers of columns")?;
    log::info!(
        "Loaded {} samples with {} features from {}",
        x.nrows(),
        x.ncols(),
        path.display()
    );

    Ok(LabeledData {
        x,
        y: Array1::from_vec(labels),
        feature_names,
    })
}
