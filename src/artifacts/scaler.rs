use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-column standardization transform with parameters fixed at fit time.
///
/// Columns with zero (or non-finite) fitted deviation are passed through
/// unscaled, matching what the training stack does for constant columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, std: Vec<f64>) -> Result<Self, CoreError> {
        if mean.len() != std.len() {
            return Err(CoreError::ShapeMismatch {
                expected: mean.len(),
                actual: std.len(),
            });
        }
        let std = std
            .into_iter()
            .map(|s| if s.is_finite() && s > 0.0 { s } else { 1.0 })
            .collect();
        Ok(StandardScaler { mean, std })
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw: StandardScaler = super::load_json(path)?;
        Self::new(raw.mean, raw.std).map_err(|_| {
            CoreError::artifact_load(path, "mean and std lengths differ".to_string())
        })
    }

    /// Fit mean and population standard deviation over the given rows.
    ///
    /// Every row must have `width` columns; callers in this crate guarantee
    /// that by construction.
    pub fn fit(rows: &[Vec<f64>], width: usize) -> Result<Self, CoreError> {
        if rows.is_empty() {
            return Err(CoreError::Unexpected(anyhow::anyhow!(
                "cannot fit a scaler over an empty dataset"
            )));
        }
        let n = rows.len() as f64;
        let mut mean = vec![0.0; width];
        for row in rows {
            for (acc, value) in mean.iter_mut().zip(row) {
                *acc += value;
            }
        }
        for acc in mean.iter_mut() {
            *acc /= n;
        }

        let mut variance = vec![0.0; width];
        for row in rows {
            for ((acc, value), m) in variance.iter_mut().zip(row).zip(&mean) {
                let d = value - m;
                *acc += d * d;
            }
        }
        let std = variance.into_iter().map(|v| (v / n).sqrt()).collect();
        Self::new(mean, std)
    }

    /// Number of columns the scaler was fitted over.
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Standardize one vector. Fails with [`CoreError::ShapeMismatch`] when
    /// the input length does not match the fitted dimension.
    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>, CoreError> {
        if values.len() != self.dim() {
            return Err(CoreError::ShapeMismatch {
                expected: self.dim(),
                actual: values.len(),
            });
        }
        Ok(values
            .iter()
            .zip(self.mean.iter().zip(&self.std))
            .map(|(value, (mean, std))| (value - mean) / std)
            .collect())
    }
}
