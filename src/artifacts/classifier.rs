use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Class index for tracks predicted to miss.
pub const CLASS_MISS: usize = 0;
/// Class index for tracks predicted to hit.
pub const CLASS_HIT: usize = 1;

/// Binary logistic regression classifier over standardized feature vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitClassifier {
    pub model_version: i64,
    pub feature_len: usize,
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl HitClassifier {
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let classifier: HitClassifier = super::load_json(path)?;
        classifier
            .validate()
            .map_err(|message| CoreError::artifact_load(path, message))?;
        Ok(classifier)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.feature_len == 0 {
            return Err("feature_len must be > 0".to_string());
        }
        if self.weights.len() != self.feature_len {
            return Err(format!(
                "weights length {} does not match feature_len {}",
                self.weights.len(),
                self.feature_len
            ));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err("weights and bias must be finite".to_string());
        }
        Ok(())
    }

    fn decision_value(&self, vector: &[f64]) -> Result<f64, CoreError> {
        if vector.len() != self.feature_len {
            return Err(CoreError::ShapeMismatch {
                expected: self.feature_len,
                actual: vector.len(),
            });
        }
        let mut sum = self.bias;
        for (w, x) in self.weights.iter().zip(vector) {
            sum += w * x;
        }
        Ok(sum)
    }

    /// Class probabilities indexed `[miss, hit]`.
    pub fn predict_proba(&self, vector: &[f64]) -> Result<[f64; 2], CoreError> {
        let z = self.decision_value(vector)?;
        let hit = 1.0 / (1.0 + (-z).exp());
        Ok([1.0 - hit, hit])
    }

    /// Hard class decision: [`CLASS_HIT`] when the decision value is
    /// non-negative, [`CLASS_MISS`] otherwise.
    pub fn predict(&self, vector: &[f64]) -> Result<usize, CoreError> {
        let z = self.decision_value(vector)?;
        Ok(if z >= 0.0 { CLASS_HIT } else { CLASS_MISS })
    }
}
