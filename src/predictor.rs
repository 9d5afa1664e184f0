//! Classifier adapter: feature pipeline plus the fitted classifier.

use crate::artifacts::{HitClassifier, CLASS_HIT};
use crate::error::CoreError;
use crate::features::{FeaturePipeline, TrackFeatures};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionLabel {
    Hit,
    Miss,
}

impl PredictionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionLabel::Hit => "hit",
            PredictionLabel::Miss => "miss",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClassProbabilities {
    pub miss: f64,
    pub hit: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub prediction: PredictionLabel,
    pub confidence: f64,
    pub probabilities: ClassProbabilities,
}

/// Runs the feature pipeline and the classifier for one track.
#[derive(Debug)]
pub struct Predictor {
    pipeline: FeaturePipeline,
    classifier: HitClassifier,
}

impl Predictor {
    /// The classifier must expect exactly the vector the pipeline produces;
    /// checked here so artifact drift fails at startup.
    pub fn new(pipeline: FeaturePipeline, classifier: HitClassifier) -> Result<Self, CoreError> {
        if classifier.feature_len != pipeline.output_len() {
            return Err(CoreError::ShapeMismatch {
                expected: pipeline.output_len(),
                actual: classifier.feature_len,
            });
        }
        Ok(Predictor {
            pipeline,
            classifier,
        })
    }

    /// Predict hit/miss for a validated feature record.
    ///
    /// Confidence is the probability mass of the class the classifier chose,
    /// not the larger of the two probabilities: it answers how sure the model
    /// is in its stated decision.
    pub fn predict(&self, features: &TrackFeatures) -> Result<PredictionResult, CoreError> {
        let vector = self.pipeline.transform(features)?;
        let class = self.classifier.predict(&vector)?;
        let probabilities = self.classifier.predict_proba(&vector)?;

        let prediction = if class == CLASS_HIT {
            PredictionLabel::Hit
        } else {
            PredictionLabel::Miss
        };

        Ok(PredictionResult {
            prediction,
            confidence: probabilities[class],
            probabilities: ClassProbabilities {
                miss: probabilities[0],
                hit: probabilities[1],
            },
        })
    }
}
