use super::{
    TrackFeatures, BASE_FEATURE_COUNT, ENGINEERED_FEATURE_COUNT, GENRE_PLACEHOLDER_COUNT,
};
use crate::artifacts::{GenreEncoder, StandardScaler};
use crate::error::CoreError;

/// Denominator guard for the ratio terms; part of the fitted contract and
/// must match what the scaler and model were trained with.
const RATIO_EPSILON: f64 = 0.01;

/// Expands a validated feature record into the full engineered vector and
/// standardizes it with the classifier's fitted scaler.
///
/// Whether genre placeholders are appended is decided once at construction,
/// by whether an encoder is supplied. The vector length is checked against
/// the scaler here, at startup, so artifact drift fails fast instead of
/// silently misaligning columns at inference time.
#[derive(Debug)]
pub struct FeaturePipeline {
    scaler: StandardScaler,
    genre_encoder: Option<GenreEncoder>,
}

impl FeaturePipeline {
    pub fn new(
        scaler: StandardScaler,
        genre_encoder: Option<GenreEncoder>,
    ) -> Result<Self, CoreError> {
        let expected = expected_vector_len(genre_encoder.is_some());
        if scaler.dim() != expected {
            return Err(CoreError::ShapeMismatch {
                expected,
                actual: scaler.dim(),
            });
        }
        Ok(FeaturePipeline {
            scaler,
            genre_encoder,
        })
    }

    /// Length of the engineered vector this pipeline produces.
    pub fn output_len(&self) -> usize {
        expected_vector_len(self.genre_encoder.is_some())
    }

    pub fn genre_features_enabled(&self) -> bool {
        self.genre_encoder.is_some()
    }

    /// Expand and standardize one record. Pure: identical input yields
    /// bit-identical output.
    pub fn transform(&self, features: &TrackFeatures) -> Result<Vec<f64>, CoreError> {
        let vector = self.engineered_vector(features);
        self.scaler.transform(&vector)
    }

    /// The raw engineered vector, before standardization.
    fn engineered_vector(&self, features: &TrackFeatures) -> Vec<f64> {
        let mut vector = Vec::with_capacity(self.output_len());
        vector.extend_from_slice(&features.base_vector());

        if let Some(encoder) = &self.genre_encoder {
            vector.extend_from_slice(&encoder.placeholder_values());
        }

        let TrackFeatures {
            energy,
            danceability,
            loudness,
            valence,
            acousticness,
            instrumentalness,
            liveness,
            speechiness,
            duration_ms,
            ..
        } = *features;

        // Interaction terms
        vector.push(energy * loudness);
        vector.push(danceability * energy);
        vector.push(valence * energy);
        vector.push(acousticness * instrumentalness);
        // Polynomial terms
        vector.push(energy * energy);
        vector.push(danceability * danceability);
        vector.push(loudness * loudness);
        // Duration in minutes
        vector.push(duration_ms / 60_000.0);
        // Ratio terms
        vector.push(speechiness / (instrumentalness + RATIO_EPSILON));
        vector.push(liveness / (1.0 - liveness + RATIO_EPSILON));

        vector
    }
}

/// Full engineered vector length for a pipeline with or without genre terms.
pub fn expected_vector_len(genre_features: bool) -> usize {
    let genre_terms = if genre_features {
        GENRE_PLACEHOLDER_COUNT
    } else {
        0
    };
    BASE_FEATURE_COUNT + genre_terms + ENGINEERED_FEATURE_COUNT
}
