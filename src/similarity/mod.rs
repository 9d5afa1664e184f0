//! Nearest-neighbor track recommendations over the reference dataset.

use crate::dataset::TrackDataset;
use crate::error::CoreError;
use crate::features::TrackFeatures;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;

/// Smallest number of recommendations a caller can get.
pub const MIN_RECOMMENDATIONS: usize = 3;
/// Largest number of recommendations a caller can get.
pub const MAX_RECOMMENDATIONS: usize = 10;
/// Returned when the caller does not ask for a specific count.
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// One recommended track with its original (non-standardized) base features.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarTrack {
    pub track_name: String,
    pub artist: String,
    pub similarity_score: f64,
    pub features: TrackFeatures,
}

/// Cosine similarity search in the dataset's standardized 13-dimension
/// feature space. Similarity deliberately ignores the engineered terms the
/// classifier uses; the two feature spaces have separately fitted scalers.
pub struct SimilarityEngine {
    dataset: Arc<TrackDataset>,
}

impl SimilarityEngine {
    pub fn new(dataset: Arc<TrackDataset>) -> Self {
        SimilarityEngine { dataset }
    }

    /// The `n` most similar reference tracks, sorted by descending score,
    /// ties broken by original dataset row order. `n` is clamped to
    /// `[MIN_RECOMMENDATIONS, MAX_RECOMMENDATIONS]`; fewer rows than that
    /// yields all rows.
    pub fn find_similar(
        &self,
        features: &TrackFeatures,
        n: usize,
    ) -> Result<Vec<SimilarTrack>, CoreError> {
        let n = n.clamp(MIN_RECOMMENDATIONS, MAX_RECOMMENDATIONS);

        let query = self.dataset.scaler().transform(&features.base_vector())?;

        let mut scored: Vec<(usize, f64)> = self
            .dataset
            .standardized()
            .iter()
            .enumerate()
            .map(|(index, row)| (index, cosine_similarity(&query, row)))
            .collect();

        // Stable sort keeps earlier rows first among equal scores.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(n);

        Ok(scored
            .into_iter()
            .map(|(index, score)| {
                let row = &self.dataset.rows()[index];
                SimilarTrack {
                    track_name: row.track_name.clone(),
                    artist: row.artist.clone(),
                    similarity_score: score,
                    features: TrackFeatures::from_base_values(row.features),
                }
            })
            .collect())
    }
}

/// Normalized dot product; a zero vector on either side yields 0.0 instead of
/// dividing by zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
