use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Neutral stand-ins for the per-genre popularity statistics the model was
/// trained with. No genre is supplied at inference time, so these keep the
/// vector shape without biasing toward any one genre.
pub const NEUTRAL_GENRE_POP_MEAN: f64 = 50.0;
pub const NEUTRAL_GENRE_POP_STD: f64 = 15.0;
pub const NEUTRAL_GENRE_POP_MEDIAN: f64 = 50.0;

/// Label encoder for track genres, fitted at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreEncoder {
    classes: Vec<String>,
}

impl GenreEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, CoreError> {
        if classes.is_empty() {
            return Err(CoreError::Unexpected(anyhow::anyhow!(
                "genre encoder has no classes"
            )));
        }
        Ok(GenreEncoder { classes })
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw: GenreEncoder = super::load_json(path)?;
        Self::new(raw.classes)
            .map_err(|_| CoreError::artifact_load(path, "genre encoder has no classes".to_string()))
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Midpoint class index used as the neutral genre at inference time.
    pub fn neutral_class_index(&self) -> usize {
        self.classes.len() / 2
    }

    /// The four placeholder values appended to the feature vector, in the
    /// order the model was fitted with.
    pub fn placeholder_values(&self) -> [f64; 4] {
        [
            self.neutral_class_index() as f64,
            NEUTRAL_GENRE_POP_MEAN,
            NEUTRAL_GENRE_POP_STD,
            NEUTRAL_GENRE_POP_MEDIAN,
        ]
    }
}
