//! Track feature records and the feature engineering pipeline.

mod pipeline;

pub use pipeline::FeaturePipeline;

use crate::error::CoreError;
use serde::Serialize;
use serde_json::Value;

/// Number of base audio descriptors per track.
pub const BASE_FEATURE_COUNT: usize = 13;

/// Number of neutral placeholder values appended when a genre encoder is
/// configured: encoded genre index plus mean/std/median popularity stand-ins.
pub const GENRE_PLACEHOLDER_COUNT: usize = 4;

/// Number of engineered terms appended after the base (and genre) values.
pub const ENGINEERED_FEATURE_COUNT: usize = 10;

/// Canonical column order. Every vector handed to a fitted artifact uses this
/// order; it must match the order the artifacts were fitted with.
pub const FEATURE_COLUMNS: [&str; BASE_FEATURE_COUNT] = [
    "tempo",
    "energy",
    "danceability",
    "loudness",
    "valence",
    "acousticness",
    "instrumentalness",
    "liveness",
    "speechiness",
    "duration_ms",
    "key",
    "mode",
    "time_signature",
];

/// Closed acceptance range for each feature, in [`FEATURE_COLUMNS`] order.
const FEATURE_RANGES: [(f64, f64); BASE_FEATURE_COUNT] = [
    (0.0, 250.0),        // tempo
    (0.0, 1.0),          // energy
    (0.0, 1.0),          // danceability
    (-60.0, 0.0),        // loudness
    (0.0, 1.0),          // valence
    (0.0, 1.0),          // acousticness
    (0.0, 1.0),          // instrumentalness
    (0.0, 1.0),          // liveness
    (0.0, 1.0),          // speechiness
    (0.0, 10_000_000.0), // duration_ms, ~2.7 hours max
    (0.0, 11.0),         // key
    (0.0, 1.0),          // mode
    (3.0, 7.0),          // time_signature
];

/// A validated track feature record. Once constructed, every field is numeric
/// and inside its closed range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackFeatures {
    pub tempo: f64,
    pub energy: f64,
    pub danceability: f64,
    pub loudness: f64,
    pub valence: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub speechiness: f64,
    pub duration_ms: f64,
    pub key: f64,
    pub mode: f64,
    pub time_signature: f64,
}

fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

impl TrackFeatures {
    /// Validate a raw JSON mapping into a feature record.
    ///
    /// Checks presence, numeric type and range for each of the 13 fields, in
    /// canonical order, and reports the first offending field by name.
    pub fn from_value(value: &Value) -> Result<Self, CoreError> {
        let map = value.as_object().ok_or_else(|| {
            CoreError::validation("features", "Track features must be a JSON object")
        })?;

        let mut values = [0.0; BASE_FEATURE_COUNT];
        for (i, name) in FEATURE_COLUMNS.iter().enumerate() {
            let raw = map.get(*name).ok_or_else(|| {
                CoreError::validation(*name, format!("Missing required feature: {name}"))
            })?;
            let parsed = raw.as_f64().ok_or_else(|| {
                CoreError::validation(*name, format!("Invalid value for {name}: must be numeric"))
            })?;
            let (min, max) = FEATURE_RANGES[i];
            if !(parsed >= min && parsed <= max) {
                return Err(CoreError::validation(
                    *name,
                    format!(
                        "Invalid value for {name}: must be between {} and {}",
                        format_bound(min),
                        format_bound(max)
                    ),
                ));
            }
            values[i] = parsed;
        }
        Ok(Self::from_base_values(values))
    }

    /// Build a record from already-validated values in canonical order.
    pub fn from_base_values(values: [f64; BASE_FEATURE_COUNT]) -> Self {
        TrackFeatures {
            tempo: values[0],
            energy: values[1],
            danceability: values[2],
            loudness: values[3],
            valence: values[4],
            acousticness: values[5],
            instrumentalness: values[6],
            liveness: values[7],
            speechiness: values[8],
            duration_ms: values[9],
            key: values[10],
            mode: values[11],
            time_signature: values[12],
        }
    }

    /// The 13 base values in canonical order.
    pub fn base_vector(&self) -> [f64; BASE_FEATURE_COUNT] {
        [
            self.tempo,
            self.energy,
            self.danceability,
            self.loudness,
            self.valence,
            self.acousticness,
            self.instrumentalness,
            self.liveness,
            self.speechiness,
            self.duration_ms,
            self.key,
            self.mode,
            self.time_signature,
        ]
    }
}
