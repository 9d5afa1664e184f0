//! Fixture artifacts: classifier, scaler and reference dataset files written
//! into a temp directory, the same formats the real server loads at startup.

use super::constants::FIXTURE_DATASET_ROWS;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Engineered vector length for a pipeline without genre features.
const VECTOR_LEN: usize = 23;

/// Paths of the artifacts inside the fixture directory.
pub struct FixturePaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub dataset: PathBuf,
}

/// A complete valid feature payload (the worked example from the API docs).
pub fn valid_track_features() -> Value {
    json!({
        "tempo": 120,
        "energy": 0.8,
        "danceability": 0.7,
        "loudness": -5,
        "valence": 0.6,
        "acousticness": 0.1,
        "instrumentalness": 0.0,
        "liveness": 0.2,
        "speechiness": 0.05,
        "duration_ms": 200000,
        "key": 5,
        "mode": 1,
        "time_signature": 4
    })
}

/// Write model.json, scaler.json and dataset.csv into `dir`.
pub fn write_artifacts(dir: &TempDir) -> FixturePaths {
    let model = dir.path().join("model.json");
    let scaler = dir.path().join("scaler.json");
    let dataset = dir.path().join("dataset.csv");

    // Logistic regression leaning on the (standardized) energy column.
    let mut weights = vec![0.0; VECTOR_LEN];
    weights[1] = 3.0;
    fs::write(
        &model,
        serde_json::to_string_pretty(&json!({
            "model_version": 1,
            "feature_len": VECTOR_LEN,
            "weights": weights,
            "bias": -1.0,
        }))
        .unwrap(),
    )
    .unwrap();

    // Identity standardization keeps fixture predictions easy to reason about.
    fs::write(
        &scaler,
        serde_json::to_string_pretty(&json!({
            "mean": vec![0.0; VECTOR_LEN],
            "std": vec![1.0; VECTOR_LEN],
        }))
        .unwrap(),
    )
    .unwrap();

    let mut csv = String::from(
        "track_name,artists,popularity,tempo,energy,danceability,loudness,valence,acousticness,instrumentalness,liveness,speechiness,duration_ms,key,mode,time_signature\n",
    );
    for i in 0..FIXTURE_DATASET_ROWS {
        let f = i as f64;
        csv.push_str(&format!(
            "Track {i},Artist {i},{},{},{},{},{},{},{},{},{},{},{},{},{},4\n",
            (i + 1) * 10,          // popularity 10..120
            60.0 + 10.0 * f,       // tempo
            0.05 * f,              // energy
            0.3 + 0.05 * f,        // danceability
            -20.0 + f,             // loudness
            0.2 + 0.04 * f,        // valence
            0.05 * f,              // acousticness
            0.08 * f,              // instrumentalness
            0.1 + 0.03 * f,        // liveness
            0.03 + 0.02 * f,       // speechiness
            180_000 + 5_000 * i,   // duration_ms
            i % 12,                // key
            i % 2,                 // mode
        ));
    }
    fs::write(&dataset, csv).unwrap();

    FixturePaths {
        model,
        scaler,
        dataset,
    }
}
