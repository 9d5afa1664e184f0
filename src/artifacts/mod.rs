//! Fitted artifacts the service consumes: classifier, scaler, genre encoder.
//!
//! All artifacts are serde-JSON files written at training time. Loading
//! failures are reported as [`CoreError::ArtifactLoad`] and are fatal to the
//! component that needs the artifact.

mod classifier;
mod genre;
mod scaler;

pub use classifier::{HitClassifier, CLASS_HIT};
pub use genre::GenreEncoder;
pub use scaler::StandardScaler;

use crate::error::CoreError;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, CoreError> {
    let file = File::open(path)
        .map_err(|err| CoreError::artifact_load(path, err.to_string()))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|err| CoreError::artifact_load(path, err.to_string()))
}
