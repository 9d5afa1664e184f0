//! Trackcast Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod artifacts;
pub mod dataset;
pub mod error;
pub mod features;
pub mod predictor;
pub mod server;
pub mod similarity;
pub mod stats;

// Re-export commonly used types for convenience
pub use error::CoreError;
pub use features::{FeaturePipeline, TrackFeatures};
pub use predictor::{PredictionResult, Predictor};
pub use server::{run_server, RequestsLoggingLevel, ServerConfig};
pub use similarity::SimilarityEngine;
