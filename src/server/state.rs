use axum::extract::FromRef;

use crate::dataset::TrackDataset;
use crate::predictor::Predictor;
use crate::similarity::SimilarityEngine;
use std::sync::Arc;

use super::ServerConfig;

pub type SharedPredictor = Arc<Predictor>;
pub type SharedDataset = Arc<TrackDataset>;
pub type SharedSimilarityEngine = Arc<SimilarityEngine>;

/// Everything a request handler needs, constructed once at startup.
///
/// All artifacts are loaded before the router exists; handlers only read.
#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub predictor: SharedPredictor,
    pub dataset: SharedDataset,
    pub similarity: SharedSimilarityEngine,
}

impl FromRef<ServerState> for SharedPredictor {
    fn from_ref(input: &ServerState) -> Self {
        input.predictor.clone()
    }
}

impl FromRef<ServerState> for SharedDataset {
    fn from_ref(input: &ServerState) -> Self {
        input.dataset.clone()
    }
}

impl FromRef<ServerState> for SharedSimilarityEngine {
    fn from_ref(input: &ServerState) -> Self {
        input.similarity.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
