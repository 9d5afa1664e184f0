//! Test server lifecycle management
//!
//! Each test gets an isolated server on a random port with its own artifact
//! files, loaded exactly the way the production binary loads them.

use super::fixtures;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;
use trackcast::artifacts::{HitClassifier, StandardScaler};
use trackcast::dataset::TrackDataset;
use trackcast::features::FeaturePipeline;
use trackcast::predictor::Predictor;
use trackcast::server::server::make_app;
use trackcast::server::ServerConfig;
use trackcast::similarity::SimilarityEngine;

/// Test server instance with isolated artifacts.
///
/// When dropped, the server gracefully shuts down and temp resources are
/// cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Private fields - keep resources alive until drop
    _temp_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port.
    pub async fn spawn() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let paths = fixtures::write_artifacts(&temp_dir);

        let classifier = HitClassifier::load(&paths.model).expect("Failed to load fixture model");
        let scaler = StandardScaler::load(&paths.scaler).expect("Failed to load fixture scaler");
        let pipeline = FeaturePipeline::new(scaler, None).expect("Pipeline shape drift");
        let predictor =
            Arc::new(Predictor::new(pipeline, classifier).expect("Predictor shape drift"));

        let dataset =
            Arc::new(TrackDataset::load(&paths.dataset).expect("Failed to load fixture dataset"));
        let similarity = Arc::new(SimilarityEngine::new(dataset.clone()));

        let app = make_app(ServerConfig::default(), predictor, dataset, similarity)
            .expect("Failed to build app");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let port = listener.local_addr().unwrap().port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("Test server crashed");
        });

        TestServer {
            base_url: format!("http://127.0.0.1:{port}"),
            port,
            _temp_dir: temp_dir,
            _shutdown_tx: Some(shutdown_tx),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
