use anyhow::Result;
use std::sync::Arc;

use tracing::{error, info};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::dataset::TrackDataset;
use crate::error::CoreError;
use crate::features::TrackFeatures;
use crate::predictor::Predictor;
use crate::similarity::{SimilarityEngine, DEFAULT_RECOMMENDATIONS};
use crate::stats::summarize;

use super::metrics::{record_error, record_prediction, record_similarity_search};
use super::state::*;
use super::{log_requests, ServerConfig};

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({ "error": { "code": code, "message": message } })),
    )
        .into_response()
}

fn invalid_request_response() -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        "INVALID_REQUEST",
        "Request body must be JSON",
    )
}

/// Map a core error to the response envelope for one endpoint.
///
/// Validation messages are caller-safe and pass through verbatim. Everything
/// else is logged in full here and surfaced as an opaque message; internal
/// error text never reaches the caller.
fn core_error_response(err: &CoreError, endpoint: &str) -> Response {
    match err {
        CoreError::Validation { .. } => {
            record_error("validation", endpoint);
            error_response(
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                &err.to_string(),
            )
        }
        CoreError::ArtifactLoad { .. } => {
            error!("Artifact failure serving /{}: {}", endpoint, err);
            record_error("artifact_load", endpoint);
            let (code, message) = match endpoint {
                "predict" => ("MODEL_ERROR", "Failed to generate prediction"),
                _ => ("DATA_ERROR", "Failed to load dataset"),
            };
            error_response(StatusCode::INTERNAL_SERVER_ERROR, code, message)
        }
        CoreError::ShapeMismatch { .. } | CoreError::Unexpected(_) => {
            error!("Internal failure serving /{}: {}", endpoint, err);
            record_error("internal", endpoint);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An unexpected error occurred",
            )
        }
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy", "message": "API is running" }))
}

async fn predict(
    State(predictor): State<SharedPredictor>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        return invalid_request_response();
    };

    let features = match TrackFeatures::from_value(&body) {
        Ok(features) => features,
        Err(err) => return core_error_response(&err, "predict"),
    };

    match predictor.predict(&features) {
        Ok(result) => {
            record_prediction(result.prediction.as_str());
            Json(result).into_response()
        }
        Err(err) => core_error_response(&err, "predict"),
    }
}

/// `n_recommendations` is advisory: non-integer values silently fall back to
/// the default, and the value is clamped, never rejected.
fn parse_recommendation_count(value: Option<&Value>) -> usize {
    let parsed = match value {
        None => None,
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(n) => n.clamp(3, 10) as usize,
        None => DEFAULT_RECOMMENDATIONS,
    }
}

async fn similar(
    State(engine): State<SharedSimilarityEngine>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        return invalid_request_response();
    };

    // Features may sit at the root or be nested under "features".
    let raw_features = body.get("features").unwrap_or(&body);
    let features = match TrackFeatures::from_value(raw_features) {
        Ok(features) => features,
        Err(err) => return core_error_response(&err, "similar"),
    };

    let n = parse_recommendation_count(body.get("n_recommendations"));

    match engine.find_similar(&features, n) {
        Ok(tracks) => {
            record_similarity_search(tracks.len());
            Json(json!({ "similar_tracks": tracks })).into_response()
        }
        Err(err) => core_error_response(&err, "similar"),
    }
}

async fn eda_data(State(dataset): State<SharedDataset>) -> Response {
    Json(summarize(&dataset)).into_response()
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin.trim()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

pub fn make_app(
    config: ServerConfig,
    predictor: Arc<Predictor>,
    dataset: Arc<TrackDataset>,
    similarity: Arc<SimilarityEngine>,
) -> Result<Router> {
    let state = ServerState {
        config: config.clone(),
        predictor,
        dataset,
        similarity,
    };

    let api_routes: Router = Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/similar", post(similar))
        .route("/eda-data", get(eda_data))
        .with_state(state.clone());

    let app: Router = Router::new()
        .nest("/api", api_routes)
        .layer(cors_layer(&config.cors_origins)?)
        .layer(middleware::from_fn_with_state(state, log_requests));

    Ok(app)
}

pub async fn run_server(
    config: ServerConfig,
    predictor: Arc<Predictor>,
    dataset: Arc<TrackDataset>,
    similarity: Arc<SimilarityEngine>,
) -> Result<()> {
    let metrics_port = config.metrics_port;
    let port = config.port;
    let app = make_app(config, predictor, dataset, similarity)?;

    tokio::spawn(async move {
        if let Err(err) = super::metrics::run_metrics_server(metrics_port).await {
            error!("Metrics server failed: {}", err);
        }
    });

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    info!("Serving at port {}", port);

    Ok(axum::serve(listener, app).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{HitClassifier, StandardScaler};
    use crate::features::FeaturePipeline;
    use axum::body::Body;
    use axum::http::Request;
    use std::io::Write;
    use tower::ServiceExt; // for `oneshot`

    fn test_app() -> Router {
        let scaler = StandardScaler::new(vec![0.0; 23], vec![1.0; 23]).unwrap();
        let pipeline = FeaturePipeline::new(scaler, None).unwrap();
        let mut weights = vec![0.0; 23];
        weights[1] = 2.0;
        let classifier = HitClassifier {
            model_version: 1,
            feature_len: 23,
            weights,
            bias: -0.5,
        };
        let predictor = Arc::new(Predictor::new(pipeline, classifier).unwrap());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "track_name,artists,popularity,tempo,energy,danceability,loudness,valence,acousticness,instrumentalness,liveness,speechiness,duration_ms,key,mode,time_signature"
        )
        .unwrap();
        for i in 0..5 {
            writeln!(
                file,
                "t{i},a{i},{},{},0.5,0.5,-8,0.5,0.3,0.2,0.2,0.05,200000,5,1,4",
                40 + i * 10,
                80.0 + i as f64 * 15.0,
            )
            .unwrap();
        }
        file.flush().unwrap();
        let dataset = Arc::new(TrackDataset::load(file.path()).unwrap());
        let similarity = Arc::new(SimilarityEngine::new(dataset.clone()));

        make_app(ServerConfig::default(), predictor, dataset, similarity).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_responds_ok() {
        let app = test_app();
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn predict_rejects_non_json_body() {
        let app = test_app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/predict")
            .body(Body::from("not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn recommendation_count_falls_back_and_clamps() {
        assert_eq!(parse_recommendation_count(None), 5);
        assert_eq!(parse_recommendation_count(Some(&json!(7))), 7);
        assert_eq!(parse_recommendation_count(Some(&json!(0))), 3);
        assert_eq!(parse_recommendation_count(Some(&json!(99))), 10);
        assert_eq!(parse_recommendation_count(Some(&json!(6.8))), 6);
        assert_eq!(parse_recommendation_count(Some(&json!("8"))), 8);
        assert_eq!(parse_recommendation_count(Some(&json!("lots"))), 5);
        assert_eq!(parse_recommendation_count(Some(&json!([4]))), 5);
    }
}
