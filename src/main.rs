use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trackcast::artifacts::{GenreEncoder, HitClassifier, StandardScaler};
use trackcast::dataset::TrackDataset;
use trackcast::features::FeaturePipeline;
use trackcast::predictor::Predictor;
use trackcast::server::{self, metrics, run_server, RequestsLoggingLevel, ServerConfig};
use trackcast::similarity::SimilarityEngine;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the trained classifier file.
    #[clap(long, default_value = "models/model.json", value_parser = parse_path)]
    pub model_path: PathBuf,

    /// Path to the fitted feature scaler file.
    #[clap(long, default_value = "models/scaler.json", value_parser = parse_path)]
    pub scaler_path: PathBuf,

    /// Path to the genre encoder file. When given, the pipeline appends the
    /// genre placeholder features; when omitted, it never does.
    #[clap(long, value_parser = parse_path)]
    pub genre_encoder_path: Option<PathBuf>,

    /// Path to the reference track dataset CSV.
    #[clap(long, default_value = "data/dataset.csv", value_parser = parse_path)]
    pub dataset_path: PathBuf,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 5000)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Comma-separated list of allowed CORS origins.
    #[clap(long, default_value = server::config::DEFAULT_CORS_ORIGIN)]
    pub cors_origins: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    info!("Loading classifier from {:?}...", cli_args.model_path);
    let classifier = HitClassifier::load(&cli_args.model_path)?;

    info!("Loading scaler from {:?}...", cli_args.scaler_path);
    let scaler = StandardScaler::load(&cli_args.scaler_path)?;

    let genre_encoder = match &cli_args.genre_encoder_path {
        Some(path) => {
            info!("Loading genre encoder from {:?}...", path);
            let encoder = GenreEncoder::load(path)?;
            info!("Genre features enabled ({} classes)", encoder.class_count());
            Some(encoder)
        }
        None => {
            info!("No genre encoder configured, genre features disabled");
            None
        }
    };

    // Shape drift between the fitted artifacts and the pipeline fails here,
    // at startup, not at first inference.
    let pipeline = FeaturePipeline::new(scaler, genre_encoder)?;
    let predictor = Arc::new(Predictor::new(pipeline, classifier)?);

    info!("Loading reference dataset from {:?}...", cli_args.dataset_path);
    let dataset = Arc::new(TrackDataset::load(&cli_args.dataset_path)?);
    let similarity = Arc::new(SimilarityEngine::new(dataset.clone()));

    info!("Initializing metrics...");
    metrics::init_metrics();
    metrics::init_dataset_metrics(dataset.len());

    let config = ServerConfig {
        port: cli_args.port,
        metrics_port: cli_args.metrics_port,
        requests_logging_level: cli_args.logging_level,
        cors_origins: cli_args
            .cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    };

    info!("Ready to serve at port {}!", config.port);
    info!("Metrics available at port {}!", config.metrics_port);
    run_server(config, predictor, dataset, similarity).await
}
