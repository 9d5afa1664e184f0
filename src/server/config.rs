use super::RequestsLoggingLevel;

/// Default allowed CORS origin for the local frontend dev server.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub requests_logging_level: RequestsLoggingLevel,
    /// Origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: 5000,
            metrics_port: 9091,
            requests_logging_level: RequestsLoggingLevel::default(),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
        }
    }
}
