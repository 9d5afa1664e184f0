//! HTTP client for end-to-end tests
//!
//! When API routes or request formats change, update only this file.

use super::constants::REQUEST_TIMEOUT_SECS;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

pub struct TestClient {
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    pub async fn health(&self) -> Response {
        self.client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .expect("health request failed")
    }

    pub async fn predict(&self, body: &Value) -> Response {
        self.client
            .post(format!("{}/api/predict", self.base_url))
            .json(body)
            .send()
            .await
            .expect("predict request failed")
    }

    /// POST a raw, intentionally non-JSON body to /api/predict.
    pub async fn predict_raw(&self, body: &'static str) -> Response {
        self.client
            .post(format!("{}/api/predict", self.base_url))
            .body(body)
            .send()
            .await
            .expect("predict request failed")
    }

    pub async fn similar(&self, body: &Value) -> Response {
        self.client
            .post(format!("{}/api/similar", self.base_url))
            .json(body)
            .send()
            .await
            .expect("similar request failed")
    }

    pub async fn eda_data(&self) -> Response {
        self.client
            .get(format!("{}/api/eda-data", self.base_url))
            .send()
            .await
            .expect("eda-data request failed")
    }
}
