mod common;

use common::constants::FIXTURE_DATASET_ROWS;
use common::{TestClient, TestServer};
use reqwest::StatusCode;
use serde_json::Value;

const FEATURE_COUNT: usize = 13;

#[tokio::test]
async fn report_has_expected_shape() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.eda_data().await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();

    let distributions = body["feature_distributions"].as_object().unwrap();
    assert_eq!(distributions.len(), FEATURE_COUNT);
    for (name, dist) in distributions {
        let bins = dist["bins"].as_array().unwrap();
        let counts = dist["counts"].as_array().unwrap();
        assert_eq!(bins.len(), 21, "feature {name}");
        assert_eq!(counts.len(), 20, "feature {name}");
        let total: u64 = counts.iter().map(|c| c.as_u64().unwrap()).sum();
        assert_eq!(total as usize, FIXTURE_DATASET_ROWS, "feature {name}");
    }

    let correlations = &body["correlations"];
    assert_eq!(
        correlations["features"].as_array().unwrap().len(),
        FEATURE_COUNT
    );
    let matrix = correlations["matrix"].as_array().unwrap();
    assert_eq!(matrix.len(), FEATURE_COUNT);
    for (i, row) in matrix.iter().enumerate() {
        let row = row.as_array().unwrap();
        assert_eq!(row.len(), FEATURE_COUNT);
        let diagonal = row[i].as_f64().unwrap();
        assert!((diagonal - 1.0).abs() < 1e-9);
        for cell in row {
            let value = cell.as_f64().unwrap();
            assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&value));
        }
    }

    let summaries = body["summary_statistics"].as_object().unwrap();
    assert_eq!(summaries.len(), FEATURE_COUNT);
    for (name, summary) in summaries {
        for key in ["mean", "std", "min", "max", "q25", "q50", "q75"] {
            assert!(
                summary.get(key).and_then(Value::as_f64).is_some(),
                "feature {name} missing {key}"
            );
        }
        let min = summary["min"].as_f64().unwrap();
        let max = summary["max"].as_f64().unwrap();
        let q50 = summary["q50"].as_f64().unwrap();
        assert!(min <= q50 && q50 <= max, "feature {name}");
    }
}

#[tokio::test]
async fn hit_miss_split_uses_popularity_percentile() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let body: Value = client.eda_data().await.json().await.unwrap();
    let hit = body["hit_miss_distribution"]["hit"].as_u64().unwrap();
    let miss = body["hit_miss_distribution"]["miss"].as_u64().unwrap();

    // Fixture popularity is 10..=120 in steps of 10; the 70th percentile is
    // 87, which the top four rows reach.
    assert_eq!(hit, 4);
    assert_eq!(hit + miss, FIXTURE_DATASET_ROWS as u64);
}

#[tokio::test]
async fn report_is_stable_across_calls() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let first: Value = client.eda_data().await.json().await.unwrap();
    let second: Value = client.eda_data().await.json().await.unwrap();
    assert_eq!(first, second);
}
