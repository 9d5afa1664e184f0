//! Descriptive statistics over the reference dataset.
//!
//! Everything here is read-only reporting, computed fresh from the full
//! dataset on each call.

use crate::dataset::TrackDataset;
use crate::features::{BASE_FEATURE_COUNT, FEATURE_COLUMNS};
use serde::Serialize;
use std::collections::BTreeMap;

const HISTOGRAM_BINS: usize = 20;

/// Share of the popularity distribution a track must reach to count as a hit.
const HIT_POPULARITY_QUANTILE: f64 = 0.70;

#[derive(Debug, Clone, Serialize)]
pub struct FeatureDistribution {
    /// 21 bin edges spanning the observed range.
    pub bins: Vec<f64>,
    /// 20 per-bin counts; the last bin includes the maximum.
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Correlations {
    pub features: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureSummary {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HitMissDistribution {
    pub hit: u64,
    pub miss: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdaReport {
    pub feature_distributions: BTreeMap<String, FeatureDistribution>,
    pub correlations: Correlations,
    pub summary_statistics: BTreeMap<String, FeatureSummary>,
    pub hit_miss_distribution: HitMissDistribution,
}

/// Compute the full report: per-feature histograms, Pearson correlations,
/// summary statistics and the hit/miss split.
pub fn summarize(dataset: &TrackDataset) -> EdaReport {
    let columns: Vec<Vec<f64>> = (0..BASE_FEATURE_COUNT)
        .map(|col| dataset.feature_column(col))
        .collect();

    let mut feature_distributions = BTreeMap::new();
    let mut summary_statistics = BTreeMap::new();
    for (name, values) in FEATURE_COLUMNS.iter().zip(&columns) {
        feature_distributions.insert(name.to_string(), histogram(values, HISTOGRAM_BINS));
        summary_statistics.insert(name.to_string(), summarize_column(values));
    }

    let matrix = (0..BASE_FEATURE_COUNT)
        .map(|i| {
            (0..BASE_FEATURE_COUNT)
                .map(|j| {
                    if i == j {
                        1.0
                    } else {
                        pearson(&columns[i], &columns[j])
                    }
                })
                .collect()
        })
        .collect();
    let correlations = Correlations {
        features: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        matrix,
    };

    let hit_miss_distribution = match dataset.popularity_values() {
        Some(popularity) if !popularity.is_empty() => {
            let threshold = percentile(&popularity, HIT_POPULARITY_QUANTILE);
            let hit = popularity.iter().filter(|p| **p >= threshold).count() as u64;
            HitMissDistribution {
                hit,
                miss: dataset.len() as u64 - hit,
            }
        }
        _ => HitMissDistribution { hit: 0, miss: 0 },
    };

    EdaReport {
        feature_distributions,
        correlations,
        summary_statistics,
        hit_miss_distribution,
    }
}

/// Fixed-bin histogram over the observed range. A degenerate range (all
/// values equal) is widened by 0.5 on each side.
fn histogram(values: &[f64], bins: usize) -> FeatureDistribution {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(*v);
        hi = hi.max(*v);
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

    let mut counts = vec![0u64; bins];
    for v in values {
        let mut index = ((v - lo) / (hi - lo) * bins as f64) as usize;
        if index >= bins {
            index = bins - 1; // the max lands in the last, closed bin
        }
        counts[index] += 1;
    }

    FeatureDistribution {
        bins: edges,
        counts,
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 denominator); 0.0 for a single value.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Linearly interpolated percentile, `q` in [0, 1].
fn percentile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("finite values"));
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let frac = pos - lower as f64;
    sorted[lower] + frac * (sorted[upper] - sorted[lower])
}

fn summarize_column(values: &[f64]) -> FeatureSummary {
    FeatureSummary {
        mean: mean(values),
        std: sample_std(values),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        q25: percentile(values, 0.25),
        q50: percentile(values, 0.50),
        q75: percentile(values, 0.75),
    }
}

/// Pearson correlation. A constant column correlates 0.0 with everything,
/// keeping the matrix JSON-representable instead of producing NaN.
fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let ma = mean(a);
    let mb = mean(b);
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - ma;
        let dy = y - mb;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    if var_a <= 0.0 || var_b <= 0.0 {
        return 0.0;
    }
    cov / (var_a.sqrt() * var_b.sqrt())
}
