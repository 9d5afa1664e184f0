//! Reference track dataset backing the similarity and statistics engines.

use crate::artifacts::StandardScaler;
use crate::error::CoreError;
use crate::features::{BASE_FEATURE_COUNT, FEATURE_COLUMNS};
use std::path::Path;
use tracing::{info, warn};

/// One reference track: display metadata plus the 13 base feature values in
/// canonical column order.
#[derive(Debug, Clone)]
pub struct TrackRow {
    pub track_name: String,
    pub artist: String,
    pub popularity: Option<f64>,
    pub features: [f64; BASE_FEATURE_COUNT],
}

/// The reference dataset, loaded once at startup and immutable afterwards.
///
/// Holds the original rows, a scaler fitted over this dataset's 13 base
/// columns (independent of the classifier's scaler), and the precomputed
/// standardized matrix the similarity engine searches.
#[derive(Debug)]
pub struct TrackDataset {
    rows: Vec<TrackRow>,
    scaler: StandardScaler,
    standardized: Vec<Vec<f64>>,
    has_popularity: bool,
}

impl TrackDataset {
    /// Load a CSV file with the 13 base feature columns (required) and
    /// optional `track_name`, `artists` and `popularity` columns.
    ///
    /// Missing numeric cells are imputed with the per-column median before
    /// the scaler is fitted.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|err| CoreError::artifact_load(path, err.to_string()))?;

        let headers = reader
            .headers()
            .map_err(|err| CoreError::artifact_load(path, err.to_string()))?
            .clone();

        let column_index = |name: &str| headers.iter().position(|h| h == name);

        let mut feature_indices = [0usize; BASE_FEATURE_COUNT];
        for (i, name) in FEATURE_COLUMNS.iter().enumerate() {
            feature_indices[i] = column_index(name).ok_or_else(|| {
                CoreError::artifact_load(path, format!("missing required column: {name}"))
            })?;
        }
        let name_index = column_index("track_name");
        let artist_index = column_index("artists");
        let popularity_index = column_index("popularity");

        // First pass: collect raw cells; empty or unparseable cells become
        // None and are imputed below.
        let mut names: Vec<String> = Vec::new();
        let mut artists: Vec<String> = Vec::new();
        let mut popularity: Vec<Option<f64>> = Vec::new();
        let mut raw_features: Vec<[Option<f64>; BASE_FEATURE_COUNT]> = Vec::new();

        for record in reader.records() {
            let record = record.map_err(|err| CoreError::artifact_load(path, err.to_string()))?;

            let text_cell = |index: Option<usize>| {
                index
                    .and_then(|i| record.get(i))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| "Unknown".to_string())
            };
            let numeric_cell = |index: usize| {
                record
                    .get(index)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .and_then(|s| s.parse::<f64>().ok())
                    .filter(|v| v.is_finite())
            };

            names.push(text_cell(name_index));
            artists.push(text_cell(artist_index));
            popularity.push(popularity_index.and_then(numeric_cell));

            let mut row = [None; BASE_FEATURE_COUNT];
            for (slot, index) in row.iter_mut().zip(feature_indices) {
                *slot = numeric_cell(index);
            }
            raw_features.push(row);
        }

        if raw_features.is_empty() {
            return Err(CoreError::artifact_load(path, "dataset has no rows"));
        }

        // Median imputation per feature column.
        let mut imputed = 0usize;
        let mut feature_matrix: Vec<[f64; BASE_FEATURE_COUNT]> =
            vec![[0.0; BASE_FEATURE_COUNT]; raw_features.len()];
        for col in 0..BASE_FEATURE_COUNT {
            let present: Vec<f64> = raw_features.iter().filter_map(|row| row[col]).collect();
            if present.is_empty() {
                return Err(CoreError::artifact_load(
                    path,
                    format!("column {} has no numeric values", FEATURE_COLUMNS[col]),
                ));
            }
            let fill = median(&present);
            for (target, source) in feature_matrix.iter_mut().zip(&raw_features) {
                target[col] = match source[col] {
                    Some(value) => value,
                    None => {
                        imputed += 1;
                        fill
                    }
                };
            }
        }
        if imputed > 0 {
            warn!("Imputed {} missing feature values with column medians", imputed);
        }

        // Popularity cells are numeric too; impute the gaps when the column
        // exists at all.
        let has_popularity = popularity_index.is_some();
        if has_popularity {
            let present: Vec<f64> = popularity.iter().flatten().copied().collect();
            if !present.is_empty() {
                let fill = median(&present);
                for slot in popularity.iter_mut() {
                    slot.get_or_insert(fill);
                }
            }
        }

        let rows: Vec<TrackRow> = feature_matrix
            .iter()
            .zip(names)
            .zip(artists)
            .zip(&popularity)
            .map(|(((features, track_name), artist), pop)| TrackRow {
                track_name,
                artist,
                popularity: *pop,
                features: *features,
            })
            .collect();

        let as_vecs: Vec<Vec<f64>> = rows.iter().map(|r| r.features.to_vec()).collect();
        let scaler = StandardScaler::fit(&as_vecs, BASE_FEATURE_COUNT)?;
        let standardized = as_vecs
            .iter()
            .map(|row| scaler.transform(row))
            .collect::<Result<Vec<_>, _>>()?;

        info!("Loaded reference dataset with {} tracks", rows.len());
        Ok(TrackDataset {
            rows,
            scaler,
            standardized,
            has_popularity,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[TrackRow] {
        &self.rows
    }

    /// Scaler fitted over this dataset's base features.
    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Standardized feature matrix, one vector per row, row order preserved.
    pub fn standardized(&self) -> &[Vec<f64>] {
        &self.standardized
    }

    /// Popularity values for every row, or `None` when the dataset carries no
    /// popularity column.
    pub fn popularity_values(&self) -> Option<Vec<f64>> {
        if !self.has_popularity {
            return None;
        }
        Some(self.rows.iter().filter_map(|r| r.popularity).collect())
    }

    /// All values of one feature column, in row order.
    pub fn feature_column(&self, col: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r.features[col]).collect()
    }
}

/// Median of a non-empty slice; mean of the middle pair for even lengths.
pub(crate) fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("finite values"));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
