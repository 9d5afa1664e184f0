/// Timeout for individual HTTP requests in tests.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Rows written into the fixture dataset.
pub const FIXTURE_DATASET_ROWS: usize = 12;
