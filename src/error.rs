use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while fetching, splitting or exporting a dataset.
#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("dataset {id} not found: {message}")]
    DatasetNotFound { id: u32, message: String },

    #[error("dataset {id} is not available for import")]
    DatasetUnavailable { id: u32 },

    #[error("schema mismatch: {0}")]
    Schema(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("features have {features} rows but targets have {targets}")]
    RowCountMismatch { features: usize, targets: usize },

    #[error("invalid test size {test_size} for {n_rows} rows")]
    InvalidTestSize { test_size: String, n_rows: usize },

    #[error("column `{name}` has {actual} rows, expected {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}
