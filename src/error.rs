use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Config file not found")]
    NotFound,

    #[error("Error loading the CSV file {0:?}: {1}")]
    Load(std::path::PathBuf, #[source] csv::Error),

    #[error("Column `{0}` not found. Available columns: {1}")]
    MissingColumn(String, String),

    #[error("IO Error: {1}")]
    IoError(#[source] std::io::Error, String),

    #[error("Cannot set extension {1} on path {0:?}")]
    PathCreateError(std::path::PathBuf, String),

    #[error("Invalid padding: {0} (must be in [0, 1))")]
    InvalidPadding(f64),

    #[error("Invalid config file {0:?}")]
    Config(std::path::PathBuf, #[source] serde_json::Error),

    #[error("Invalid delimiter {0:?}: must be a single ASCII character")]
    InvalidDelimiter(char),
}

impl ChartError {
    pub fn io_err(error: std::io::Error, context: impl Into<String>) -> Self {
        ChartError::IoError(error, context.into())
    }

    /// Whether the error happened while bringing the dataset in
    pub fn is_load_failure(&self) -> bool {
        matches!(self, ChartError::Load(..) | ChartError::MissingColumn(..))
    }
}

/// A numeric field that could not be read as a number
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("row {row}: column `{column}` has non-numeric value {value:?}")]
pub struct CoercionError {
    pub row: usize,
    pub column: String,
    pub value: String,
}
