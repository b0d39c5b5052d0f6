use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifierError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No recognized bank export format in {0}")]
    UnrecognizedFormat(String),

    #[error("Invalid filter file {path}: {source}")]
    Filters {
        path: String,
        source: serde_json::Error,
    },

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, VerifierError>;

/// A single export row that could not be turned into a transaction.
#[derive(Error, Debug, PartialEq)]
pub enum RowError {
    #[error("invalid date '{value}' in {record:?}")]
    InvalidDate { value: String, record: Vec<String> },

    #[error("invalid amount '{value}' in {record:?}")]
    InvalidAmount { value: String, record: Vec<String> },

    #[error("missing column {index} in {record:?}")]
    MissingColumn { index: usize, record: Vec<String> },
}
