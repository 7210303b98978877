//! Error types for the trait engine.

use thiserror::Error;

/// Result type alias using the crate error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for loading, training and prediction.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Dataset header lacks a required column
    #[error("CSV missing required column: {0}")]
    MissingColumn(String),

    /// Dataset has no records
    #[error("No data found in dataset")]
    EmptyDataset,

    /// A label cell is not 0 or 1
    #[error("Invalid label {value:?} in column '{column}' at row {row}")]
    InvalidLabel {
        row: usize,
        column: String,
        value: String,
    },

    /// A word-list resource could not be loaded
    #[error("Resource error ({path}): {reason}")]
    Resource { path: String, reason: String },

    /// Bundle content is inconsistent (dimensions, missing heads, ...)
    #[error("Corrupt model bundle: {0}")]
    CorruptBundle(String),

    /// Bundle written by an unsupported format version
    #[error("Incompatible model bundle: format version {found}, expected {expected}")]
    IncompatibleBundle { found: u32, expected: u32 },

    /// Invalid input to a fitting or transform call
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
