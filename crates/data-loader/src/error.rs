//! Error types for the data-loader crate.
//!
//! Two kinds of failure live here:
//! - `DataLoadError` is fatal. The catalog cannot be built and no recommender
//!   is constructed.
//! - `FeatureExtractionError` is local to one structured field of one movie.
//!   Callers degrade it to an empty list and keep the movie.

use thiserror::Error;

/// Errors that can occur while loading and merging the TMDB tables
///
/// The `#[derive(Error)]` macro from thiserror implements `std::error::Error`
/// and `Display` from the `#[error(...)]` attributes
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected the file (bad quoting, ragged rows, bad header)
    #[error("CSV error in {file}: {source}")]
    CsvError {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A record could be read but one of its fields had the wrong shape
    ///
    /// `line` is the 1-based line in the source file, header included
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: u64,
        reason: String,
    },

    /// A required column is missing from the header row
    #[error("Missing column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// A structured field (genres, keywords, cast, crew) could not be decoded.
///
/// Never fatal: see `parser::extract_or_empty`.
#[derive(Error, Debug)]
pub enum FeatureExtractionError {
    #[error("{field} is not a valid JSON list: {source}")]
    Malformed {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
