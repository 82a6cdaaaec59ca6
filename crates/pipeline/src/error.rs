//! Error types for the pipeline crate.

use thiserror::Error;

/// Errors raised while building the similarity index.
///
/// Both are fatal for startup: no recommender is constructed.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IndexBuildError {
    /// No term survived tokenization and stop-word removal
    #[error("Empty vocabulary: {documents} documents produced no usable terms")]
    EmptyVocabulary { documents: usize },

    /// Feature vectors passed to the matrix builder disagree on dimension
    #[error("Feature vector {row} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, IndexBuildError>;
