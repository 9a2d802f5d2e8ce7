use std::path::Path;

use thiserror::Error;

use crate::filtering::types::{ItemId, UserId};

/// Fatal problems with one of the input tables. A run never continues
/// with a partially loaded dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed row in {source_name} at line {line}: {reason}")]
    MalformedRow {
        source_name: String,
        line: u64,
        reason: String,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum SimilarityError {
    /// One of the vectors has zero norm, so the cosine is not defined.
    #[error("Similarity is undefined for a zero-norm rating vector")]
    UndefinedSimilarity,
}

#[derive(Debug, Error, PartialEq)]
pub enum EvaluationError {
    #[error("No predictions to evaluate")]
    NoPredictions,

    #[error("Prediction for user {user}, item {item} has no matching test rating")]
    MissingTestRating { user: UserId, item: ItemId },
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Number of neighbors (k) must be at least 1")]
    InvalidK,
}

/// Add context to load errors
pub fn load_context(table: &str, path: &Path) -> String {
    format!("Failed to load {} from {}", table, path.display())
}

/// Add context to report export errors
pub fn export_context(path: &Path) -> String {
    format!("Failed to write report to {}", path.display())
}
