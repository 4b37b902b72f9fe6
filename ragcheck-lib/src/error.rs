//! Error types for ragcheck

use thiserror::Error;

/// Result type alias for ragcheck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ragcheck operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Failed to load or run the embedding model
    #[error("embedding error: {0}")]
    Embedding(String),

    /// The answer extractor failed or produced an unusable answer
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Retrieval was attempted against a store with no passages
    #[error("knowledge store is empty")]
    EmptyStore,

    /// Two vectors that must be compared have different lengths
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A suite file could not be parsed or failed validation
    #[error("suite error: {0}")]
    Suite(String),

    /// Invalid input provided
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
