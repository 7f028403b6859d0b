//! Error types for Vigil

use thiserror::Error;

/// Vigil error type
#[derive(Error, Debug)]
pub enum VigilError {
    /// Text sample exceeds the accepted byte bound
    #[error("text sample too large: {size} bytes (limit {limit})")]
    InputTooLarge {
        /// Size of the rejected sample in bytes
        size: usize,
        /// Maximum accepted size in bytes
        limit: usize,
    },

    /// Model artifact could not be read or decoded
    #[error("model artifact error: {0}")]
    Artifact(String),

    /// Persistence collaborator rejected an alert
    #[error("alert sink error: {0}")]
    Sink(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Vigil
pub type VigilResult<T> = Result<T, VigilError>;
