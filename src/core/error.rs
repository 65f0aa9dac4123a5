//! Error types for kernel regression

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IokrError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid sketch: {0}")]
    InvalidSketch(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("Singular system: {0}")]
    SingularSystem(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, IokrError>;
