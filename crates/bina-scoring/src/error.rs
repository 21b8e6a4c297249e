use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Invalid features: {0}")]
    InvalidFeatures(String),

    #[error("Shape mismatch: expected {expected} inputs, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("Training failed: {0}")]
    Training(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
