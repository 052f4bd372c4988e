use thiserror::Error;

use crate::db::GraphClientError;
use crate::llm::embeddings::EmbeddingError;
use crate::llm::providers::LlmProviderError;

/// Crate-level error taxonomy. One retrieval call either returns a full
/// ranked result or fails as a whole with one of these; there is no
/// partial-success mode.
#[derive(Error, Debug)]
pub enum MedRagError {
    #[error("No symptoms provided")]
    NoSymptomsProvided,

    #[error("Knowledge graph unavailable: {0}")]
    GraphUnavailable(String),

    #[error("Embedding provider unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Embedding dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Retrieval timed out after {0}s")]
    Timeout(u64),

    #[error("Response composition failed: {0}")]
    Composer(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<GraphClientError> for MedRagError {
    fn from(e: GraphClientError) -> Self {
        MedRagError::GraphUnavailable(e.to_string())
    }
}

impl From<EmbeddingError> for MedRagError {
    fn from(e: EmbeddingError) -> Self {
        MedRagError::EmbeddingUnavailable(e.to_string())
    }
}

impl From<LlmProviderError> for MedRagError {
    fn from(e: LlmProviderError) -> Self {
        MedRagError::Composer(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MedRagError>;
