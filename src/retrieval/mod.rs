pub mod aggregator;
pub mod engine;
pub mod models;
pub mod similarity;
pub mod topk;

use async_trait::async_trait;

use crate::core::error::Result;

pub use aggregator::GlobalAggregator;
pub use engine::RetrievalEngine;
pub use models::{CandidateRow, ScoredCandidate};
pub use topk::TopKSelector;

/// Source of candidate concepts for one symptom. Implemented by the Neo4j
/// client; test doubles implement it with canned rows.
#[async_trait]
pub trait ConceptGraph: Send + Sync {
    async fn related_concepts(&self, symptom: &str) -> Result<Vec<CandidateRow>>;
}

/// Text encoder. Deterministic for a fixed model version; the engine only
/// relies on "similar texts embed closer".
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
