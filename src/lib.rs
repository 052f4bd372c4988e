//! Symptom-to-disease semantic retrieval over a medical knowledge graph.
//!
//! Given a list of symptom phrases, `medrag` queries a Neo4j knowledge graph
//! for textually related concepts, scores every candidate against the symptom
//! via embedding cosine similarity, keeps a bounded top-K per symptom, and
//! folds everything into a deduplicated, capacity-bounded global ranking.

pub mod api;
pub mod core;
pub mod db;
pub mod llm;
pub mod retrieval;
pub mod utils;

pub use crate::core::config::MedRagConfig;
pub use crate::core::error::{MedRagError, Result};
pub use crate::db::{GraphClient, GraphClientError};
pub use crate::llm::composer::ResponseComposer;
pub use crate::llm::embeddings::EmbeddingGenerator;
pub use crate::retrieval::engine::RetrievalEngine;
pub use crate::retrieval::models::{CandidateRow, ScoredCandidate};
pub use crate::utils::{safe_truncate, safe_truncate_ellipsis};

pub const DEFAULT_NEO4J_URI: &str = "bolt://localhost:7687";

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

pub const DEFAULT_LLM_MODEL: &str = "gpt-3.5-turbo";

/// Candidates kept per symptom before the global fold.
pub const DEFAULT_PER_SYMPTOM_K: usize = 3;

/// Distinct concepts in the final result.
pub const DEFAULT_GLOBAL_N: usize = 5;

/// Row cap handed to the graph query.
pub const DEFAULT_GRAPH_ROW_LIMIT: i64 = 100;

pub const DEFAULT_CACHE_SIZE: usize = 1000;

pub const DEFAULT_CACHE_TTL: u64 = 300;
