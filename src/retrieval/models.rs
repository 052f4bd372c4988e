use serde::{Deserialize, Serialize};

/// One row from the knowledge graph for a symptom lookup. `related` may be
/// absent when the anchor node matched but had no neighbor within range, or
/// when the neighbor carries no text; such rows never become candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRow {
    pub anchor: String,
    pub related: Option<String>,
    /// Relationship-type chain between anchor and related node.
    /// Informational only; ranking ignores it.
    #[serde(default)]
    pub path: Vec<String>,
}

/// A candidate concept with its similarity score against one symptom.
/// The description text is the deduplication key across symptoms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub score: f64,
    pub description: String,
}

impl ScoredCandidate {
    pub fn new(score: f64, description: impl Into<String>) -> Self {
        Self { score, description: description.into() }
    }
}
