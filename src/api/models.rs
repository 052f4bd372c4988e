use serde::{Deserialize, Serialize};

use crate::retrieval::models::ScoredCandidate;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub symptoms: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    /// Composed natural-language answer.
    pub response: String,
    /// The ranked concepts the answer was grounded on.
    pub conditions: Vec<ScoredCandidate>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
