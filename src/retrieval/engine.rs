use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::core::error::{MedRagError, Result};
use crate::utils::safe_truncate_ellipsis;

use super::aggregator::GlobalAggregator;
use super::models::ScoredCandidate;
use super::similarity::cosine_similarity;
use super::topk::TopKSelector;
use super::{ConceptGraph, Embedder};

/// Orchestrates one retrieval round: per symptom, embed the symptom, pull
/// candidate rows from the graph, score each usable related description, keep
/// the top K, then fold every per-symptom list into one global ranking of at
/// most N distinct concepts.
///
/// Collaborators are injected; the engine owns no connections and keeps no
/// state between calls. A failure on any symptom aborts the whole call, so a
/// caller either gets the complete ranking or an error, never a partial one.
pub struct RetrievalEngine {
    graph: Arc<dyn ConceptGraph>,
    embedder: Arc<dyn Embedder>,
    per_symptom_k: usize,
    global_n: usize,
    timeout_secs: u64,
}

impl RetrievalEngine {
    pub fn new(
        graph: Arc<dyn ConceptGraph>,
        embedder: Arc<dyn Embedder>,
        per_symptom_k: usize,
        global_n: usize,
        timeout_secs: u64,
    ) -> Self {
        Self { graph, embedder, per_symptom_k, global_n, timeout_secs }
    }

    /// Rank the distinct concepts most related to the symptom set overall.
    /// Fails with `NoSymptomsProvided` on an empty list before any
    /// collaborator is touched, and with `Timeout` if the whole round
    /// exceeds the configured budget.
    pub async fn retrieve(&self, symptoms: &[String]) -> Result<Vec<ScoredCandidate>> {
        if symptoms.is_empty() {
            return Err(MedRagError::NoSymptomsProvided);
        }

        let budget = Duration::from_secs(self.timeout_secs);
        match tokio::time::timeout(budget, self.retrieve_inner(symptoms)).await {
            Ok(result) => result,
            Err(_) => Err(MedRagError::Timeout(self.timeout_secs)),
        }
    }

    async fn retrieve_inner(&self, symptoms: &[String]) -> Result<Vec<ScoredCandidate>> {
        let mut global = GlobalAggregator::new(self.global_n);

        for symptom in symptoms {
            let symptom_vec = self.embedder.embed(symptom).await?;
            let rows = self.graph.related_concepts(symptom).await?;
            debug!(
                "Symptom '{}': {} candidate rows",
                safe_truncate_ellipsis(symptom, 50),
                rows.len()
            );

            let mut local = TopKSelector::new(self.per_symptom_k);

            for row in rows {
                // Nodes without a textual neighbor are legitimate graph
                // output, not errors; they just never become candidates.
                let Some(related) = row.related else { continue };
                if related.is_empty() {
                    continue;
                }

                let related_vec = self.embedder.embed(&related).await?;
                let score = cosine_similarity(&symptom_vec, &related_vec)?;
                local.offer(ScoredCandidate::new(score, related));
            }

            for candidate in local.drain() {
                global.fold(candidate);
            }
        }

        let results = global.results();
        info!("Retrieval done: {} symptoms -> {} concepts", symptoms.len(), results.len());
        Ok(results)
    }
}
