use std::time::Duration;

use async_trait::async_trait;
use neo4rs::{query, Graph};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::error::Result;
use crate::retrieval::models::CandidateRow;
use crate::retrieval::ConceptGraph;
use crate::utils::safe_truncate_ellipsis;

const MAX_RETRIES: u32 = 3;

const INITIAL_RETRY_DELAY_MS: u64 = 100;

const MAX_RETRY_DELAY_MS: u64 = 10000;

#[derive(Debug, Error)]
pub enum GraphClientError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Query failed: {0}")]
    Query(String),
    #[error("Retry exhausted after {0} attempts: {1}")]
    RetryExhausted(u32, String),
}

/// Thin wrapper over the Bolt driver. Constructed once by the caller and
/// passed around explicitly; nothing here lives at module level.
pub struct GraphClient {
    graph: Graph,
    row_limit: i64,
}

impl GraphClient {
    pub async fn connect(
        uri: &str,
        user: &str,
        password: &str,
        row_limit: i64,
    ) -> std::result::Result<Self, GraphClientError> {
        let graph = Graph::new(uri, user, password)
            .await
            .map_err(|e| GraphClientError::Connection(e.to_string()))?;

        info!("GraphClient connected to {}", uri);

        Ok(Self { graph, row_limit })
    }

    /// Candidate rows for one symptom: every concept whose description
    /// contains the lower-cased symptom, expanded 1-2 relationship hops,
    /// capped at the configured row limit. Null neighbors come back as
    /// `related: None` and are the engine's to skip.
    pub async fn related_concepts(
        &self,
        symptom: &str,
    ) -> std::result::Result<Vec<CandidateRow>, GraphClientError> {
        let cypher = "
            MATCH (n:Concept)
            WHERE toLower(n.description) CONTAINS $symptom
            OPTIONAL MATCH (n)-[r*1..2]-(m:Concept)
            RETURN DISTINCT
                n.description AS anchor,
                m.description AS related,
                [rel IN r | type(rel)] AS path
            LIMIT $limit
        ";

        let mut last_error = None;
        let mut delay = Duration::from_millis(INITIAL_RETRY_DELAY_MS);

        for attempt in 1..=MAX_RETRIES {
            debug!(
                "Graph lookup for '{}' (attempt {})",
                safe_truncate_ellipsis(symptom, 50),
                attempt
            );

            let q = query(cypher)
                .param("symptom", symptom.to_lowercase())
                .param("limit", self.row_limit);

            match self.run_lookup(q).await {
                Ok(rows) => {
                    debug!("Graph lookup returned {} rows", rows.len());
                    return Ok(rows);
                }
                Err(e) => {
                    warn!("Graph lookup failed (attempt {}): {}", attempt, e);
                    last_error = Some(e.to_string());

                    if attempt < MAX_RETRIES {
                        tokio::time::sleep(delay).await;
                        delay = (delay * 2).min(Duration::from_millis(MAX_RETRY_DELAY_MS));
                    }
                }
            }
        }

        Err(GraphClientError::RetryExhausted(
            MAX_RETRIES,
            last_error.unwrap_or_else(|| "Unknown error".to_string()),
        ))
    }

    async fn run_lookup(
        &self,
        q: neo4rs::Query,
    ) -> std::result::Result<Vec<CandidateRow>, GraphClientError> {
        let mut stream = self
            .graph
            .execute(q)
            .await
            .map_err(|e| GraphClientError::Query(e.to_string()))?;

        let mut rows = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| GraphClientError::Query(e.to_string()))?
        {
            let Ok(anchor) = row.get::<String>("anchor") else {
                // A match without a description is garbage data; drop it.
                continue;
            };
            rows.push(CandidateRow {
                anchor,
                related: row.get::<String>("related").ok(),
                path: row.get::<Vec<String>>("path").unwrap_or_default(),
            });
        }

        Ok(rows)
    }

    /// Cheap connectivity probe for the healthcheck endpoint.
    pub async fn health_check(&self) -> std::result::Result<(), GraphClientError> {
        let mut stream = self
            .graph
            .execute(query("RETURN 1 AS ok"))
            .await
            .map_err(|e| GraphClientError::Connection(e.to_string()))?;
        stream
            .next()
            .await
            .map_err(|e| GraphClientError::Connection(e.to_string()))?;
        Ok(())
    }

    pub fn inner(&self) -> &Graph {
        &self.graph
    }
}

#[async_trait]
impl ConceptGraph for GraphClient {
    async fn related_concepts(&self, symptom: &str) -> Result<Vec<CandidateRow>> {
        Ok(GraphClient::related_concepts(self, symptom).await?)
    }
}
