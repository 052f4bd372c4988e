use std::path::Path;

use neo4rs::query;
use thiserror::Error;
use tracing::{info, warn};

use super::client::GraphClient;

const BATCH_SIZE: usize = 1000;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error reading {0}: {1}")]
    Io(String, std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
}

/// One concept row from the ontology release files (tab-separated).
#[derive(Debug, Clone)]
pub struct ConceptRecord {
    pub id: String,
    pub active: bool,
}

/// One description row: the human-readable term attached to a concept.
#[derive(Debug, Clone)]
pub struct DescriptionRecord {
    pub concept_id: String,
    pub term: String,
    pub active: bool,
}

/// One relationship row between two concepts.
#[derive(Debug, Clone)]
pub struct RelationshipRecord {
    pub source_id: String,
    pub destination_id: String,
    pub type_id: String,
    pub active: bool,
}

/// Loads SNOMED-style release files into the graph: concepts first, then
/// their description terms, then typed relationship edges, in batched
/// transactions. Inactive rows are dropped at parse time.
pub struct GraphIngestor {
    client: GraphClient,
}

impl GraphIngestor {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    pub async fn create_indexes(&self) -> Result<(), IngestError> {
        let statements = [
            "CREATE INDEX concept_id IF NOT EXISTS FOR (n:Concept) ON (n.id)",
            "CREATE INDEX concept_description IF NOT EXISTS FOR (n:Concept) ON (n.description)",
        ];
        for statement in statements {
            self.client
                .inner()
                .run(query(statement))
                .await
                .map_err(|e| IngestError::Database(e.to_string()))?;
        }
        info!("Graph indexes ensured");
        Ok(())
    }

    pub async fn load_concepts(&self, concepts: &[ConceptRecord]) -> Result<usize, IngestError> {
        let mut loaded = 0;
        for (batch_no, batch) in concepts.chunks(BATCH_SIZE).enumerate() {
            info!(
                "Loading concept batch {} of {}",
                batch_no + 1,
                concepts.len().div_ceil(BATCH_SIZE)
            );

            let queries: Vec<neo4rs::Query> = batch
                .iter()
                .map(|record| query("MERGE (:Concept {id: $id})").param("id", record.id.as_str()))
                .collect();

            let mut txn = self
                .client
                .inner()
                .start_txn()
                .await
                .map_err(|e| IngestError::Database(e.to_string()))?;
            txn.run_queries(queries)
                .await
                .map_err(|e| IngestError::Database(e.to_string()))?;
            txn.commit()
                .await
                .map_err(|e| IngestError::Database(e.to_string()))?;
            loaded += batch.len();
        }
        info!("Loaded {} concepts", loaded);
        Ok(loaded)
    }

    pub async fn load_descriptions(
        &self,
        descriptions: &[DescriptionRecord],
    ) -> Result<usize, IngestError> {
        let mut loaded = 0;
        for (batch_no, batch) in descriptions.chunks(BATCH_SIZE).enumerate() {
            info!(
                "Loading description batch {} of {}",
                batch_no + 1,
                descriptions.len().div_ceil(BATCH_SIZE)
            );

            let queries: Vec<neo4rs::Query> = batch
                .iter()
                .map(|record| {
                    query(
                        "MATCH (n:Concept {id: $concept_id})
                         SET n.description = $term",
                    )
                    .param("concept_id", record.concept_id.as_str())
                    .param("term", record.term.as_str())
                })
                .collect();

            let mut txn = self
                .client
                .inner()
                .start_txn()
                .await
                .map_err(|e| IngestError::Database(e.to_string()))?;
            txn.run_queries(queries)
                .await
                .map_err(|e| IngestError::Database(e.to_string()))?;
            txn.commit()
                .await
                .map_err(|e| IngestError::Database(e.to_string()))?;
            loaded += batch.len();
        }
        info!("Loaded {} descriptions", loaded);
        Ok(loaded)
    }

    pub async fn load_relationships(
        &self,
        relationships: &[RelationshipRecord],
    ) -> Result<usize, IngestError> {
        let mut loaded = 0;
        for (batch_no, batch) in relationships.chunks(BATCH_SIZE).enumerate() {
            info!(
                "Loading relationship batch {} of {}",
                batch_no + 1,
                relationships.len().div_ceil(BATCH_SIZE)
            );

            let queries: Vec<neo4rs::Query> = batch
                .iter()
                .map(|record| {
                    query(
                        "MATCH (a:Concept {id: $source}), (b:Concept {id: $destination})
                         MERGE (a)-[:RELATED {type_id: $type_id}]->(b)",
                    )
                    .param("source", record.source_id.as_str())
                    .param("destination", record.destination_id.as_str())
                    .param("type_id", record.type_id.as_str())
                })
                .collect();

            let mut txn = self
                .client
                .inner()
                .start_txn()
                .await
                .map_err(|e| IngestError::Database(e.to_string()))?;
            txn.run_queries(queries)
                .await
                .map_err(|e| IngestError::Database(e.to_string()))?;
            txn.commit()
                .await
                .map_err(|e| IngestError::Database(e.to_string()))?;
            loaded += batch.len();
        }
        info!("Loaded {} relationships", loaded);
        Ok(loaded)
    }
}

/// Parse a release concepts file: tab-separated, header row,
/// `id ... active ...` columns.
pub fn parse_concepts(path: &Path) -> Result<Vec<ConceptRecord>, IngestError> {
    let content = read(path)?;
    let mut records = Vec::new();
    for line in content.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 3 {
            warn!("Skipping malformed concept line: {}", line);
            continue;
        }
        let active = fields[2] == "1";
        if !active {
            continue;
        }
        records.push(ConceptRecord { id: fields[0].to_string(), active });
    }
    Ok(records)
}

/// Parse a descriptions file: `id effectiveTime active moduleId conceptId
/// languageCode typeId term ...`.
pub fn parse_descriptions(path: &Path) -> Result<Vec<DescriptionRecord>, IngestError> {
    let content = read(path)?;
    let mut records = Vec::new();
    for line in content.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 8 {
            warn!("Skipping malformed description line: {}", line);
            continue;
        }
        let active = fields[2] == "1";
        if !active {
            continue;
        }
        records.push(DescriptionRecord {
            concept_id: fields[4].to_string(),
            term: fields[7].to_string(),
            active,
        });
    }
    Ok(records)
}

/// Parse a relationships file: `id effectiveTime active moduleId sourceId
/// destinationId relationshipGroup typeId ...`.
pub fn parse_relationships(path: &Path) -> Result<Vec<RelationshipRecord>, IngestError> {
    let content = read(path)?;
    let mut records = Vec::new();
    for line in content.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 8 {
            warn!("Skipping malformed relationship line: {}", line);
            continue;
        }
        let active = fields[2] == "1";
        if !active {
            continue;
        }
        records.push(RelationshipRecord {
            source_id: fields[4].to_string(),
            destination_id: fields[5].to_string(),
            type_id: fields[7].to_string(),
            active,
        });
    }
    Ok(records)
}

fn read(path: &Path) -> Result<String, IngestError> {
    std::fs::read_to_string(path)
        .map_err(|e| IngestError::Io(path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_concepts_skips_inactive() {
        let path = write_temp(
            "medrag_test_concepts.txt",
            "id\teffectiveTime\tactive\n100\t20240101\t1\n200\t20240101\t0\n",
        );
        let records = parse_concepts(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "100");
    }

    #[test]
    fn test_parse_descriptions_extracts_term() {
        let path = write_temp(
            "medrag_test_descriptions.txt",
            "id\ttime\tactive\tmodule\tconceptId\tlang\ttype\tterm\n\
             1\t20240101\t1\tm\t100\ten\tt\tCommon cold\n",
        );
        let records = parse_descriptions(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].concept_id, "100");
        assert_eq!(records[0].term, "Common cold");
    }

    #[test]
    fn test_parse_relationships_skips_short_lines() {
        let path = write_temp(
            "medrag_test_relationships.txt",
            "id\ttime\tactive\tmodule\tsource\tdest\tgroup\ttype\n\
             1\t20240101\t1\tm\t100\t200\t0\t116680003\nbroken\tline\n",
        );
        let records = parse_relationships(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_id, "100");
        assert_eq!(records[0].destination_id, "200");
    }
}
