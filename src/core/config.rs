use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_CACHE_SIZE, DEFAULT_CACHE_TTL, DEFAULT_EMBEDDING_MODEL, DEFAULT_GLOBAL_N,
    DEFAULT_GRAPH_ROW_LIMIT, DEFAULT_LLM_MODEL, DEFAULT_NEO4J_URI, DEFAULT_OLLAMA_URL,
    DEFAULT_PER_SYMPTOM_K,
};

/// Everything tunable in one place. The engine itself never hardcodes
/// capacities or endpoints; callers build one of these and pass it down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedRagConfig {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub graph_row_limit: i64,

    pub per_symptom_k: usize,
    pub global_n: usize,
    pub retrieval_timeout_secs: u64,

    pub embedding_provider: String,
    pub embedding_model: String,
    pub embedding_url: String,
    pub embedding_api_key: Option<String>,
    pub embedding_timeout_secs: u64,
    pub embedding_cache_size: usize,
    pub embedding_cache_ttl_secs: u64,

    pub llm_provider: String,
    pub llm_model: String,
    pub llm_api_key: Option<String>,
    pub llm_base_url: Option<String>,
    pub llm_temperature: f64,

    pub api_host: String,
    pub api_port: u16,
}

impl MedRagConfig {
    pub fn new(neo4j_uri: &str, neo4j_user: &str, neo4j_password: &str) -> Self {
        Self {
            neo4j_uri: neo4j_uri.to_string(),
            neo4j_user: neo4j_user.to_string(),
            neo4j_password: neo4j_password.to_string(),
            graph_row_limit: DEFAULT_GRAPH_ROW_LIMIT,

            per_symptom_k: DEFAULT_PER_SYMPTOM_K,
            global_n: DEFAULT_GLOBAL_N,
            retrieval_timeout_secs: 120,

            embedding_provider: "ollama".to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_url: DEFAULT_OLLAMA_URL.to_string(),
            embedding_api_key: None,
            embedding_timeout_secs: 30,
            embedding_cache_size: DEFAULT_CACHE_SIZE,
            embedding_cache_ttl_secs: DEFAULT_CACHE_TTL,

            llm_provider: "openai".to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_api_key: None,
            llm_base_url: None,
            llm_temperature: 0.3,

            api_host: "127.0.0.1".to_string(),
            api_port: 8000,
        }
    }

    /// Build a config from `MEDRAG_*` environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::new(
            &std::env::var("MEDRAG_NEO4J_URI").unwrap_or_else(|_| DEFAULT_NEO4J_URI.to_string()),
            &std::env::var("MEDRAG_NEO4J_USER").unwrap_or_else(|_| "neo4j".to_string()),
            &std::env::var("MEDRAG_NEO4J_PASSWORD").unwrap_or_default(),
        );

        if let Ok(limit) = std::env::var("MEDRAG_GRAPH_ROW_LIMIT") {
            if let Ok(limit) = limit.parse() {
                config.graph_row_limit = limit;
            }
        }
        if let Ok(k) = std::env::var("MEDRAG_PER_SYMPTOM_K") {
            if let Ok(k) = k.parse() {
                config.per_symptom_k = k;
            }
        }
        if let Ok(n) = std::env::var("MEDRAG_GLOBAL_N") {
            if let Ok(n) = n.parse() {
                config.global_n = n;
            }
        }
        if let Ok(secs) = std::env::var("MEDRAG_RETRIEVAL_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.retrieval_timeout_secs = secs;
            }
        }
        if let Ok(provider) = std::env::var("MEDRAG_EMBEDDING_PROVIDER") {
            config.embedding_provider = provider;
        }
        if let Ok(model) = std::env::var("MEDRAG_EMBEDDING_MODEL") {
            config.embedding_model = model;
        }
        if let Ok(url) = std::env::var("MEDRAG_EMBEDDING_URL") {
            config.embedding_url = url;
        }
        if let Ok(key) = std::env::var("MEDRAG_EMBEDDING_API_KEY") {
            config.embedding_api_key = Some(key);
        }
        if let Ok(provider) = std::env::var("MEDRAG_LLM_PROVIDER") {
            config.llm_provider = provider;
        }
        if let Ok(model) = std::env::var("MEDRAG_LLM_MODEL") {
            config.llm_model = model;
        }
        if let Ok(key) = std::env::var("MEDRAG_LLM_API_KEY") {
            config.llm_api_key = Some(key);
        }
        if let Ok(url) = std::env::var("MEDRAG_LLM_BASE_URL") {
            config.llm_base_url = Some(url);
        }
        if let Ok(host) = std::env::var("MEDRAG_API_HOST") {
            config.api_host = host;
        }
        if let Ok(port) = std::env::var("MEDRAG_API_PORT") {
            if let Ok(port) = port.parse() {
                config.api_port = port;
            }
        }

        config
    }

    pub fn api_addr(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

impl Default for MedRagConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NEO4J_URI, "neo4j", "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacities() {
        let config = MedRagConfig::default();
        assert_eq!(config.per_symptom_k, 3);
        assert_eq!(config.global_n, 5);
        assert_eq!(config.graph_row_limit, 100);
    }

    #[test]
    fn test_api_addr() {
        let mut config = MedRagConfig::default();
        config.api_host = "0.0.0.0".to_string();
        config.api_port = 9000;
        assert_eq!(config.api_addr(), "0.0.0.0:9000");
    }
}
