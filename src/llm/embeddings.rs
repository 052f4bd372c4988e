use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::error::Result;
use crate::retrieval::Embedder;
use crate::utils::safe_truncate;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty text")]
    EmptyText,

    #[error("Provider not implemented: {0}")]
    NotImplemented(String),
}

#[derive(Serialize)]
struct OllamaEmbeddingRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct OpenAiEmbeddingRequest {
    model: String,
    input: String,
}

#[derive(Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Deserialize)]
struct OpenAiEmbeddingData {
    embedding: Vec<f32>,
}

struct CacheEntry {
    embedding: Vec<f32>,
    created_at: Instant,
}

/// Exact-text memoization. Purely an optimization: the same description
/// recurs across symptoms constantly, and embeddings are deterministic for a
/// fixed model version, so a hit never changes a result.
struct EmbeddingCache {
    cache: RwLock<HashMap<String, CacheEntry>>,
    max_size: usize,
    ttl: Duration,
}

impl EmbeddingCache {
    fn new(max_size: usize, ttl_secs: u64) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            max_size,
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    fn get(&self, text: &str) -> Option<Vec<f32>> {
        let cache = self.cache.read();
        if let Some(entry) = cache.get(text) {
            if entry.created_at.elapsed() < self.ttl {
                return Some(entry.embedding.clone());
            }
        }
        None
    }

    fn set(&self, text: &str, embedding: Vec<f32>) {
        if self.max_size == 0 {
            return;
        }
        let mut cache = self.cache.write();
        if cache.len() >= self.max_size {
            // Evict the oldest entry to stay bounded.
            if let Some(oldest_key) = cache
                .iter()
                .min_by_key(|(_, v)| v.created_at)
                .map(|(k, _)| k.clone())
            {
                cache.remove(&oldest_key);
            }
        }
        cache.insert(
            text.to_string(),
            CacheEntry {
                embedding,
                created_at: Instant::now(),
            },
        );
    }

    fn len(&self) -> usize {
        self.cache.read().len()
    }
}

/// Wraps the external embedding model behind `embed(text) -> vector`.
/// Providers: `ollama` (local) and `openai`-compatible endpoints. The model
/// truncates/tokenizes internally; this side only ships raw text.
pub struct EmbeddingGenerator {
    provider: String,
    model: String,
    url: String,
    api_key: Option<String>,
    client: Client,
    cache: EmbeddingCache,
}

impl EmbeddingGenerator {
    pub fn new(
        provider: impl Into<String>,
        model: impl Into<String>,
        url: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
        cache_size: usize,
        cache_ttl_secs: u64,
    ) -> Self {
        let provider = provider.into().to_lowercase();
        let model = model.into();

        info!(
            "EmbeddingGenerator initialized: provider={}, model={}, cache={}",
            provider, model, cache_size
        );

        Self {
            provider,
            model,
            url: url.into(),
            api_key,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
            cache: EmbeddingCache::new(cache_size, cache_ttl_secs),
        }
    }

    pub async fn generate(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyText);
        }

        if let Some(cached) = self.cache.get(text) {
            debug!("Cache HIT for: {}...", safe_truncate(text, 50));
            return Ok(cached);
        }

        let embedding = match self.provider.as_str() {
            "ollama" => self.generate_ollama(text).await?,
            "openai" => self.generate_openai(text).await?,
            other => return Err(EmbeddingError::NotImplemented(other.to_string())),
        };

        self.cache.set(text, embedding.clone());
        Ok(embedding)
    }

    async fn generate_ollama(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
        let request = OllamaEmbeddingRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.url))
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(EmbeddingError::Http)?
            .json::<OllamaEmbeddingResponse>()
            .await?;

        Ok(response.embedding)
    }

    async fn generate_openai(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| EmbeddingError::InvalidResponse("API key required".to_string()))?;

        let request = OpenAiEmbeddingRequest {
            model: self.model.clone(),
            input: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.url.trim_end_matches('/')))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(EmbeddingError::Http)?
            .json::<OpenAiEmbeddingResponse>()
            .await?;

        response
            .data
            .first()
            .map(|d| d.embedding.clone())
            .ok_or_else(|| EmbeddingError::InvalidResponse("No embedding in response".to_string()))
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }
}

#[async_trait]
impl Embedder for EmbeddingGenerator {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.generate(text).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_roundtrip() {
        let cache = EmbeddingCache::new(10, 300);
        cache.set("cough", vec![0.1, 0.2]);
        assert_eq!(cache.get("cough"), Some(vec![0.1, 0.2]));
        assert_eq!(cache.get("fever"), None);
    }

    #[test]
    fn test_cache_stays_bounded() {
        let cache = EmbeddingCache::new(3, 300);
        for i in 0..10 {
            cache.set(&format!("text-{i}"), vec![i as f32]);
        }
        assert!(cache.len() <= 3);
    }

    #[test]
    fn test_cache_zero_capacity_holds_nothing() {
        let cache = EmbeddingCache::new(0, 300);
        cache.set("cough", vec![0.1]);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get("cough"), None);
    }

    #[test]
    fn test_cache_expired_entry_misses() {
        let cache = EmbeddingCache::new(10, 0);
        cache.set("cough", vec![0.1]);
        assert_eq!(cache.get("cough"), None);
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let generator =
            EmbeddingGenerator::new("ollama", "nomic-embed-text", "http://localhost:11434", None, 5, 10, 300);
        let result = generator.generate("   ").await;
        assert!(matches!(result, Err(EmbeddingError::EmptyText)));
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let generator =
            EmbeddingGenerator::new("clinicalbert-local", "m", "http://localhost", None, 5, 10, 300);
        let result = generator.generate("cough").await;
        assert!(matches!(result, Err(EmbeddingError::NotImplemented(_))));
    }
}
