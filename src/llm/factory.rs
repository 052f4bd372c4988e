use std::sync::Arc;

use crate::core::config::MedRagConfig;
use crate::core::error::{MedRagError, Result};

use super::embeddings::EmbeddingGenerator;
use super::providers::{LlmProvider, OllamaProvider, OpenAiProvider};

pub struct LlmProviderFactory;

impl LlmProviderFactory {
    pub fn create(config: &MedRagConfig) -> Result<Arc<dyn LlmProvider>> {
        match config.llm_provider.as_str() {
            "openai" => Ok(Arc::new(OpenAiProvider::new(
                config.llm_api_key.clone().unwrap_or_default(),
                config.llm_model.clone(),
                config.llm_temperature,
                config.llm_base_url.clone(),
            ))),
            "ollama" => Ok(Arc::new(OllamaProvider::new(
                config
                    .llm_base_url
                    .clone()
                    .unwrap_or_else(|| crate::DEFAULT_OLLAMA_URL.to_string()),
                config.llm_model.clone(),
                config.llm_temperature,
            ))),
            other => Err(MedRagError::Config(format!(
                "Unknown LLM provider: {other}. Supported: openai, ollama"
            ))),
        }
    }
}

pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    pub fn from_config(config: &MedRagConfig) -> EmbeddingGenerator {
        EmbeddingGenerator::new(
            config.embedding_provider.clone(),
            config.embedding_model.clone(),
            config.embedding_url.clone(),
            config.embedding_api_key.clone(),
            config.embedding_timeout_secs,
            config.embedding_cache_size,
            config.embedding_cache_ttl_secs,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_llm_provider_is_config_error() {
        let mut config = MedRagConfig::default();
        config.llm_provider = "anthropic".to_string();
        assert!(matches!(
            LlmProviderFactory::create(&config),
            Err(MedRagError::Config(_))
        ));
    }

    #[test]
    fn test_embedding_generator_from_config() {
        let config = MedRagConfig::default();
        let generator = EmbeddingProviderFactory::from_config(&config);
        assert_eq!(generator.provider(), "ollama");
        assert_eq!(generator.model(), crate::DEFAULT_EMBEDDING_MODEL);
    }
}
