pub mod composer;
pub mod embeddings;
pub mod factory;
pub mod providers;

pub use composer::ResponseComposer;
pub use embeddings::EmbeddingGenerator;
pub use factory::LlmProviderFactory;
