use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use medrag::api::{router, AppState};
use medrag::llm::factory::{EmbeddingProviderFactory, LlmProviderFactory};
use medrag::{GraphClient, MedRagConfig, ResponseComposer, RetrievalEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("medrag=info".parse()?),
        )
        .init();

    let config = MedRagConfig::from_env();

    let graph = Arc::new(
        GraphClient::connect(
            &config.neo4j_uri,
            &config.neo4j_user,
            &config.neo4j_password,
            config.graph_row_limit,
        )
        .await?,
    );
    graph.health_check().await?;

    let embedder = Arc::new(EmbeddingProviderFactory::from_config(&config));
    let llm = LlmProviderFactory::create(&config)?;

    let engine = RetrievalEngine::new(
        graph.clone(),
        embedder,
        config.per_symptom_k,
        config.global_n,
        config.retrieval_timeout_secs,
    );
    let composer = ResponseComposer::new(llm);

    let state = Arc::new(AppState { engine, composer, graph });
    let addr = config.api_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("medrag listening on {}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
