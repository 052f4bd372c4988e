use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::{error, info};

use crate::core::error::MedRagError;
use crate::db::GraphClient;
use crate::llm::composer::ResponseComposer;
use crate::retrieval::engine::RetrievalEngine;

use super::models::{ErrorBody, QueryRequest, QueryResponse};

/// Shared handler state. Built once at startup and cloned per request via
/// `Arc`; collaborators carry their own connections.
pub struct AppState {
    pub engine: RetrievalEngine,
    pub composer: ResponseComposer,
    pub graph: Arc<GraphClient>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .route("/query", post(handle_query))
        .with_state(state)
}

async fn healthcheck(State(state): State<Arc<AppState>>) -> Response {
    match state.graph.health_check().await {
        Ok(()) => Json(json!({ "status": "API is running" })).into_response(),
        Err(e) => {
            error!("Healthcheck failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorBody { error: format!("Graph unreachable: {e}") }),
            )
                .into_response()
        }
    }
}

async fn handle_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Response {
    let ranked = match state.engine.retrieve(&request.symptoms).await {
        Ok(ranked) => ranked,
        Err(e) => return error_response(e),
    };

    if ranked.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorBody { error: "No relevant diseases found.".to_string() }),
        )
            .into_response();
    }

    let response = match state.composer.compose(&ranked).await {
        Ok(response) => response,
        Err(e) => return error_response(e),
    };

    info!("Query answered with {} conditions", ranked.len());
    Json(QueryResponse { response, conditions: ranked }).into_response()
}

/// One place for the error taxonomy -> HTTP status mapping.
pub fn status_for(error: &MedRagError) -> StatusCode {
    match error {
        MedRagError::NoSymptomsProvided => StatusCode::UNPROCESSABLE_ENTITY,
        MedRagError::GraphUnavailable(_) | MedRagError::EmbeddingUnavailable(_) => {
            StatusCode::BAD_GATEWAY
        }
        MedRagError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: MedRagError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        error!("Query failed: {}", error);
    }
    (status, Json(ErrorBody { error: error.to_string() })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_symptoms_maps_to_client_error() {
        assert_eq!(
            status_for(&MedRagError::NoSymptomsProvided),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_collaborator_failures_map_to_bad_gateway() {
        assert_eq!(
            status_for(&MedRagError::GraphUnavailable("down".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&MedRagError::EmbeddingUnavailable("down".to_string())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        assert_eq!(status_for(&MedRagError::Timeout(120)), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_internal_errors_map_to_500() {
        assert_eq!(
            status_for(&MedRagError::DimensionMismatch { left: 2, right: 3 }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
