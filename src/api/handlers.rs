//! API Handlers
//!
//! HTTP request handlers for each cache gateway endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::cache::CacheRepository;
use crate::config::Config;
use crate::error::Result;
use crate::logger::TracingLog;
use crate::models::{
    AddResponse, DeleteResponse, ErrorResponse, GetResponse, HealthResponse, SetResponse,
    WriteRequest,
};
use crate::serializer::JsonSerializer;

/// Application state shared across all handlers.
///
/// The repository needs no lock: it holds no mutable state of its own.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<CacheRepository<JsonSerializer>>,
}

impl AppState {
    pub fn new(repository: CacheRepository<JsonSerializer>) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Connects a repository from configuration, logging through `tracing`.
    pub async fn from_config(config: &Config) -> Self {
        let repository = CacheRepository::connect(
            &config.cache,
            JsonSerializer::new(),
            Arc::new(TracingLog::new()),
        )
        .await;
        Self::new(repository)
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<WriteRequest>,
) -> Result<Json<SetResponse>> {
    state.repository.set(&req.key, &req.value, req.ttl())?;
    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for POST /add
pub async fn add_handler(
    State(state): State<AppState>,
    Json(req): Json<WriteRequest>,
) -> Result<Json<AddResponse>> {
    let created = state.repository.add(&req.key, &req.value, req.ttl()).await?;
    Ok(Json(AddResponse::new(req.key, created)))
}

/// Handler for GET /get/:key
///
/// Misses, including reads from an inactive repository, answer 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    let value: Option<Value> = state.repository.try_get(&key).await?;

    let response = match value {
        Some(value) => Json(GetResponse::new(key, value)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Key not found: {}", key))),
        )
            .into_response(),
    };
    Ok(response)
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.repository.remove(&key)?;
    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let repository = &state.repository;
    Json(HealthResponse::new(
        repository.is_active(),
        repository.environment(),
        repository.functional_area(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheSettings;
    use crate::error::CacheError;
    use crate::store::MemoryConnector;
    use serde_json::json;

    async fn memory_state() -> AppState {
        let settings = CacheSettings::new("test", "handlers", "memory").unwrap();
        let repository = CacheRepository::connect_with(
            &MemoryConnector::new(),
            &settings,
            JsonSerializer::new(),
            Arc::new(TracingLog::new()),
        )
        .await;
        AppState::new(repository)
    }

    fn write(key: &str, value: Value) -> Json<WriteRequest> {
        Json(WriteRequest {
            key: key.to_string(),
            value,
            ttl: None,
        })
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = memory_state().await;

        let result = set_handler(State(state.clone()), write("test_key", json!("test_value"))).await;
        assert!(result.is_ok());

        let response = get_handler(State(state), Path("test_key".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = memory_state().await;

        let response = get_handler(State(state), Path("nonexistent".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_handler_reports_creation() {
        let state = memory_state().await;

        let first = add_handler(State(state.clone()), write("k", json!(1))).await.unwrap();
        let second = add_handler(State(state), write("k", json!(2))).await.unwrap();

        assert!(first.created);
        assert!(!second.created);
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = memory_state().await;

        set_handler(State(state.clone()), write("to_delete", json!("value")))
            .await
            .unwrap();

        let result = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(result.is_ok());

        let response = get_handler(State(state), Path("to_delete".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let state = memory_state().await;

        let response = health_handler(State(state)).await;
        assert_eq!(response.status, "healthy");
        assert!(response.active);
        assert_eq!(response.functional_area, "handlers");
    }

    #[tokio::test]
    async fn test_set_blank_key() {
        let state = memory_state().await;

        let result = set_handler(State(state), write(" ", json!("value"))).await;
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
    }
}
