//! HTTP routes.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use hrpulse_core::error::AssistantError;
use hrpulse_core::query::{ChatQuery, Role};
use hrpulse_core::response::ChatResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ServerError;
use crate::state::AppState;

/// Builds the router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Authenticated user identity; defaults are for local mode where
    /// the auth gateway in front of this service is absent.
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default)]
    pub role: Role,
}

fn default_user_id() -> String {
    "emp-001".to_string()
}

#[derive(Debug, Serialize)]
struct ChatEnvelope {
    success: bool,
    data: ChatResponse,
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatEnvelope>, ServerError> {
    let request_id = Uuid::new_v4();
    let query = ChatQuery::new(request.message, request.user_id, request.role);
    let response = state.orchestrator.handle(&query).await.map_err(|err| match err {
        AssistantError::InvalidInput(message) => ServerError::BadRequest(message),
        other => ServerError::Internal(other.to_string()),
    })?;

    info!(
        %request_id,
        intent = %response.intent,
        cached = response.cached,
        response_time_ms = response.response_time_ms,
        "chat request served"
    );

    Ok(Json(ChatEnvelope {
        success: true,
        data: response,
    }))
}
