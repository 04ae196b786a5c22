use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_id: String,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let max_len = state.config.app.max_input_length;
    if payload.message.chars().count() > max_len {
        return Err(ApiError::BadRequest(format!(
            "Mensagem excede o limite de {} caracteres",
            max_len
        )));
    }

    let reply = state
        .orchestrator
        .submit_query(&payload.message, payload.conversation_id.as_deref())
        .await;
    tracing::debug!(
        conversation_id = %reply.conversation_id,
        outcome = ?reply.outcome,
        "Chat request finished"
    );

    Ok(Json(ChatResponse {
        response: reply.answer,
        conversation_id: reply.conversation_id,
    }))
}
