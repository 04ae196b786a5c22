use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let orchestrator = &state.orchestrator;
    Json(json!({
        "status": "online",
        "index_loaded": orchestrator.retriever().index_loaded(),
        "model_loaded": orchestrator.retriever().model_loaded(),
        "credentials_present": orchestrator.backend().has_credentials(),
        "conversation_count": orchestrator.conversation_count().await
    }))
}
