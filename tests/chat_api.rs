use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use nova_assistant::core::config::AppConfig;
use nova_assistant::history::InMemoryConversationStore;
use nova_assistant::llm::{GenerationBackend, GenerationError};
use nova_assistant::rag::{
    ChunkStore, DistanceMetric, EmbeddingEncoder, EmbeddingError, FlatIndex, LoadedIndex,
    Retriever,
};
use nova_assistant::server::router::router;
use nova_assistant::state::AppState;

struct AxisEncoder;

#[async_trait]
impl EmbeddingEncoder for AxisEncoder {
    fn name(&self) -> &str {
        "axis"
    }

    async fn encode(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vec![1.0, 0.0])
    }
}

struct CannedBackend(&'static str);

#[async_trait]
impl GenerationBackend for CannedBackend {
    fn name(&self) -> &str {
        "canned"
    }

    fn has_credentials(&self) -> bool {
        true
    }

    async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.0.to_string())
    }
}

fn loaded_retriever() -> Retriever {
    let index = FlatIndex::new(
        2,
        DistanceMetric::L2,
        vec![vec![1.0, 0.0], vec![0.0, 1.0]],
    )
    .expect("index");
    let chunks = ChunkStore::new(vec![
        "Rule X does Y.".to_string(),
        "Unrelated chunk.".to_string(),
    ]);
    Retriever::new(
        Some(LoadedIndex {
            index: Arc::new(index),
            chunks: Arc::new(chunks),
        }),
        Some(Arc::new(AxisEncoder)),
    )
}

async fn spawn_app(retriever: Retriever, config: AppConfig) -> String {
    let state = AppState::from_parts(
        config,
        retriever,
        Arc::new(CannedBackend("Rule X does Y.")),
        Arc::new(InMemoryConversationStore::new()),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router(Arc::new(state))).await;
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn chat_round_trip_and_history() {
    let base = spawn_app(loaded_retriever(), AppConfig::default()).await;
    let client = reqwest::Client::new();

    let reply: Value = client
        .post(format!("{}/api/chat", base))
        .json(&json!({ "message": "What is rule X?", "conversation_id": null }))
        .send()
        .await
        .expect("chat request")
        .json()
        .await
        .expect("chat body");
    assert_eq!(reply["response"], "Rule X does Y.");
    let conversation_id = reply["conversation_id"]
        .as_str()
        .expect("conversation id")
        .to_string();
    assert!(!conversation_id.is_empty());

    let history: Value = client
        .get(format!("{}/api/conversations/{}", base, conversation_id))
        .send()
        .await
        .expect("history request")
        .json()
        .await
        .expect("history body");
    assert_eq!(
        history,
        json!({ "history": ["Usuário: What is rule X?", "Nova: Rule X does Y."] })
    );

    let health: Value = client
        .get(format!("{}/health", base))
        .send()
        .await
        .expect("health request")
        .json()
        .await
        .expect("health body");
    assert_eq!(health["conversation_count"], 1);
}

#[tokio::test]
async fn unknown_conversation_is_404() {
    let base = spawn_app(loaded_retriever(), AppConfig::default()).await;

    let res = reqwest::get(format!("{}/api/conversations/nonexistent", base))
        .await
        .expect("request");
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = res.json().await.expect("body");
    assert_eq!(body["error"], "Conversa não encontrada");
}

#[tokio::test]
async fn degraded_retrieval_answers_not_found() {
    let base = spawn_app(Retriever::unavailable(), AppConfig::default()).await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{}/health", base))
        .send()
        .await
        .expect("health request")
        .json()
        .await
        .expect("health body");
    assert_eq!(
        health,
        json!({
            "status": "online",
            "index_loaded": false,
            "model_loaded": false,
            "credentials_present": true,
            "conversation_count": 0
        })
    );

    let reply: Value = client
        .post(format!("{}/api/chat", base))
        .json(&json!({ "message": "anything", "conversation_id": "c1" }))
        .send()
        .await
        .expect("chat request")
        .json()
        .await
        .expect("chat body");
    assert_eq!(reply["response"], "Não encontrei essa informação no material.");
    assert_eq!(reply["conversation_id"], "c1");

    let res = client
        .get(format!("{}/api/conversations/c1", base))
        .send()
        .await
        .expect("history request");
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_message_is_rejected() {
    let mut config = AppConfig::default();
    config.app.max_input_length = 10;
    let base = spawn_app(loaded_retriever(), config).await;

    let res = reqwest::Client::new()
        .post(format!("{}/api/chat", base))
        .json(&json!({ "message": "x".repeat(11) }))
        .send()
        .await
        .expect("chat request");
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.expect("body");
    assert!(body["error"].as_str().is_some());
}
