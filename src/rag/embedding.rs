use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::error::EmbeddingError;
use crate::core::config::EmbeddingConfig;

/// Maps a query into the embedding space the index was built with.
#[async_trait]
pub trait EmbeddingEncoder: Send + Sync {
    fn name(&self) -> &str;

    async fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Client for an OpenAI-compatible `/v1/embeddings` endpoint
/// (LM Studio, text-embeddings-inference, OpenAI).
#[derive(Clone)]
pub struct OpenAiEmbeddingEncoder {
    base_url: String,
    model: String,
    client: Client,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

impl OpenAiEmbeddingEncoder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client,
        })
    }
}

#[async_trait]
impl EmbeddingEncoder for OpenAiEmbeddingEncoder {
    fn name(&self) -> &str {
        &self.model
    }

    async fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let url = format!("{}/v1/embeddings", self.base_url);
        let body = json!({
            "model": self.model,
            "input": [text],
        });

        let res = self.client.post(&url).json(&body).send().await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(EmbeddingError::Provider { status, body });
        }

        let payload: EmbeddingsResponse = res.json().await?;
        let embedding = payload
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .ok_or_else(|| EmbeddingError::Malformed("response contained no embeddings".to_string()))?;

        if embedding.is_empty() {
            return Err(EmbeddingError::Malformed("empty embedding vector".to_string()));
        }
        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;
    use tokio::net::TcpListener;

    use super::*;

    async fn spawn_fake(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{}", addr)
    }

    fn encoder(base_url: String) -> OpenAiEmbeddingEncoder {
        OpenAiEmbeddingEncoder::new(&EmbeddingConfig {
            base_url,
            model: "test-embed".to_string(),
            timeout_secs: 5,
        })
        .expect("client")
    }

    #[tokio::test]
    async fn encode_returns_first_embedding() {
        let router = Router::new().route(
            "/v1/embeddings",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], "test-embed");
                assert_eq!(body["input"][0], "hello");
                Json(serde_json::json!({
                    "data": [{ "embedding": [0.25, 0.5, 0.75], "index": 0 }]
                }))
            }),
        );
        let base = spawn_fake(router).await;

        let vector = encoder(base).encode("hello").await.expect("encode");
        assert_eq!(vector, vec![0.25, 0.5, 0.75]);
    }

    #[tokio::test]
    async fn provider_error_status_is_reported() {
        let router = Router::new().route(
            "/v1/embeddings",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model loading") }),
        );
        let base = spawn_fake(router).await;

        let err = encoder(base).encode("hello").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Provider { status: 503, .. }));
    }

    #[tokio::test]
    async fn empty_data_is_malformed() {
        let router = Router::new().route(
            "/v1/embeddings",
            post(|| async { Json(serde_json::json!({ "data": [] })) }),
        );
        let base = spawn_fake(router).await;

        let err = encoder(base).encode("hello").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Malformed(_)));
    }
}
