use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::provider::{GenerationBackend, GenerationError};
use super::types::{ChatCompletionResponse, ChatMessage, ChatRequest};
use crate::core::config::{ApiKey, GenerationConfig};

/// Chat completions against OpenAI or any endpoint speaking the same API.
#[derive(Clone)]
pub struct OpenAiBackend {
    base_url: String,
    model: String,
    temperature: f64,
    api_key: Option<ApiKey>,
    client: Client,
}

impl OpenAiBackend {
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key: config.api_key.clone(),
            client,
        })
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(
        &self,
        system_preamble: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(GenerationError::MissingCredentials)?;

        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = ChatRequest::new(
            self.model.clone(),
            vec![
                ChatMessage::system(system_preamble),
                ChatMessage::user(user_prompt),
            ],
        )
        .with_temperature(self.temperature);

        let res = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose())
            .json(&request)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(GenerationError::Provider { status, body });
        }

        let payload: ChatCompletionResponse = res.json().await?;
        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
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

    fn backend(base_url: String, api_key: Option<&str>) -> OpenAiBackend {
        OpenAiBackend::new(&GenerationConfig {
            base_url,
            api_key: api_key.map(ApiKey::new),
            timeout_secs: 5,
            ..Default::default()
        })
        .expect("client")
    }

    #[tokio::test]
    async fn sends_system_and_user_messages() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let echoed = format!(
                    "{}|{}|{}|{}|{}",
                    auth,
                    body["model"].as_str().unwrap_or_default(),
                    body["temperature"],
                    body["messages"][0]["content"].as_str().unwrap_or_default(),
                    body["messages"][1]["content"].as_str().unwrap_or_default(),
                );
                Json(json!({
                    "choices": [{ "message": { "role": "assistant", "content": echoed } }]
                }))
            }),
        );
        let base = spawn_fake(router).await;

        let answer = backend(base, Some("sk-test"))
            .generate("system text", "user text")
            .await
            .expect("generate");
        assert_eq!(answer, "Bearer sk-test|gpt-4o|0.1|system text|user text");
    }

    #[tokio::test]
    async fn missing_key_fails_without_calling_provider() {
        let err = backend("http://127.0.0.1:9".to_string(), None)
            .generate("s", "u")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MissingCredentials));
    }

    #[tokio::test]
    async fn provider_rejection_is_an_error() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
        );
        let base = spawn_fake(router).await;

        let err = backend(base, Some("bad")).generate("s", "u").await.unwrap_err();
        assert!(matches!(err, GenerationError::Provider { status: 401, .. }));
    }

    #[tokio::test]
    async fn empty_choices_are_an_error() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let base = spawn_fake(router).await;

        let err = backend(base, Some("sk")).generate("s", "u").await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyCompletion));
    }
}
