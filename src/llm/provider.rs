use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("provider credentials are missing")]
    MissingCredentials,

    #[error("provider rejected the request ({status}): {body}")]
    Provider { status: u16, body: String },

    #[error("provider returned no completion")]
    EmptyCompletion,
}

#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Whether the backend has the credentials it needs.
    fn has_credentials(&self) -> bool;

    async fn generate(
        &self,
        system_preamble: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError>;
}
