use thiserror::Error;

use crate::core::config::ConfigError;
use crate::llm::GenerationError;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to initialize retrieval: {0}")]
    Retrieval(#[source] ConfigError),

    #[error("Failed to initialize generation backend: {0}")]
    Generation(#[source] GenerationError),
}
