use std::path::PathBuf;

use thiserror::Error;

pub mod defaults;
pub mod paths;
pub mod service;
pub mod types;
pub mod validation;

pub use paths::AppPaths;
pub use service::ConfigService;
pub use types::{
    ApiKey, AppConfig, AssistantConfig, EmbeddingConfig, GenerationConfig, RetrievalConfig,
    ServerConfig,
};

/// Startup configuration failures. All of these are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("invalid value '{value}' for environment variable {var}")]
    EnvOverride { var: String, value: String },

    #[error("embedding dimension {encoder} does not match index dimension {index}")]
    DimensionMismatch { index: usize, encoder: usize },
}
