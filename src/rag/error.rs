use std::path::PathBuf;

use thiserror::Error;

/// Startup failure loading the retrieval stack. Never fatal: retrieval degrades to empty.
#[derive(Debug, Error)]
pub enum IndexUnavailable {
    #[error("artifact not found: {0}")]
    MissingArtifact(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed index: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("embedding provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("embedding response was malformed: {0}")]
    Malformed(String),
}

/// Per-request retrieval failure. Callers treat it as "no results".
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("retrieval is unavailable: index or embedding model not loaded")]
    Unavailable,

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("query vector has dimension {actual}, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}
