//! One-time startup load of the retrieval stack.
//!
//! Missing or unreadable artifacts and an unreachable embedding endpoint only
//! degrade retrieval. A reachable encoder whose vectors do not match the index
//! dimension is a configuration error and stops startup.

use std::sync::Arc;

use super::chunks::ChunkStore;
use super::embedding::{EmbeddingEncoder, OpenAiEmbeddingEncoder};
use super::error::IndexUnavailable;
use super::index::{FlatIndex, VectorIndex};
use super::retriever::{LoadedIndex, Retriever};
use crate::core::config::{AppConfig, AppPaths, ConfigError, RetrievalConfig};

const PROBE_TEXT: &str = "warmup";

pub async fn load_retriever(config: &AppConfig, paths: &AppPaths) -> Result<Retriever, ConfigError> {
    let encoder: Option<Arc<dyn EmbeddingEncoder>> =
        match OpenAiEmbeddingEncoder::new(&config.embedding) {
            Ok(encoder) => Some(Arc::new(encoder)),
            Err(err) => {
                tracing::error!("Failed to build embedding client: {}", err);
                None
            }
        };
    load_retriever_with(encoder, &config.retrieval, paths).await
}

pub async fn load_retriever_with(
    encoder: Option<Arc<dyn EmbeddingEncoder>>,
    retrieval: &RetrievalConfig,
    paths: &AppPaths,
) -> Result<Retriever, ConfigError> {
    let index = match load_index(retrieval, paths) {
        Ok(loaded) => {
            tracing::info!(
                "Index loaded: {} vectors (dimension {}), {} chunks",
                loaded.index.len(),
                loaded.index.dimension(),
                loaded.chunks.len()
            );
            Some(loaded)
        }
        Err(err) => {
            tracing::error!("Index unavailable, retrieval disabled: {}", err);
            None
        }
    };

    let encoder = match encoder {
        Some(encoder) => probe_encoder(encoder, index.as_ref()).await?,
        None => None,
    };

    Ok(Retriever::new(index, encoder))
}

fn load_index(retrieval: &RetrievalConfig, paths: &AppPaths) -> Result<LoadedIndex, IndexUnavailable> {
    let index_path = paths.resolve(&retrieval.index_path);
    let chunks_path = paths.resolve(&retrieval.chunks_path);
    tracing::info!(
        "Loading index {} and chunks {}",
        index_path.display(),
        chunks_path.display()
    );

    let index = FlatIndex::load(&index_path)?;
    let chunks = ChunkStore::load(&chunks_path)?;

    if index.len() != chunks.len() {
        tracing::warn!(
            "Index holds {} vectors but chunk store holds {} chunks; unmatched ids will be skipped",
            index.len(),
            chunks.len()
        );
    }

    Ok(LoadedIndex {
        index: Arc::new(index),
        chunks: Arc::new(chunks),
    })
}

async fn probe_encoder(
    encoder: Arc<dyn EmbeddingEncoder>,
    index: Option<&LoadedIndex>,
) -> Result<Option<Arc<dyn EmbeddingEncoder>>, ConfigError> {
    tracing::info!("Probing embedding model {}", encoder.name());
    let vector = match encoder.encode(PROBE_TEXT).await {
        Ok(vector) => vector,
        Err(err) => {
            tracing::error!("Embedding model {} unavailable: {}", encoder.name(), err);
            return Ok(None);
        }
    };

    if let Some(loaded) = index {
        let expected = loaded.index.dimension();
        if vector.len() != expected {
            return Err(ConfigError::DimensionMismatch {
                index: expected,
                encoder: vector.len(),
            });
        }
    }

    tracing::info!(
        "Embedding model {} ready (dimension {})",
        encoder.name(),
        vector.len()
    );
    Ok(Some(encoder))
}
