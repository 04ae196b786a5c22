use std::sync::Arc;

use super::chunks::ChunkStore;
use super::embedding::EmbeddingEncoder;
use super::error::RetrievalError;
use super::index::VectorIndex;

/// Loaded index together with the chunk texts it points at.
#[derive(Clone)]
pub struct LoadedIndex {
    pub index: Arc<dyn VectorIndex>,
    pub chunks: Arc<ChunkStore>,
}

/// Turns a query into ranked chunk texts. Either half may be missing after a
/// failed startup load, in which case every query yields nothing.
#[derive(Clone, Default)]
pub struct Retriever {
    index: Option<LoadedIndex>,
    encoder: Option<Arc<dyn EmbeddingEncoder>>,
}

impl Retriever {
    pub fn new(index: Option<LoadedIndex>, encoder: Option<Arc<dyn EmbeddingEncoder>>) -> Self {
        Self { index, encoder }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn index_loaded(&self) -> bool {
        self.index.is_some()
    }

    pub fn model_loaded(&self) -> bool {
        self.encoder.is_some()
    }

    /// Ranked chunk texts, nearest first. Retrieval failures degrade to an empty list.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Vec<String> {
        match self.try_retrieve(query, top_k).await {
            Ok(results) => {
                tracing::debug!("Retrieval finished: {} results", results.len());
                results
            }
            Err(RetrievalError::Unavailable) => {
                tracing::warn!("Index or embedding model unavailable; returning no context");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!("Retrieval failed: {}", err);
                Vec::new()
            }
        }
    }

    pub async fn try_retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<String>, RetrievalError> {
        let (Some(loaded), Some(encoder)) = (&self.index, &self.encoder) else {
            return Err(RetrievalError::Unavailable);
        };
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = encoder.encode(query).await?;
        let neighbors = loaded.index.search(&query_vector, top_k)?;

        // Keep the index ranking as-is; only drop slots without a chunk.
        let results = neighbors
            .iter()
            .filter(|neighbor| !neighbor.is_sentinel())
            .filter_map(|neighbor| {
                let chunk = loaded.chunks.get(neighbor.id);
                if chunk.is_none() {
                    tracing::warn!("Index returned id {} outside the chunk store", neighbor.id);
                }
                chunk
            })
            .map(str::to_string)
            .collect();

        Ok(results)
    }
}
