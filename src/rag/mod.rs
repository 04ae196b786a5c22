//! Retrieval over a pre-built embedding index.
//!
//! This module provides:
//! - `FlatIndex`: exact nearest-neighbour search over the index artifact
//! - `ChunkStore`: chunk texts aligned with the index ids
//! - `OpenAiEmbeddingEncoder`: query embeddings from an OpenAI-compatible endpoint
//! - `Retriever`: query text → ranked chunk texts
//! - `load_retriever`: one-time startup load

mod chunks;
mod embedding;
mod error;
mod index;
mod loader;
mod retriever;

pub use chunks::ChunkStore;
pub use embedding::{EmbeddingEncoder, OpenAiEmbeddingEncoder};
pub use error::{EmbeddingError, IndexUnavailable, RetrievalError};
pub use index::{DistanceMetric, FlatIndex, Neighbor, VectorIndex, SENTINEL_ID};
pub use loader::{load_retriever, load_retriever_with};
pub use retriever::{LoadedIndex, Retriever};

#[cfg(test)]
pub(crate) use retriever::tests::FixedEncoder;
