use thiserror::Error;

use crate::types::ChunkId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid chunk config: {0}")]
    InvalidChunkConfig(String),

    #[error("Embedding provider failure: {0}")]
    EmbeddingProvider(String),

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Vector index is empty")]
    EmptyIndex,

    #[error("Index not built; upload documents and build before asking")]
    IndexNotBuilt,

    #[error("Chunk not found: {0}")]
    ChunkNotFound(ChunkId),

    #[error("Completion provider failure: {0}")]
    CompletionProvider(String),

    #[error("Internal invariant violated: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
