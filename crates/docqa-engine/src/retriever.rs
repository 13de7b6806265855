//! Question-time retrieval: embed the question, search the index, resolve
//! rows back to chunks.

use docqa_core::error::{Error, Result};
use docqa_core::traits::EmbeddingProvider;
use docqa_core::types::{preview, ChunkId, QueryResult};
use docqa_index::{CorpusStore, FlatIndex};

/// Bounds on a caller-supplied `top_k`; out-of-range values clamp rather
/// than fail. The index further clamps to its own size.
pub const TOP_K_MIN: usize = 1;
pub const TOP_K_MAX: usize = 20;

/// A ranked hit carrying the full chunk text for prompt assembly. Display
/// surfaces derive a bounded `QueryResult` from it.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub chunk_id: ChunkId,
    pub file: String,
    pub text: String,
    pub score: f32,
}

impl RetrievedChunk {
    pub fn to_query_result(&self) -> QueryResult {
        QueryResult {
            chunk_id: self.chunk_id,
            file: self.file.clone(),
            preview: preview(&self.text),
            score: self.score,
        }
    }
}

pub async fn retrieve(
    embedder: &dyn EmbeddingProvider,
    index: &FlatIndex,
    store: &CorpusStore,
    question: &str,
    top_k: usize,
) -> Result<Vec<RetrievedChunk>> {
    if index.is_empty() {
        return Err(Error::IndexNotBuilt);
    }
    let top_k = top_k.clamp(TOP_K_MIN, TOP_K_MAX);

    let question_batch = [question.to_string()];
    let mut vectors = embedder.embed_batch(&question_batch).await?;
    if vectors.len() != 1 {
        return Err(Error::EmbeddingProvider(format!(
            "expected 1 query vector, got {}",
            vectors.len()
        )));
    }
    let query = vectors.remove(0);

    let hits = match index.search(&query, top_k) {
        // The storage-layer condition maps to the user-facing one here.
        Err(Error::EmptyIndex) => return Err(Error::IndexNotBuilt),
        other => other?,
    };
    hits.into_iter()
        .map(|(position, score)| {
            let chunk = store.chunk_at(position)?;
            Ok(RetrievedChunk {
                chunk_id: chunk.id,
                file: chunk.file.clone(),
                text: chunk.text.clone(),
                score,
            })
        })
        .collect()
}
