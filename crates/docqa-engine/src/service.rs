//! The corpus service: owned state behind one lock, and the
//! upload/build/ask/reset boundaries a transport layer calls into.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use docqa_core::chunker;
use docqa_core::config::Settings;
use docqa_core::error::Result;
use docqa_core::traits::{CompletionProvider, EmbeddingProvider, TextExtractor};
use docqa_core::types::{ChunkId, SourceRef};
use docqa_index::{CorpusStore, FlatIndex};

use crate::prompt::compose_answer;
use crate::retriever::retrieve;

/// One uploaded file as received from the transport layer.
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    EmptyCorpus,
    NotReady,
    NoQuestion,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub status: Status,
    pub files: usize,
    pub chunks_added: usize,
    pub total_chunks: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub status: Status,
    pub chunks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub sources: Vec<SourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetReport {
    pub status: Status,
}

struct CorpusState {
    store: CorpusStore,
    index: FlatIndex,
    /// Bumped on every rebuild so a failed build never leaves half-built
    /// state visible: the index is cleared before embedding starts.
    generation: u64,
}

/// Owns one logical corpus. Mutating boundaries serialize behind the write
/// lock; asks share the read lock over a stable index snapshot.
pub struct RagService {
    state: RwLock<CorpusState>,
    embedder: Arc<dyn EmbeddingProvider>,
    completer: Arc<dyn CompletionProvider>,
    extractor: Box<dyn TextExtractor>,
    settings: Settings,
}

impl RagService {
    pub fn new(
        settings: Settings,
        embedder: Arc<dyn EmbeddingProvider>,
        completer: Arc<dyn CompletionProvider>,
        extractor: Box<dyn TextExtractor>,
    ) -> Self {
        info!(
            embed_model = embedder.model(),
            chat_model = completer.model(),
            "rag service initialized"
        );
        Self {
            state: RwLock::new(CorpusState {
                store: CorpusStore::new(),
                index: FlatIndex::new(),
                generation: 0,
            }),
            embedder,
            completer,
            extractor,
            settings,
        }
    }

    /// Extract and chunk each file, appending the chunks as pending. Files
    /// with no extractable text are counted but contribute zero chunks.
    pub async fn upload(&self, files: &[UploadFile]) -> Result<UploadReport> {
        let mut state = self.state.write().await;
        let mut added = 0usize;
        for file in files {
            let text = self.extractor.extract(&file.name, &file.bytes)?;
            if text.trim().is_empty() {
                debug!(file = %file.name, "no extractable text");
                continue;
            }
            for piece in chunker::chunk(&text, self.settings.chunk_size, self.settings.chunk_overlap)? {
                state.store.append(&file.name, &piece);
                added += 1;
            }
        }
        info!(
            files = files.len(),
            chunks_added = added,
            total_chunks = state.store.len(),
            "upload complete"
        );
        Ok(UploadReport {
            status: Status::Ok,
            files: files.len(),
            chunks_added: added,
            total_chunks: state.store.len(),
        })
    }

    /// Full rebuild: every chunk, pending and previously indexed, is
    /// re-embedded in id order, so row positions stay aligned with the
    /// chunk list. A provider failure leaves the service not-built rather
    /// than half-built.
    pub async fn build(&self) -> Result<BuildReport> {
        let mut state = self.state.write().await;
        if state.store.is_empty() {
            return Ok(BuildReport {
                status: Status::EmptyCorpus,
                chunks: 0,
                message: Some(
                    "No documents to index. Please upload files and try again.".to_string(),
                ),
            });
        }

        state.generation += 1;
        state.index.clear();
        state.store.clear_positions();

        let ids: Vec<ChunkId> = state.store.all().iter().map(|c| c.id).collect();
        let texts: Vec<String> = state.store.all().iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;
        let positions = state.index.add(vectors)?;
        for (id, position) in ids.iter().zip(positions) {
            state.store.mark_indexed(*id, position)?;
        }

        info!(generation = state.generation, chunks = ids.len(), "index built");
        Ok(BuildReport { status: Status::Ok, chunks: ids.len(), message: None })
    }

    /// Retrieve the top chunks for `question` and compose a cited answer.
    /// `top_k` falls back to the configured default and is clamped to the
    /// supported range.
    pub async fn ask(&self, question: &str, top_k: Option<usize>) -> Result<AskResponse> {
        let state = self.state.read().await;
        if state.index.is_empty() {
            return Ok(AskResponse {
                status: Status::NotReady,
                answer: None,
                sources: Vec::new(),
                message: Some(
                    "Index is not built yet. Upload documents and build the index first."
                        .to_string(),
                ),
            });
        }
        if question.trim().is_empty() {
            return Ok(AskResponse {
                status: Status::NoQuestion,
                answer: None,
                sources: Vec::new(),
                message: None,
            });
        }

        let k = top_k.unwrap_or(self.settings.top_k_default);
        let ranked =
            retrieve(self.embedder.as_ref(), &state.index, &state.store, question, k).await?;
        debug!(question, results = ranked.len(), "retrieved context");
        let composed = compose_answer(self.completer.as_ref(), question, &ranked).await?;
        Ok(AskResponse {
            status: Status::Ok,
            answer: Some(composed.answer),
            sources: composed.sources,
            message: None,
        })
    }

    /// Clear the corpus and the index; chunk ids restart from zero.
    pub async fn reset(&self) -> Result<ResetReport> {
        let mut state = self.state.write().await;
        state.store.clear();
        state.index.clear();
        state.generation = 0;
        info!("corpus reset");
        Ok(ResetReport { status: Status::Ok })
    }
}
