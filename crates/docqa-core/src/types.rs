//! Domain types shared by the pipeline crates.

use serde::{Deserialize, Serialize};

pub type ChunkId = u64;

/// Characters of chunk text surfaced in previews and source listings. The
/// full text still flows into the answer prompt.
pub const PREVIEW_MAX_CHARS: usize = 300;

/// A bounded passage of one source file, the atomic unit of embedding and
/// retrieval.
///
/// - `id`: monotonically increasing, never reused until a corpus reset
/// - `file`: name of the source file the chunk was cut from
/// - `text`: chunk payload, immutable once created
/// - `vector_position`: row in the vector index once embedded, `None` while
///   the chunk is still pending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub file: String,
    pub text: String,
    pub vector_position: Option<usize>,
}

/// A ranked retrieval hit with display-bounded text. `score` is cosine
/// similarity, higher is better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub chunk_id: ChunkId,
    pub file: String,
    pub preview: String,
    pub score: f32,
}

/// One entry of the citation list returned next to an answer.
///
/// `id` is the 1-based rank matching the `[id]` markers in the answer text,
/// not the chunk's permanent id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    pub id: usize,
    pub file: String,
    pub preview: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// First `PREVIEW_MAX_CHARS` characters of `text`.
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_MAX_CHARS).collect()
}
