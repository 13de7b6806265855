use async_trait::async_trait;

use crate::error::Result;
use crate::types::ChatMessage;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier, used in logs.
    fn model(&self) -> &str;
    /// Embed a batch of texts; output has the same length and order as the
    /// input. Either every vector is returned or the whole call fails.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn model(&self) -> &str;
    /// Run one chat completion over `messages` and return the answer text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Format-specific text extraction, supplied by the hosting layer.
/// Implementations return an empty string for files with no extractable
/// text; that is not an error.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, file_name: &str, raw_bytes: &[u8]) -> Result<String>;
}
