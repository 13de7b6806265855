//! Deterministic offline providers for tests and development.

use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use twox_hash::XxHash64;

use docqa_core::error::Result;
use docqa_core::traits::{CompletionProvider, EmbeddingProvider};
use docqa_core::types::{ChatMessage, Role};

pub const FAKE_EMBED_DIM: usize = 256;

/// Hashed bag-of-words embedder. Same text always maps to the same
/// L2-normalized vector, so ranking is stable across runs.
pub struct FakeEmbeddings {
    dim: usize,
}

impl FakeEmbeddings {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Default for FakeEmbeddings {
    fn default() -> Self {
        Self::new(FAKE_EMBED_DIM)
    }
}

fn hashed_vector(text: &str, dim: usize) -> Vec<f32> {
    let mut v = vec![0f32; dim];
    for (i, token) in text.split_whitespace().enumerate() {
        let mut hasher = XxHash64::with_seed(0);
        token.hash(&mut hasher);
        let h = hasher.finish();
        let idx = (h as usize) % dim;
        let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
        v[idx] += val + (i as f32 % 3.0) * 0.01;
    }
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
    for x in &mut v {
        *x /= norm;
    }
    v
}

#[async_trait]
impl EmbeddingProvider for FakeEmbeddings {
    fn model(&self) -> &str {
        "fake-hash-embedder"
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| hashed_vector(t, self.dim)).collect())
    }
}

/// Returns a short canned answer, citing `[1]` when the request carries a
/// context block, so citation plumbing can be exercised end to end.
pub struct FakeCompletions;

#[async_trait]
impl CompletionProvider for FakeCompletions {
    fn model(&self) -> &str {
        "fake-completions"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        if user.contains("[1]") {
            Ok("Based on the provided context, the answer is drawn from [1].".to_string())
        } else {
            Ok("I don't have enough information to answer.".to_string())
        }
    }
}
