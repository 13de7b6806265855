//! OpenAI-compatible HTTP clients for embeddings and chat completions.
//!
//! Providers are distinguished only by base URL, model name, and API key;
//! any service speaking the OpenAI wire format works.

use async_trait::async_trait;
use serde_json::{json, Value};

use docqa_core::error::{Error, Result};
use docqa_core::traits::{CompletionProvider, EmbeddingProvider};
use docqa_core::types::ChatMessage;

/// Provider-side ceiling on inputs per embeddings request. Larger batches
/// are split into ordered sub-batches and re-concatenated in input order.
pub const MAX_EMBED_BATCH: usize = 1000;

const COMPLETION_TEMPERATURE: f32 = 0.2;

pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiEmbeddings {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    async fn embed_sub_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        let body = json!({ "model": self.model, "input": texts });
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::EmbeddingProvider(format!("{url} connection failed: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::EmbeddingProvider(format!(
                "embeddings API error {status}: {text}"
            )));
        }
        let payload: Value = resp
            .json()
            .await
            .map_err(|e| Error::EmbeddingProvider(format!("invalid embeddings body: {e}")))?;
        parse_embeddings(&payload, texts.len())
    }
}

/// Place each returned vector by its `index` field and require exactly one
/// vector per input; anything else is a malformed response.
fn parse_embeddings(payload: &Value, expected: usize) -> Result<Vec<Vec<f32>>> {
    let data = payload["data"]
        .as_array()
        .ok_or_else(|| Error::EmbeddingProvider("response missing data array".to_string()))?;
    if data.len() != expected {
        return Err(Error::EmbeddingProvider(format!(
            "expected {expected} embeddings, got {}",
            data.len()
        )));
    }
    let mut out: Vec<Option<Vec<f32>>> = vec![None; expected];
    for item in data {
        let idx = item["index"]
            .as_u64()
            .ok_or_else(|| Error::EmbeddingProvider("embedding missing index".to_string()))?
            as usize;
        if idx >= expected {
            return Err(Error::EmbeddingProvider(format!(
                "embedding index {idx} out of range for {expected} inputs"
            )));
        }
        if out[idx].is_some() {
            return Err(Error::EmbeddingProvider(format!("duplicate embedding index {idx}")));
        }
        let values = item["embedding"]
            .as_array()
            .ok_or_else(|| Error::EmbeddingProvider(format!("no embedding for input {idx}")))?;
        let vector = values
            .iter()
            .map(|v| v.as_f64().map(|f| f as f32))
            .collect::<Option<Vec<f32>>>()
            .ok_or_else(|| {
                Error::EmbeddingProvider(format!("non-numeric embedding value at input {idx}"))
            })?;
        out[idx] = Some(vector);
    }
    out.into_iter()
        .enumerate()
        .map(|(i, v)| {
            v.ok_or_else(|| Error::EmbeddingProvider(format!("no embedding for input {i}")))
        })
        .collect()
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_EMBED_BATCH) {
            tracing::debug!(batch = batch.len(), model = %self.model, "embedding batch");
            vectors.extend(self.embed_sub_batch(batch).await?);
        }
        Ok(vectors)
    }
}

pub struct OpenAiCompletions {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompletions {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletions {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": COMPLETION_TEMPERATURE,
        });
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::CompletionProvider(format!("{url} connection failed: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::CompletionProvider(format!("chat API error {status}: {text}")));
        }
        let payload: Value = resp
            .json()
            .await
            .map_err(|e| Error::CompletionProvider(format!("invalid chat body: {e}")))?;
        payload["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str())
            .map(str::to_string)
            .ok_or_else(|| Error::CompletionProvider("no choices in response".to_string()))
    }
}
