//! Provider clients for the docqa pipeline.
//!
//! Real providers speak the OpenAI-compatible wire format over HTTP; the
//! fakes in `fake` are deterministic and offline, switched in by
//! `APP_USE_FAKE_EMBEDDINGS=1` / `APP_USE_FAKE_COMPLETIONS=1` for tests
//! and development without keys.

pub mod fake;
pub mod openai;

use std::sync::Arc;

use docqa_core::config::Settings;
use docqa_core::traits::{CompletionProvider, EmbeddingProvider};

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub fn embedding_provider(settings: &Settings) -> Arc<dyn EmbeddingProvider> {
    if env_flag("APP_USE_FAKE_EMBEDDINGS") {
        tracing::info!("using fake embeddings");
        return Arc::new(fake::FakeEmbeddings::default());
    }
    Arc::new(openai::OpenAiEmbeddings::new(
        &settings.base_url,
        &settings.api_key,
        &settings.embed_model,
    ))
}

pub fn completion_provider(settings: &Settings) -> Arc<dyn CompletionProvider> {
    if env_flag("APP_USE_FAKE_COMPLETIONS") {
        tracing::info!("using fake completions");
        return Arc::new(fake::FakeCompletions);
    }
    Arc::new(openai::OpenAiCompletions::new(
        &settings.base_url,
        &settings.api_key,
        &settings.chat_model,
    ))
}
