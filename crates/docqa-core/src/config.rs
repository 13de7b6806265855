//! Configuration loader.
//!
//! Uses Figment to merge `config.toml` + `APP_*` env vars into a typed
//! `Settings`. `OPENAI_API_KEY` is honored as a fallback when no key is
//! configured through either source.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// API key for the embedding/completion provider.
    pub api_key: String,
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    pub embed_model: String,
    pub chat_model: String,
    /// Chunk window size in characters.
    pub chunk_size: usize,
    /// Characters repeated between consecutive windows.
    pub chunk_overlap: usize,
    /// Results returned by ask when the caller does not override top_k.
    pub top_k_default: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            embed_model: "text-embedding-3-large".to_string(),
            chat_model: "gpt-4.1".to_string(),
            chunk_size: 1600,
            chunk_overlap: 240,
            top_k_default: 6,
        }
    }
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        let mut settings: Settings = Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("APP_"))
            .extract()?;
        if settings.api_key.is_empty() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                settings.api_key = key;
            }
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.chunk_size == 0 {
            anyhow::bail!("chunk_size must be positive");
        }
        if self.chunk_overlap >= self.chunk_size {
            anyhow::bail!(
                "chunk_overlap {} must be smaller than chunk_size {}",
                self.chunk_overlap,
                self.chunk_size
            );
        }
        if self.top_k_default == 0 {
            anyhow::bail!("top_k_default must be positive");
        }
        Ok(())
    }
}
