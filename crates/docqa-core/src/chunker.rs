//! Fixed-size overlapping window chunker.
//!
//! Windows are measured in characters; previews elsewhere use the same
//! unit. Splitting is deterministic and side-effect free.

use crate::error::{Error, Result};

/// Split `text` into windows of `chunk_size` characters with `overlap`
/// characters repeated between consecutive windows.
///
/// Each window is whitespace-trimmed and dropped if it trims to empty. The
/// final window may be shorter than `chunk_size`. Text shorter than one
/// window yields a single trimmed chunk.
pub fn chunk(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>> {
    if chunk_size == 0 {
        return Err(Error::InvalidChunkConfig("chunk_size must be positive".to_string()));
    }
    if overlap >= chunk_size {
        return Err(Error::InvalidChunkConfig(format!(
            "overlap {overlap} must be smaller than chunk_size {chunk_size}"
        )));
    }

    let chars: Vec<char> = text.chars().collect();
    let step = chunk_size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let window: String = chars[start..end].iter().collect();
        let trimmed = window.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }
    Ok(chunks)
}
