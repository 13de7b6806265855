//! Default text-extraction collaborator.

use docqa_core::error::Result;
use docqa_core::traits::TextExtractor;

/// Decodes `.txt` and `.md` uploads as lossy UTF-8. Every other extension
/// yields an empty string, which the upload boundary counts as zero chunks.
/// Richer formats (PDF, DOCX) plug in through the same trait.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, file_name: &str, raw_bytes: &[u8]) -> Result<String> {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".txt") || lower.ends_with(".md") {
            return Ok(String::from_utf8_lossy(raw_bytes).to_string());
        }
        tracing::debug!(file = file_name, "no extractor for file type");
        Ok(String::new())
    }
}
