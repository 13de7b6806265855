//! Grounding-prompt assembly and citation handling.

use serde::Serialize;

use docqa_core::error::Result;
use docqa_core::traits::CompletionProvider;
use docqa_core::types::{preview, ChatMessage, SourceRef};

use crate::retriever::RetrievedChunk;

const SYSTEM_PROMPT: &str = "You are a helpful RAG assistant. \
Answer the user's question using ONLY the provided context if possible. \
If the answer is not in the context, say you don't have enough information. \
Cite sources as [#] where # is the context index.";

/// Answer plus the rank-ordered citation list; `sources[i-1]` backs the
/// `[i]` markers in `answer`.
#[derive(Debug, Clone, Serialize)]
pub struct ComposedAnswer {
    pub answer: String,
    pub sources: Vec<SourceRef>,
}

/// Build the grounding messages. Each ranked chunk contributes its full
/// text prefixed with its 1-based rank marker and source file name.
pub fn build_messages(question: &str, ranked: &[RetrievedChunk]) -> Vec<ChatMessage> {
    let context = ranked
        .iter()
        .enumerate()
        .map(|(i, c)| format!("[{}] ({})\n{}", i + 1, c.file, c.text))
        .collect::<Vec<_>>()
        .join("\n\n");
    let user = format!(
        "Question:\n{question}\n\nContext chunks:\n{context}\n\n\
         Instructions:\n- If you use multiple chunks, cite like [1][3].\n- Be concise and precise."
    );
    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)]
}

pub async fn compose_answer(
    provider: &dyn CompletionProvider,
    question: &str,
    ranked: &[RetrievedChunk],
) -> Result<ComposedAnswer> {
    let messages = build_messages(question, ranked);
    let raw = provider.complete(&messages).await?;
    let answer = strip_unbacked_citations(&raw, ranked.len());
    let sources = ranked
        .iter()
        .enumerate()
        .map(|(i, c)| SourceRef { id: i + 1, file: c.file.clone(), preview: preview(&c.text) })
        .collect();
    Ok(ComposedAnswer { answer, sources })
}

/// Completion output is not fully controllable; drop any `[n]` marker that
/// points past the sources list so a dangling citation never reaches the
/// display layer. Non-numeric bracket text passes through untouched.
pub fn strip_unbacked_citations(answer: &str, n_sources: usize) -> String {
    let mut out = String::with_capacity(answer.len());
    let mut rest = answer;
    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tail.find(']') else {
            out.push_str(tail);
            return out;
        };
        let inner = &tail[1..close];
        let is_numeric = !inner.is_empty() && inner.chars().all(|c| c.is_ascii_digit());
        if !is_numeric {
            out.push('[');
            rest = &tail[1..];
            continue;
        }
        let backed = inner
            .parse::<usize>()
            .map(|n| (1..=n_sources).contains(&n))
            .unwrap_or(false);
        if backed {
            out.push_str(&tail[..=close]);
        }
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    out
}
