//! Retrieval-augmented answering engine.
//!
//! Composes the chunker, embedding provider, vector index, and completion
//! provider into one service owning the corpus state and exposing the
//! upload/build/ask/reset boundaries.

pub mod extract;
pub mod prompt;
pub mod retriever;
pub mod service;

pub use service::{
    AskResponse, BuildReport, RagService, ResetReport, Status, UploadFile, UploadReport,
};
