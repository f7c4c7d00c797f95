//! RAG (Retrieval-Augmented Generation) for answering questions about the script.

pub mod context;
mod response;

pub use context::ContextBuilder;
pub use response::{QueryOutcome, RagEngine, RagResponse};

use crate::vector_store::SearchResult;

/// Separator placed between passages in the prompt context.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Line printed when retrieval finds nothing relevant enough.
pub const NO_MATCH_MESSAGE: &str = "Unable to find matching results.";

/// A retrieved passage reduced to what the prompt and the report need.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextChunk {
    /// Passage text.
    pub content: String,
    /// Source identifier, when the passage metadata has one.
    pub source: Option<String>,
    /// Relevance score.
    pub score: f32,
}

impl From<SearchResult> for ContextChunk {
    fn from(result: SearchResult) -> Self {
        Self {
            source: result.passage.source().map(str::to_string),
            content: result.passage.content,
            score: result.score,
        }
    }
}
