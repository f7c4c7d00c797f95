//! Context retrieval and formatting.

use super::{ContextChunk, CONTEXT_SEPARATOR};
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::VectorStore;
use std::sync::Arc;
use tracing::debug;

/// Default number of passages retrieved per question.
pub const DEFAULT_TOP_K: usize = 3;

/// Retrieves context passages for a question.
pub struct ContextBuilder {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl ContextBuilder {
    /// Create a new context builder.
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            vector_store,
            embedder,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set the number of passages to retrieve.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Embed the query and fetch the nearest passages, in the store's order.
    pub async fn build(&self, query: &str) -> Result<Vec<ContextChunk>> {
        let query_embedding = self.embedder.embed(query).await?;

        let results = self.vector_store.search(&query_embedding, self.top_k).await?;
        debug!("Retrieved {} passages", results.len());

        Ok(results.into_iter().map(ContextChunk::from).collect())
    }
}

/// Join passage texts into the context block, keeping retrieval order.
pub fn format_context_for_prompt(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.content.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(content: &str) -> ContextChunk {
        ContextChunk {
            content: content.to_string(),
            source: None,
            score: 1.0,
        }
    }

    #[test]
    fn test_format_context_joins_in_order() {
        let chunks = [chunk("b"), chunk("a"), chunk("c")];
        assert_eq!(format_context_for_prompt(&chunks), "b\n\n---\n\na\n\n---\n\nc");
    }

    #[test]
    fn test_format_context_single_and_empty() {
        assert_eq!(format_context_for_prompt(&[chunk("only")]), "only");
        assert_eq!(format_context_for_prompt(&[]), "");
    }
}
