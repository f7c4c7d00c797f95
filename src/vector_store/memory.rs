//! In-memory vector store implementation.
//!
//! Useful for testing and small datasets.

use super::{rank, Passage, SearchResult, VectorStore};
use crate::config::RelevanceFunction;
use crate::error::{Result, ScriptQaError};
use async_trait::async_trait;
use std::sync::RwLock;

/// In-memory vector store. Insertion order is kept for ties.
pub struct MemoryVectorStore {
    passages: RwLock<Vec<Passage>>,
    relevance: RelevanceFunction,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new(relevance: RelevanceFunction) -> Self {
        Self {
            passages: RwLock::new(Vec::new()),
            relevance,
        }
    }

    /// Create a store pre-populated with passages.
    pub fn with_passages(relevance: RelevanceFunction, passages: Vec<Passage>) -> Self {
        Self {
            passages: RwLock::new(passages),
            relevance,
        }
    }

    /// Add a passage.
    pub fn insert(&self, passage: Passage) -> Result<()> {
        let mut passages = self.passages.write().map_err(|e| {
            ScriptQaError::VectorStore(format!("Failed to acquire lock: {}", e))
        })?;
        passages.push(passage);
        Ok(())
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new(RelevanceFunction::default())
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let passages = self.passages.read().map_err(|e| {
            ScriptQaError::VectorStore(format!("Failed to acquire lock: {}", e))
        })?;
        rank(self.relevance, query_embedding, passages.iter().cloned(), limit)
    }
}
