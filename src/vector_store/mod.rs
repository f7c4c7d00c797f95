//! Vector index abstraction for scriptqa.
//!
//! The index is built elsewhere; this module only reads it.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::config::RelevanceFunction;
use crate::error::{Result, ScriptQaError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Metadata key holding the passage's source identifier.
pub const SOURCE_KEY: &str = "source";

/// A passage stored in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// Passage ID within the index.
    pub id: String,
    /// Text content of this passage.
    pub content: String,
    /// Free-form metadata attached at ingestion time.
    pub metadata: Map<String, Value>,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

impl Passage {
    /// Create a new passage.
    pub fn new(id: &str, content: &str, metadata: Map<String, Value>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.to_string(),
            content: content.to_string(),
            metadata,
            embedding,
        }
    }

    /// Create a passage whose metadata only carries a source identifier.
    pub fn with_source(id: &str, content: &str, source: Option<&str>, embedding: Vec<f32>) -> Self {
        let mut metadata = Map::new();
        if let Some(source) = source {
            metadata.insert(SOURCE_KEY.to_string(), Value::String(source.to_string()));
        }
        Self::new(id, content, metadata, embedding)
    }

    /// Source identifier, if the metadata has a string `source` entry.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).and_then(Value::as_str)
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched passage.
    pub passage: Passage,
    /// Relevance score (higher is better, nominally in [0, 1]).
    pub score: f32,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Return at most `limit` passages, most relevant first.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Compute the squared Euclidean (L2) distance between two vectors.
pub fn squared_euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Score a stored embedding against the query.
pub fn relevance_score(function: RelevanceFunction, query: &[f32], embedding: &[f32]) -> f32 {
    match function {
        RelevanceFunction::Cosine => cosine_similarity(query, embedding),
        RelevanceFunction::Euclidean => {
            1.0 - squared_euclidean_distance(query, embedding) / std::f32::consts::SQRT_2
        }
    }
}

/// Score, sort (descending) and truncate a set of passages.
///
/// Fails when a stored embedding has a different length than the query,
/// which means the index was built with another embedding model.
pub(crate) fn rank<I>(
    function: RelevanceFunction,
    query_embedding: &[f32],
    passages: I,
    limit: usize,
) -> Result<Vec<SearchResult>>
where
    I: IntoIterator<Item = Passage>,
{
    let mut results = Vec::new();
    for passage in passages {
        if passage.embedding.len() != query_embedding.len() {
            return Err(ScriptQaError::VectorStore(format!(
                "Embedding dimension mismatch: query has {}, passage {} has {}",
                query_embedding.len(),
                passage.id,
                passage.embedding.len()
            )));
        }
        let score = relevance_score(function, query_embedding, &passage.embedding);
        results.push(SearchResult { passage, score });
    }

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(limit);

    if results.iter().any(|r| !(0.0..=1.0).contains(&r.score)) {
        let scores: Vec<f32> = results.iter().map(|r| r.score).collect();
        warn!("Relevance scores must be between 0 and 1, got {:?}", scores);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_euclidean_relevance() {
        let a = [1.0, 0.0];
        assert!((relevance_score(RelevanceFunction::Euclidean, &a, &a) - 1.0).abs() < 0.001);

        // Orthogonal unit vectors have squared distance 2.
        let b = [0.0, 1.0];
        let expected = 1.0 - 2.0 / std::f32::consts::SQRT_2;
        assert!((relevance_score(RelevanceFunction::Euclidean, &a, &b) - expected).abs() < 0.001);
    }

    #[test]
    fn test_euclidean_relevance_uses_squared_distance() {
        // Unit vectors at cosine 0.7: squared distance 2 - 2 * 0.7 = 0.6.
        let a = [1.0, 0.0];
        let b = [0.7, (1.0f32 - 0.49).sqrt()];
        let score = relevance_score(RelevanceFunction::Euclidean, &a, &b);
        assert!((score - (1.0 - 0.6 / std::f32::consts::SQRT_2)).abs() < 0.001);
        assert!(score > 0.5);
    }

    #[test]
    fn test_passage_source() {
        let passage = Passage::with_source("1", "text", Some("script.txt"), vec![]);
        assert_eq!(passage.source(), Some("script.txt"));

        let passage = Passage::with_source("2", "text", None, vec![]);
        assert_eq!(passage.source(), None);

        let mut metadata = Map::new();
        metadata.insert(SOURCE_KEY.to_string(), Value::from(42));
        let passage = Passage::new("3", "text", metadata, vec![]);
        assert_eq!(passage.source(), None);
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let passages = vec![
            Passage::with_source("low", "low", None, vec![0.0, 1.0]),
            Passage::with_source("high", "high", None, vec![1.0, 0.0]),
            Passage::with_source("mid", "mid", None, vec![1.0, 1.0]),
        ];

        let results = rank(RelevanceFunction::Cosine, &[1.0, 0.0], passages, 2).unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.passage.id.as_str()).collect();
        assert_eq!(ids, ["high", "mid"]);
    }

    #[test]
    fn test_rank_orders_nan_deterministically() {
        let passages = vec![
            Passage::with_source("mid", "mid", None, vec![1.0, 1.0]),
            Passage::with_source("nan", "nan", None, vec![f32::NAN, 0.0]),
            Passage::with_source("high", "high", None, vec![1.0, 0.0]),
        ];

        let results = rank(RelevanceFunction::Cosine, &[1.0, 0.0], passages, 3).unwrap();
        assert_eq!(results.iter().filter(|r| r.score.is_nan()).count(), 1);
        let ids: Vec<&str> = results
            .iter()
            .filter(|r| r.score.is_finite())
            .map(|r| r.passage.id.as_str())
            .collect();
        assert_eq!(ids, ["high", "mid"]);
    }

    #[test]
    fn test_rank_rejects_dimension_mismatch() {
        let passages = vec![Passage::with_source("a", "a", None, vec![1.0, 0.0, 0.0])];
        let err = rank(RelevanceFunction::Cosine, &[1.0, 0.0], passages, 3).unwrap_err();
        assert!(matches!(err, ScriptQaError::VectorStore(_)));
    }
}
