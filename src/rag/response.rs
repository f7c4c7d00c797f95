//! Question answering over retrieved passages.

use super::context::{format_context_for_prompt, ContextBuilder};
use super::{ContextChunk, NO_MATCH_MESSAGE};
use crate::config::{PromptTemplate, RagSettings};
use crate::embedding::Embedder;
use crate::error::{Result, ScriptQaError};
use crate::generation::ChatModel;
use crate::vector_store::VectorStore;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Default minimum relevance of the best passage.
pub const DEFAULT_MIN_RELEVANCE: f32 = 0.5;

/// RAG engine for question answering.
pub struct RagEngine {
    chat_model: Arc<dyn ChatModel>,
    context_builder: ContextBuilder,
    prompt: PromptTemplate,
    min_relevance: f32,
}

impl RagEngine {
    /// Create a new RAG engine with default retrieval parameters.
    pub fn new(
        vector_store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        chat_model: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            chat_model,
            context_builder: ContextBuilder::new(vector_store, embedder),
            prompt: PromptTemplate::default(),
            min_relevance: DEFAULT_MIN_RELEVANCE,
        }
    }

    /// Apply retrieval parameters from settings.
    pub fn with_settings(mut self, settings: &RagSettings) -> Self {
        self.context_builder = self.context_builder.with_top_k(settings.top_k);
        self.min_relevance = settings.min_relevance;
        self
    }

    /// Set the prompt template.
    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    /// Answer one question.
    ///
    /// Returns [`QueryOutcome::NoMatch`] without calling the chat model when
    /// nothing was retrieved or the first (best) passage scores below the
    /// threshold. A non-finite best score never passes.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<QueryOutcome> {
        if question.trim().is_empty() {
            return Err(ScriptQaError::InvalidInput("Query text is empty".to_string()));
        }

        info!("Processing question: {}", question);

        let chunks = self.context_builder.build(question).await?;

        let Some(best) = chunks.first() else {
            info!("No passages retrieved");
            return Ok(QueryOutcome::NoMatch);
        };
        if !best.score.is_finite() || best.score < self.min_relevance {
            info!(
                "Best relevance {:.3} is below threshold {:.3}",
                best.score, self.min_relevance
            );
            return Ok(QueryOutcome::NoMatch);
        }

        let context_text = format_context_for_prompt(&chunks);
        let prompt = self.prompt.format(&context_text, question);

        let answer = self.chat_model.complete(&prompt).await?;
        debug!("Generated response with {} sources", chunks.len());

        Ok(QueryOutcome::Answered {
            prompt,
            response: RagResponse::new(answer, &chunks),
        })
    }
}

/// Result of answering one question.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Retrieval found nothing relevant enough; the model was not called.
    NoMatch,
    /// The model answered.
    Answered {
        /// The exact prompt sent to the model.
        prompt: String,
        /// Answer and sources.
        response: RagResponse,
    },
}

impl QueryOutcome {
    /// Write the report printed on stdout.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        match self {
            QueryOutcome::NoMatch => writeln!(out, "{}", NO_MATCH_MESSAGE)?,
            QueryOutcome::Answered { prompt, response } => {
                writeln!(out, "{}", prompt)?;
                writeln!(out, "{}", response.format_for_display()?)?;
            }
        }
        Ok(())
    }
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone, PartialEq)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// One entry per retrieved passage, in retrieval order.
    pub sources: Vec<Option<String>>,
}

impl RagResponse {
    fn new(answer: String, chunks: &[ContextChunk]) -> Self {
        Self {
            answer,
            sources: chunks.iter().map(|c| c.source.clone()).collect(),
        }
    }

    /// Format as `Response: ...` and `Sources: [...]` lines.
    ///
    /// Sources are a JSON array with `null` for passages without one.
    pub fn format_for_display(&self) -> Result<String> {
        let sources = serde_json::to_string(&self.sources)?;
        Ok(format!("Response: {}\nSources: {}", self.answer, sources))
    }
}
