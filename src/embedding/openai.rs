//! OpenAI embeddings implementation.

use super::Embedder;
use crate::config::EmbeddingSettings;
use crate::error::{Result, ScriptQaError};
use crate::openai::{classify_error, create_client};
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Default embedding model, matching the one the index was built with.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: Option<usize>,
}

impl OpenAIEmbedder {
    /// Create a new OpenAI embedder with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_EMBEDDING_MODEL, None, None)
    }

    /// Create an embedder from the embedding section of the settings.
    pub fn from_settings(settings: &EmbeddingSettings, api_base: Option<&str>) -> Result<Self> {
        Self::with_config(
            &settings.model,
            settings.dimensions.map(|d| d as usize),
            api_base,
        )
    }

    /// Create a new OpenAI embedder with a custom model and optional dimensions.
    ///
    /// `dimensions` is only sent to the API when set; older models reject it.
    pub fn with_config(model: &str, dimensions: Option<usize>, api_base: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: create_client(api_base)?,
            model: model.to_string(),
            dimensions,
        })
    }

    /// Model name used for requests.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text), fields(model = %self.model))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut args = CreateEmbeddingRequestArgs::default();
        args.model(&self.model)
            .input(EmbeddingInput::String(text.to_string()));
        if let Some(dimensions) = self.dimensions {
            args.dimensions(dimensions as u32);
        }

        let request = args
            .build()
            .map_err(|e| ScriptQaError::Embedding(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| classify_error("Embedding API error", e))?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|e| e.embedding)
            .ok_or_else(|| ScriptQaError::Embedding("Empty embedding response".to_string()))?;

        debug!("Generated embedding with {} dimensions", embedding.len());
        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_creation() {
        let embedder = OpenAIEmbedder::new().unwrap();
        assert_eq!(embedder.model(), DEFAULT_EMBEDDING_MODEL);
        assert_eq!(embedder.dimensions, None);

        let embedder = OpenAIEmbedder::with_config("text-embedding-3-large", Some(3072), None).unwrap();
        assert_eq!(embedder.dimensions, Some(3072));
    }

    #[test]
    fn test_embedder_from_settings() {
        let settings = EmbeddingSettings {
            model: "text-embedding-3-small".to_string(),
            dimensions: Some(512),
        };
        let embedder = OpenAIEmbedder::from_settings(&settings, None).unwrap();
        assert_eq!(embedder.model(), "text-embedding-3-small");
        assert_eq!(embedder.dimensions, Some(512));
    }
}
