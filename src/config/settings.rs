//! Configuration settings for scriptqa.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub openai: OpenAISettings,
    pub embedding: EmbeddingSettings,
    pub vector_store: VectorStoreSettings,
    pub rag: RagSettings,
    pub prompts: PromptSettings,
}

/// Provider connection settings. The API key itself always comes from the environment.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OpenAISettings {
    /// Override for the API base URL (e.g. a proxy or compatible server).
    pub api_base: Option<String>,
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use. Must match the model the index was built with.
    pub model: String,
    /// Embedding dimensions, only sent when set.
    pub dimensions: Option<u32>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-ada-002".to_string(),
            dimensions: None,
        }
    }
}

/// How a raw vector distance is turned into a relevance score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RelevanceFunction {
    /// `1 - l2_distance / sqrt(2)`; assumes unit-length embeddings.
    #[default]
    Euclidean,
    /// Cosine similarity.
    Cosine,
}

impl std::str::FromStr for RelevanceFunction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "euclidean" | "l2" => Ok(RelevanceFunction::Euclidean),
            "cosine" => Ok(RelevanceFunction::Cosine),
            _ => Err(format!("Unknown relevance function: {}", s)),
        }
    }
}

impl std::fmt::Display for RelevanceFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelevanceFunction::Euclidean => write!(f, "euclidean"),
            RelevanceFunction::Cosine => write!(f, "cosine"),
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Path to the pre-built SQLite index.
    pub path: String,
    /// Relevance score function applied to search hits.
    pub relevance: RelevanceFunction,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            path: "chroma/index.db".to_string(),
            relevance: RelevanceFunction::default(),
        }
    }
}

/// Retrieval and generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// LLM model for response generation.
    pub model: String,
    /// Sampling temperature for the LLM.
    pub temperature: f32,
    /// Number of passages to retrieve.
    pub top_k: usize,
    /// Minimum relevance score of the best passage before the LLM is called.
    pub min_relevance: f32,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            top_k: 3,
            min_relevance: 0.5,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory holding a `rag.toml` that overrides the built-in template.
    pub custom_dir: Option<String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Settings>(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would make every query fail or behave oddly.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.rag.top_k == 0 {
            return Err(crate::error::ScriptQaError::Config(
                "rag.top_k must be at least 1".to_string(),
            ));
        }
        if !self.rag.min_relevance.is_finite() {
            return Err(crate::error::ScriptQaError::Config(
                "rag.min_relevance must be a finite number".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scriptqa")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded index path.
    pub fn index_path(&self) -> PathBuf {
        Self::expand_path(&self.vector_store.path)
    }

    /// API base override, if any.
    pub fn api_base(&self) -> Option<&str> {
        self.openai.api_base.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.rag.top_k, 3);
        assert!((settings.rag.min_relevance - 0.5).abs() < f32::EPSILON);
        assert_eq!(settings.vector_store.relevance, RelevanceFunction::Euclidean);
        assert_eq!(settings.index_path(), PathBuf::from("chroma/index.db"));
        assert!(settings.api_base().is_none());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.embedding.model, "text-embedding-ada-002");
    }

    #[test]
    fn test_partial_file_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[rag]\nmodel = \"gpt-4o-mini\"\n\n[vector_store]\nrelevance = \"cosine\""
        )
        .unwrap();

        let settings = Settings::load_from(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(settings.rag.model, "gpt-4o-mini");
        assert_eq!(settings.rag.top_k, 3);
        assert_eq!(settings.vector_store.relevance, RelevanceFunction::Cosine);
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rag]\ntop_k = 0").unwrap();

        let err = Settings::load_from(Some(&file.path().to_path_buf())).unwrap_err();
        assert!(err.to_string().contains("top_k"));
    }

    #[test]
    fn test_relevance_function_parse() {
        assert_eq!("L2".parse::<RelevanceFunction>().unwrap(), RelevanceFunction::Euclidean);
        assert_eq!("cosine".parse::<RelevanceFunction>().unwrap(), RelevanceFunction::Cosine);
        assert!("dot".parse::<RelevanceFunction>().is_err());
        assert_eq!(RelevanceFunction::Cosine.to_string(), "cosine");
    }
}
