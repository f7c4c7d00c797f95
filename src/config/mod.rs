//! Configuration module for scriptqa.
//!
//! Handles loading application settings and the prompt template.

mod prompts;
mod settings;

pub use prompts::{PromptTemplate, MOVIE_SCRIPT_TEMPLATE};
pub use settings::{
    EmbeddingSettings, OpenAISettings, PromptSettings, RagSettings, RelevanceFunction, Settings,
    VectorStoreSettings,
};
