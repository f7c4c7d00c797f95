//! Answer generation from a filled prompt.

mod openai;

pub use openai::OpenAIChatModel;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for chat-completion models.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send a prompt as a single user message and return the reply text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
