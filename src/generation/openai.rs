//! OpenAI chat-completion implementation.

use super::ChatModel;
use crate::config::RagSettings;
use crate::error::{Result, ScriptQaError};
use crate::openai::{classify_error, create_client};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// OpenAI-based chat model.
pub struct OpenAIChatModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAIChatModel {
    /// Create a chat model with an explicit model name and temperature.
    pub fn new(model: &str, temperature: f32, api_base: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: create_client(api_base)?,
            model: model.to_string(),
            temperature,
        })
    }

    /// Create a chat model from the RAG section of the settings.
    pub fn from_settings(settings: &RagSettings, api_base: Option<&str>) -> Result<Self> {
        Self::new(&settings.model, settings.temperature, api_base)
    }

    /// Model name used for requests.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| ScriptQaError::Generation(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| ScriptQaError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| classify_error("Failed to generate response", e))?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ScriptQaError::Generation("Empty response from LLM".to_string()))?;

        debug!("Generated answer of {} bytes", answer.len());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_model_from_settings() {
        let settings = RagSettings::default();
        let model = OpenAIChatModel::from_settings(&settings, None).unwrap();
        assert_eq!(model.model(), "gpt-3.5-turbo");
        assert!((model.temperature - 0.7).abs() < f32::EPSILON);
    }
}
