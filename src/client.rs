use crate::config::GenerationConfig;
use crate::error::BotError;
use crate::models::PromptPair;
use async_openai::{Client, config::OpenAIConfig, types::CreateChatCompletionRequestArgs};
use async_trait::async_trait;

/// A text-generation service that answers one prompt pair with one reply.
///
/// The remote completion API and the scripted transport used in tests both
/// live behind this seam.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &PromptPair) -> Result<String, BotError>;
}

/// OpenAI-compatible chat completion backend
pub struct OpenAiBackend {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl OpenAiBackend {
    /// Create a backend from the generation config and a resolved API key
    pub fn new(config: &GenerationConfig, api_key: String) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&config.api_endpoint);

        Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Build the chat completion request for a prompt pair
    fn build_request(
        &self,
        prompt: &PromptPair,
    ) -> Result<async_openai::types::CreateChatCompletionRequest, BotError> {
        let system_message = async_openai::types::ChatCompletionRequestSystemMessageArgs::default()
            .content(prompt.system.clone())
            .build()
            .map_err(|e| BotError::Transport(format!("failed to build system message: {e}")))?
            .into();

        let user_message = async_openai::types::ChatCompletionRequestUserMessageArgs::default()
            .content(prompt.user.clone())
            .build()
            .map_err(|e| BotError::Transport(format!("failed to build user message: {e}")))?
            .into();

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([system_message, user_message])
            .temperature(self.temperature as f32)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| BotError::Transport(format!("failed to build completion request: {e}")))
    }

    /// Extract the reply text from the first choice of the API response
    fn extract_content(response: async_openai::types::CreateChatCompletionResponse) -> String {
        match response.choices.first() {
            Some(choice) => match &choice.message.content {
                Some(content) => content.clone(),
                None => String::new(),
            },
            None => String::new(),
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, prompt: &PromptPair) -> Result<String, BotError> {
        let request = self.build_request(prompt)?;

        tracing::debug!(model = %self.model, "sending completion request");
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        Ok(Self::extract_content(response))
    }
}
