use super::client::OpenAiHttpClient;
use crate::ai::LetterService;
use crate::models::{ChatCompletionRequest, ChatMessage};
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use std::time::Duration;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const MAX_LETTER_TOKENS: u32 = 300;
const LETTER_TEMPERATURE: f32 = 0.8;

pub struct OpenAiLetterClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiLetterClient {
    pub fn new(api_key: String, project_id: Option<String>) -> Self {
        Self {
            http: OpenAiHttpClient::new(api_key, project_id, Duration::from_secs(30)),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl LetterService for OpenAiLetterClient {
    async fn generate_letter(&self, dream: &str) -> Result<String> {
        let system_message = ChatMessage {
            role: "system".to_string(),
            content: Some(prompts::LETTER_SYSTEM.to_string()),
        };

        let user_message = ChatMessage {
            role: "user".to_string(),
            content: Some(prompts::render(prompts::LETTER_USER, &[("dream", dream)])),
        };

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![system_message, user_message],
            max_tokens: MAX_LETTER_TOKENS,
            temperature: LETTER_TEMPERATURE,
        };

        let response = self.http.chat_completion(request).await?;

        let letter = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| Error::AiProvider("No response from OpenAI chat API".to_string()))?;

        Ok(letter.trim().to_string())
    }
}
