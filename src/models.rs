//! Data models and structures
//!
//! Defines the request-scoped domain types, the OpenAI API wire models, and
//! process configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// The two artifacts produced for one request.
#[derive(Debug, Clone)]
pub struct TimeCapsule {
    pub aged_image_url: String,
    pub wisdom_letter: String,
}

/// Success payload for `POST /generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub aged_image_url: String,
    pub wisdom_letter: String,
}

impl From<TimeCapsule> for GenerateResponse {
    fn from(capsule: TimeCapsule) -> Self {
        Self {
            success: true,
            aged_image_url: capsule.aged_image_url,
            wisdom_letter: capsule.wisdom_letter,
        }
    }
}

// OpenAI API Request/Response models
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub replicate_api_token: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_project_id: Option<String>,
    pub upload_dir: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| {
                crate::Error::Config(format!("PORT is not a valid port number: {}", raw))
            })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            replicate_api_token: std::env::var("REPLICATE_API_TOKEN").ok(),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_project_id: std::env::var("OPENAI_PROJECT_ID").ok(),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            port,
        })
    }

    /// Both provider secrets are present.
    pub fn has_credentials(&self) -> bool {
        self.replicate_api_token.is_some() && self.openai_api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generate_response_from_capsule() {
        let capsule = TimeCapsule {
            aged_image_url: "https://replicate.delivery/out.png".to_string(),
            wisdom_letter: "Dear past self".to_string(),
        };

        let response = GenerateResponse::from(capsule);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "aged_image_url": "https://replicate.delivery/out.png",
                "wisdom_letter": "Dear past self"
            })
        );
    }

    #[test]
    fn test_chat_request_serialization() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some("hello".to_string()),
            }],
            max_tokens: 300,
            temperature: 0.8,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"model\":\"gpt-4o-mini\""));
        assert!(json.contains("\"max_tokens\":300"));
        assert!(json.contains("\"temperature\":0.8"));
    }

    #[test]
    fn test_config_credentials_check() {
        let config = Config {
            replicate_api_token: Some("r8_token".to_string()),
            openai_api_key: None,
            openai_project_id: None,
            upload_dir: PathBuf::from("uploads"),
            port: 5000,
        };
        assert!(!config.has_credentials());

        let config = Config {
            openai_api_key: Some("sk-key".to_string()),
            ..config
        };
        assert!(config.has_credentials());
    }
}
