//! Application orchestration for one generation request.

use crate::ai::{ImageAgingService, LetterService, OpenAiLetterClient, ReplicateAgingClient};
use crate::models::{Config, TimeCapsule};
use crate::upload::StoredUpload;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Coordinates the aging and letter clients for `POST /generate`.
pub struct App {
    services: Option<AppServices>,
    upload_dir: PathBuf,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub image_aging: Box<dyn ImageAgingService>,
    pub letter: Box<dyn LetterService>,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// This is primarily useful for integration tests and local harnesses that
    /// need to inject mocks.
    pub fn with_services(services: AppServices, upload_dir: PathBuf) -> Self {
        Self {
            services: Some(services),
            upload_dir,
        }
    }

    /// Construct an app from environment configuration.
    ///
    /// Missing provider secrets do not fail construction: the server still
    /// comes up and every `/generate` call reports a configuration error.
    pub fn from_config(config: &Config) -> Result<Self> {
        fs::create_dir_all(&config.upload_dir)?;
        info!("Upload directory: {}", config.upload_dir.display());

        let services = match (&config.replicate_api_token, &config.openai_api_key) {
            (Some(replicate_token), Some(openai_key)) => {
                info!("Replicate API token loaded");
                info!("OpenAI API key loaded");
                Some(AppServices {
                    image_aging: Box::new(ReplicateAgingClient::new(replicate_token.clone())),
                    letter: Box::new(OpenAiLetterClient::new(
                        openai_key.clone(),
                        config.openai_project_id.clone(),
                    )),
                })
            }
            (replicate_token, openai_key) => {
                if replicate_token.is_none() {
                    warn!("REPLICATE_API_TOKEN not set; /generate will fail with a configuration error");
                }
                if openai_key.is_none() {
                    warn!("OPENAI_API_KEY not set; /generate will fail with a configuration error");
                }
                None
            }
        };

        Ok(Self {
            services,
            upload_dir: config.upload_dir.clone(),
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Both provider clients are configured.
    pub fn is_configured(&self) -> bool {
        self.services.is_some()
    }

    /// Fails with a configuration error when provider secrets are missing.
    pub fn ensure_configured(&self) -> Result<()> {
        self.services().map(|_| ())
    }

    fn services(&self) -> Result<&AppServices> {
        self.services.as_ref().ok_or_else(|| {
            Error::Config("API keys are missing. Please check your .env file.".to_string())
        })
    }

    /// Run the two-step pipeline for one request.
    ///
    /// The steps are sequential: when the aging step fails, the letter
    /// service must not be called at all.
    pub async fn generate(&self, upload: &StoredUpload, dream: &str) -> Result<TimeCapsule> {
        let services = self.services()?;

        let aged_image_url = services
            .image_aging
            .age_image(upload.path(), upload.mime_type(), dream)
            .await?;
        info!("Aged image ready: {}", aged_image_url);

        let wisdom_letter = services.letter.generate_letter(dream).await?;
        info!("Wisdom letter ready ({} chars)", wisdom_letter.len());

        Ok(TimeCapsule {
            aged_image_url,
            wisdom_letter,
        })
    }
}
