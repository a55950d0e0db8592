//! AI service integration for photo aging and letter generation
//!
//! Provides interfaces to Replicate's prediction API (aged portrait) and
//! OpenAI's chat completions API (wisdom letter).

pub mod mime;
pub mod mock;
pub mod openai;
pub mod replicate;

pub use mock::{MockAgingClient, MockLetterClient};
pub use openai::OpenAiLetterClient;
pub use replicate::ReplicateAgingClient;

use crate::Result;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait ImageAgingService: Send + Sync {
    /// Produce a URL to an aged rendition of the stored photo.
    async fn age_image(&self, image_path: &Path, mime_type: &str, dream: &str) -> Result<String>;
}

#[async_trait]
pub trait LetterService: Send + Sync {
    /// Produce a short first-person letter reflecting on the dream.
    async fn generate_letter(&self, dream: &str) -> Result<String>;
}
