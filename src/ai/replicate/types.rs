use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct CreatePredictionRequest {
    pub input: PredictionInput,
}

#[derive(Debug, Serialize)]
pub struct PredictionInput {
    pub image: String,
    pub prompt: String,
    pub guidance_scale: f64,
    pub num_inference_steps: u32,
    pub output_format: String,
    pub output_quality: u32,
}

#[derive(Debug, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: Option<PredictionOutput>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Replicate returns either a list of output URLs or a single URL depending
/// on the model.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PredictionOutput {
    Many(Vec<String>),
    One(String),
}

impl PredictionOutput {
    pub fn first_url(&self) -> Option<&str> {
        match self {
            PredictionOutput::Many(urls) => urls.first().map(String::as_str),
            PredictionOutput::One(url) => Some(url.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    /// Statuses Replicate may add later; treated as still in progress.
    #[serde(other)]
    Unknown,
}

impl PredictionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PredictionStatus::Starting => "starting",
            PredictionStatus::Processing => "processing",
            PredictionStatus::Succeeded => "succeeded",
            PredictionStatus::Failed => "failed",
            PredictionStatus::Canceled => "canceled",
            PredictionStatus::Unknown => "unknown",
        }
    }
}
