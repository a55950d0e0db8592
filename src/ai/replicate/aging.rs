use super::client::ReplicateHttpClient;
use super::types::{CreatePredictionRequest, Prediction, PredictionInput, PredictionStatus};
use crate::ai::ImageAgingService;
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

const CREATE_PREDICTION_PATH: &str = "/v1/models/black-forest-labs/flux-dev/predictions";
const POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_POLL_ATTEMPTS: usize = 60;

/// Outcome of polling one prediction to completion.
#[derive(Debug)]
enum PollOutcome {
    Succeeded(String),
    Failed(String),
    TimedOut,
}

pub struct ReplicateAgingClient {
    http: ReplicateHttpClient,
    poll_interval: Duration,
    max_poll_attempts: usize,
}

impl ReplicateAgingClient {
    pub fn new(api_token: String) -> Self {
        Self {
            http: ReplicateHttpClient::new(api_token, Duration::from_secs(30)),
            poll_interval: POLL_INTERVAL,
            max_poll_attempts: MAX_POLL_ATTEMPTS,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    #[cfg(test)]
    fn with_poll_schedule(mut self, interval: Duration, max_attempts: usize) -> Self {
        self.poll_interval = interval;
        self.max_poll_attempts = max_attempts;
        self
    }

    async fn poll_prediction(&self, prediction_id: &str) -> Result<PollOutcome> {
        let path = format!("/v1/predictions/{}", prediction_id);

        for attempt in 1..=self.max_poll_attempts {
            let prediction: Prediction = self.http.get(&path).await?;

            match prediction.status {
                PredictionStatus::Succeeded => {
                    let url = prediction
                        .output
                        .as_ref()
                        .and_then(|output| output.first_url())
                        .ok_or_else(|| {
                            Error::AiProvider(
                                "Prediction succeeded without producing output".to_string(),
                            )
                        })?;
                    return Ok(PollOutcome::Succeeded(url.to_string()));
                }
                PredictionStatus::Failed | PredictionStatus::Canceled => {
                    let message = prediction
                        .error
                        .unwrap_or_else(|| "Unknown error".to_string());
                    return Ok(PollOutcome::Failed(format!(
                        "Prediction {}: {}",
                        prediction.status.as_str(),
                        message
                    )));
                }
                PredictionStatus::Starting
                | PredictionStatus::Processing
                | PredictionStatus::Unknown => {
                    tracing::debug!(
                        "Prediction {} still {} (attempt {}/{})",
                        prediction_id,
                        prediction.status.as_str(),
                        attempt,
                        self.max_poll_attempts
                    );
                }
            }

            if attempt < self.max_poll_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        Ok(PollOutcome::TimedOut)
    }
}

#[async_trait]
impl ImageAgingService for ReplicateAgingClient {
    async fn age_image(&self, image_path: &Path, mime_type: &str, dream: &str) -> Result<String> {
        let image_bytes = tokio::fs::read(image_path).await?;

        use base64::Engine as _;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&image_bytes);
        let data_url = format!("data:{};base64,{}", mime_type, encoded);

        let prompt = prompts::render(prompts::AGING_PROMPT, &[("dream", dream)]);

        let request = CreatePredictionRequest {
            input: PredictionInput {
                image: data_url,
                prompt,
                guidance_scale: 7.5,
                num_inference_steps: 28,
                output_format: "png".to_string(),
                output_quality: 90,
            },
        };

        let prediction: Prediction = self.http.post_created(CREATE_PREDICTION_PATH, &request).await?;
        tracing::info!("Created aging prediction {}", prediction.id);

        match self.poll_prediction(&prediction.id).await? {
            PollOutcome::Succeeded(url) => Ok(url),
            PollOutcome::Failed(message) => Err(Error::AiProvider(message)),
            PollOutcome::TimedOut => Err(Error::Timeout(
                "Prediction timed out or did not produce output".to_string(),
            )),
        }
    }
}
