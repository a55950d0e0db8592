use super::{ImageAgingService, LetterService};
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};

const DEFAULT_AGED_URL: &str = "https://replicate.delivery/mock/aged.png";
const DEFAULT_LETTER: &str = "Dear past self, keep dreaming. Your future self.";

/// A queued canned reply: a value to return or an error message to raise.
type QueuedResponse = std::result::Result<String, String>;

fn next_response(
    responses: &Mutex<Vec<QueuedResponse>>,
    call_index: usize,
    default: &str,
) -> Result<String> {
    let responses = responses.lock().unwrap();
    if responses.is_empty() {
        return Ok(default.to_string());
    }

    let index = call_index % responses.len();
    match &responses[index] {
        Ok(value) => Ok(value.clone()),
        Err(message) => Err(Error::AiProvider(message.clone())),
    }
}

#[derive(Clone)]
pub struct MockAgingClient {
    responses: Arc<Mutex<Vec<QueuedResponse>>>,
    call_count: Arc<Mutex<usize>>,
    last_dream: Arc<Mutex<Option<String>>>,
}

impl MockAgingClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_dream: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_image_url(self, url: String) -> Self {
        self.responses.lock().unwrap().push(Ok(url));
        self
    }

    pub fn with_error(self, message: String) -> Self {
        self.responses.lock().unwrap().push(Err(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Dream text received on the most recent call, if any.
    pub fn last_dream(&self) -> Option<String> {
        self.last_dream.lock().unwrap().clone()
    }
}

impl Default for MockAgingClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageAgingService for MockAgingClient {
    async fn age_image(&self, _image_path: &Path, _mime_type: &str, dream: &str) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        *self.last_dream.lock().unwrap() = Some(dream.to_string());

        next_response(&self.responses, *count - 1, DEFAULT_AGED_URL)
    }
}

#[derive(Clone)]
pub struct MockLetterClient {
    responses: Arc<Mutex<Vec<QueuedResponse>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockLetterClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_letter(self, letter: String) -> Self {
        self.responses.lock().unwrap().push(Ok(letter));
        self
    }

    pub fn with_error(self, message: String) -> Self {
        self.responses.lock().unwrap().push(Err(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockLetterClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LetterService for MockLetterClient {
    async fn generate_letter(&self, _dream: &str) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        next_response(&self.responses, *count - 1, DEFAULT_LETTER)
    }
}
