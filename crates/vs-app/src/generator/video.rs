use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use vs_core::{AspectRatio, Resolution};
use vs_veo::{ApiKey, VeoError, VideoApi, VideoRequest};

use crate::error::GenerateError;
use crate::generator::key::KeySelector;
use crate::generator::messages::{ProgressMessages, RandomMessages};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

pub const INITIALIZING_MESSAGE: &str = "Initializing request...";
pub const STARTED_MESSAGE: &str = "Video generation started. This may take a few minutes...";

/// Receives human-readable status lines while a job runs.
pub type ProgressFn<'a> = &'a (dyn Fn(String) + Send + Sync);

/// Runs one remote generation job end to end: submit, poll until done,
/// hand back a playable URL.
pub struct VideoService {
    api: Arc<dyn VideoApi>,
    api_key: ApiKey,
    key_selector: Arc<dyn KeySelector>,
    messages: Arc<dyn ProgressMessages>,
    poll_interval: Duration,
}

impl VideoService {
    pub fn new(api: Arc<dyn VideoApi>, api_key: ApiKey, key_selector: Arc<dyn KeySelector>) -> Self {
        Self {
            api,
            api_key,
            key_selector,
            messages: Arc::new(RandomMessages),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_messages(mut self, messages: Arc<dyn ProgressMessages>) -> Self {
        self.messages = messages;
        self
    }

    pub fn key_selector(&self) -> Arc<dyn KeySelector> {
        self.key_selector.clone()
    }

    /// Generate one video and return its URL with the API key appended.
    ///
    /// A rejected key triggers key re-selection before the error is
    /// returned. The job itself is never retried.
    pub async fn generate(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        resolution: Resolution,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<String, GenerateError> {
        if prompt.trim().is_empty() {
            return Err(GenerateError::EmptyPrompt);
        }

        let request = VideoRequest {
            prompt: prompt.to_string(),
            aspect_ratio,
            resolution,
        };

        emit(on_progress, INITIALIZING_MESSAGE);

        let result = self.run(&request, on_progress).await;

        if let Err(err) = &result {
            if err.is_invalid_credential() {
                warn!("API key was rejected, asking for a new one");
                if let Err(e) = self.key_selector.open_select_key().await {
                    warn!("Key selection failed: {e:#}");
                }
            }
        }

        result
    }

    async fn run(
        &self,
        request: &VideoRequest,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<String, GenerateError> {
        let mut operation = self
            .api
            .submit(request)
            .await
            .map_err(GenerateError::Submission)?;

        emit(on_progress, STARTED_MESSAGE);

        let mut polls = 0u32;
        while !operation.done {
            tokio::time::sleep(self.poll_interval).await;
            emit(on_progress, &self.messages.next_message());

            operation = self
                .api
                .poll(&operation)
                .await
                .map_err(GenerateError::Poll)?;
            polls += 1;
        }

        if let Some(status) = operation.error.take() {
            return Err(GenerateError::Poll(VeoError::Operation {
                code: status.code,
                message: status.message,
            }));
        }

        let uri = operation.video_uri().ok_or(GenerateError::MissingResult)?;
        info!("Operation {} finished after {} polls", operation.name, polls);

        self.authorize(uri)
    }

    /// The media endpoint needs the key as a query parameter to be playable.
    fn authorize(&self, uri: &str) -> Result<String, GenerateError> {
        let key = self
            .api_key
            .get()
            .ok_or(GenerateError::Poll(VeoError::MissingApiKey))?;
        Ok(format!("{uri}&key={key}"))
    }
}

fn emit(on_progress: Option<ProgressFn<'_>>, message: &str) {
    if let Some(callback) = on_progress {
        callback(message.to_string());
    }
}
