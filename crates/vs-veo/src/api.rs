//! REST client for the Veo long-running generation endpoints.
//!
//! [`VeoApi`] submits a `predictLongRunning` request and re-fetches the
//! returned operation by name. The API key is read from the shared
//! [`ApiKey`] on every call.

use async_trait::async_trait;
use serde::Serialize;
use vs_core::{AspectRatio, Resolution};

use crate::credential::ApiKey;
use crate::error::VeoError;
use crate::operation::Operation;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "veo-3.1-fast-generate-preview";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// The parameters of one generation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRequest {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
}

/// The two operations the poller needs from a video backend.
#[async_trait]
pub trait VideoApi: Send + Sync {
    /// Start a job and return its handle.
    async fn submit(&self, request: &VideoRequest) -> Result<Operation, VeoError>;

    /// Fetch the current state of a previously returned handle.
    async fn poll(&self, operation: &Operation) -> Result<Operation, VeoError>;
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: [PredictInstance<'a>; 1],
    parameters: PredictParameters<'a>,
}

#[derive(Serialize)]
struct PredictInstance<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters<'a> {
    aspect_ratio: &'a str,
    resolution: &'a str,
    sample_count: u32,
}

impl<'a> PredictRequest<'a> {
    fn new(request: &'a VideoRequest) -> Self {
        Self {
            instances: [PredictInstance {
                prompt: &request.prompt,
            }],
            parameters: PredictParameters {
                aspect_ratio: request.aspect_ratio.id(),
                resolution: request.resolution.id(),
                sample_count: 1,
            },
        }
    }
}

/// HTTP client for one Veo model.
pub struct VeoApi {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: ApiKey,
}

impl VeoApi {
    /// * `base_url` - API root, e.g. [`DEFAULT_BASE_URL`].
    /// * `model`    - model id, e.g. [`DEFAULT_MODEL`].
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: ApiKey) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, model, api_key)
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: ApiKey,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            model: model.into(),
            api_key,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn submit_url(&self) -> String {
        format!("{}/models/{}:predictLongRunning", self.base_url, self.model)
    }

    fn operation_url(&self, operation: &Operation) -> String {
        format!("{}/{}", self.base_url, operation.name.trim_start_matches('/'))
    }

    fn key(&self) -> Result<String, VeoError> {
        self.api_key.get().ok_or(VeoError::MissingApiKey)
    }

    // ---- private helpers ----

    /// Turn a non-2xx response into [`VeoError::Api`] with the body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, VeoError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(VeoError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_operation(response: reqwest::Response) -> Result<Operation, VeoError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<Operation>().await?)
    }
}

#[async_trait]
impl VideoApi for VeoApi {
    async fn submit(&self, request: &VideoRequest) -> Result<Operation, VeoError> {
        let key = self.key()?;

        let response = self
            .client
            .post(self.submit_url())
            .header(API_KEY_HEADER, key)
            .json(&PredictRequest::new(request))
            .send()
            .await?;

        let operation = Self::parse_operation(response).await?;
        tracing::info!(
            model = %self.model,
            operation = %operation.name,
            aspect_ratio = %request.aspect_ratio,
            resolution = %request.resolution,
            "Submitted video generation",
        );
        Ok(operation)
    }

    async fn poll(&self, operation: &Operation) -> Result<Operation, VeoError> {
        let key = self.key()?;

        let response = self
            .client
            .get(self.operation_url(operation))
            .header(API_KEY_HEADER, key)
            .send()
            .await?;

        let operation = Self::parse_operation(response).await?;
        tracing::debug!(
            operation = %operation.name,
            done = operation.done,
            "Polled video generation",
        );
        Ok(operation)
    }
}
