use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info};

use super::{GenerateContentRequest, GenerateContentResponse, ModelTransport, PredictRequest, PredictResponse};

/// Default REST root of the hosted model API
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// HTTP client for the hosted model API.
#[derive(Debug, Clone)]
pub struct GenAiClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl GenAiClient {
    /// Creates a client for the given API root and key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the HTTP client cannot be created.
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            anyhow::bail!("No API key configured. Set GEMINI_API_KEY in the environment or .env file");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{model}:{method}", self.api_base)
    }

    async fn post<B, R>(&self, url: &str, body: &B) -> anyhow::Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(url, "Calling model endpoint");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .context("Failed to reach the model API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Model API request failed with status {status}: {body}");
        }

        response
            .json::<R>()
            .await
            .context("Failed to parse model API response")
    }
}

impl ModelTransport for GenAiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> anyhow::Result<GenerateContentResponse> {
        info!(model, parts = request.contents.iter().map(|c| c.parts.len()).sum::<usize>(), "generateContent");
        let url = self.endpoint(model, "generateContent");
        self.post(&url, request).await
    }

    async fn predict(&self, model: &str, request: &PredictRequest) -> anyhow::Result<PredictResponse> {
        info!(model, samples = request.parameters.sample_count, "predict");
        let url = self.endpoint(model, "predict");
        self.post(&url, request).await
    }
}
