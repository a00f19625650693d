use async_trait::async_trait;

use crate::{
    ai::wire::{GenerateContentRequest, GenerateContentResponse},
    config::{AiConfig, ModelIds},
    foundation::error::{MemeError, MemeResult},
};

/// One `generateContent` round trip against a named model.
///
/// [`GeminiClient`] talks to the real service; tests plug in scripted fakes.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Send `request` to `model` and return the decoded response envelope.
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> MemeResult<GenerateContentResponse>;
}

/// REST client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Build a client sharing `http` for all calls.
    pub fn new(http: reqwest::Client, config: &AiConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Endpoint for `model`.
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    #[tracing::instrument(skip(self, request))]
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> MemeResult<GenerateContentResponse> {
        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| MemeError::service(format!("{model}: request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MemeError::service(format!(
                "{model}: HTTP {status}: {}",
                body.trim()
            )));
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| MemeError::service(format!("{model}: malformed response: {e}")))?;
        tracing::debug!(candidates = envelope.candidates.len(), "model replied");
        Ok(envelope)
    }
}

/// The three AI operations, bound to a transport and per-operation model ids.
///
/// Operations live in `caption`, `edit` and `analysis`.
#[derive(Debug, Clone)]
pub struct AiClient<M> {
    pub(crate) model: M,
    pub(crate) models: ModelIds,
}

impl<M: GenerativeModel> AiClient<M> {
    /// Wrap `model` with the given ids.
    pub fn new(model: M, models: ModelIds) -> Self {
        Self { model, models }
    }

    /// Underlying transport.
    pub fn transport(&self) -> &M {
        &self.model
    }

    /// Model ids in use.
    pub fn models(&self) -> &ModelIds {
        &self.models
    }
}

impl AiClient<GeminiClient> {
    /// Gemini-backed client from environment settings.
    pub fn gemini(http: reqwest::Client, config: &AiConfig) -> Self {
        Self::new(GeminiClient::new(http, config), config.models.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ai/model.rs"]
mod tests;
