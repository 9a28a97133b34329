//! Image generation and model listing against an OpenAI-compatible API.

use tracing::{debug, info};

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::error::{ChatError, ChatResult};
use crate::models::{ImageRequest, ImageResponse, ImageSize};
use crate::traits::{Headers, HttpClient, Response};

/// Client for the image and model endpoints.
pub struct ImageClient<C: HttpClient> {
    config: ClientConfig,
    http: C,
}

impl ImageClient<ReqwestHttpClient> {
    pub fn from_config(config: ClientConfig) -> Result<Self, ChatError> {
        let http = ReqwestHttpClient::with_optional_timeout(config.request_timeout())?;
        Ok(Self::new(config, http))
    }
}

impl<C: HttpClient> ImageClient<C> {
    pub fn new(config: ClientConfig, http: C) -> Self {
        Self { config, http }
    }

    /// Generate `n` images at the size configured for the current model.
    pub async fn generate(&self, prompt: &str, n: u32) -> ChatResult<ImageResponse> {
        let size = self.config.image_sizes.for_model(self.config.image_model);
        self.generate_with_size(prompt, n, size).await
    }

    /// Generate `n` images at an explicit size.
    pub async fn generate_with_size(
        &self,
        prompt: &str,
        n: u32,
        size: ImageSize,
    ) -> ChatResult<ImageResponse> {
        let headers = self.auth_headers()?;
        let request = ImageRequest {
            model: self.config.image_model,
            prompt: prompt.to_string(),
            n,
            size,
            stream: false,
        };
        let body = serde_json::to_string(&request)
            .map_err(|e| ChatError::InvalidResponse(format!("request encoding failed: {}", e)))?;
        let url = self.config.openai_url("images/generations");

        info!(model = %request.model, size = %size, n, "requesting image generation");
        let response = self.http.post(&url, &body, &headers).await?;
        let response = ensure_success(response)?;

        let images: ImageResponse = response
            .json()
            .map_err(|e| ChatError::InvalidResponse(format!("image response: {}", e)))?;
        debug!(count = images.data.len(), "images generated");
        Ok(images)
    }

    /// List the models available to the configured key.
    ///
    /// The document is returned as received.
    pub async fn list_models(&self) -> ChatResult<serde_json::Value> {
        let headers = self.auth_headers()?;
        let url = self.config.openai_url("models");

        debug!(url = %url, "listing models");
        let response = ensure_success(self.http.get(&url, &headers).await?)?;
        response
            .json()
            .map_err(|e| ChatError::InvalidResponse(format!("model list: {}", e)))
    }

    fn auth_headers(&self) -> Result<Headers, ChatError> {
        let key = self
            .config
            .openai_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ChatError::Config("no image API key configured".to_string()))?;

        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Authorization".to_string(), format!("Bearer {}", key));
        Ok(headers)
    }
}

fn ensure_success(response: Response) -> Result<Response, ChatError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ChatError::Status {
            status: response.status,
            body: response.text_lossy(),
        })
    }
}
