//! Live adapter for `OpenRouter` image generation.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{http_client, UPSTREAM_TIMEOUT};
use crate::config::ProviderConfig;
use crate::error::ImageError;
use crate::ports::image_generator::{GenerateFuture, ImageGenerator, ImageRequest, ImageResult};
use crate::upstream_error::summarize_raw_body;

const PROVIDER: &str = "OpenRouter";
const MODEL_ENV: &str = "OPENROUTER_MODEL";

/// Live `OpenRouter` generator. Requires an API key.
pub struct OpenRouterGenerator {
    client: Client,
    config: ProviderConfig,
}

impl OpenRouterGenerator {
    /// Create a new `OpenRouter` generator from resolved configuration.
    ///
    /// A missing key is not an error here; each `generate` call reports it.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, ImageError> {
        Self::with_timeout(config, UPSTREAM_TIMEOUT)
    }

    /// Like [`OpenRouterGenerator::new`], with a custom bound on each upstream call.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_timeout(config: ProviderConfig, timeout: Duration) -> Result<Self, ImageError> {
        Ok(Self { client: http_client(timeout)?, config })
    }

    fn model(&self) -> &str {
        self.config.model.as_deref().unwrap_or_default()
    }
}

impl ImageGenerator for OpenRouterGenerator {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_> {
        let prompt = self.config.compose_prompt(request.sentence());
        Box::pin(async move {
            let Some(ref api_key) = self.config.credential else {
                return Err(ImageError::MissingApiKey {
                    provider: PROVIDER,
                    env_var: "OPENROUTER_API_KEY",
                });
            };

            let size = format!("{}x{}", self.config.width, self.config.height);
            let body = OpenRouterRequest {
                model: self.model(),
                messages: vec![ChatMessage { role: "user", content: &prompt }],
                prompt: &prompt,
                size: &size,
                n: 1,
            };

            let mut builder =
                self.client.post(&self.config.endpoint).bearer_auth(api_key).json(&body);
            if let Some(ref referer) = self.config.referer {
                builder = builder.header("HTTP-Referer", referer);
            }
            if let Some(ref title) = self.config.app_title {
                builder = builder.header("X-Title", title);
            }

            let response = builder
                .send()
                .await
                .map_err(|source| ImageError::Network { provider: PROVIDER, source })?;

            let status = response.status();
            let response_text = response
                .text()
                .await
                .map_err(|source| ImageError::Network { provider: PROVIDER, source })?;

            if !status.is_success() {
                return Err(ImageError::Api {
                    status: status.as_u16(),
                    message: summarize_raw_body(&response_text),
                });
            }

            let parsed: OpenRouterResponse =
                serde_json::from_str(&response_text).unwrap_or_default();

            let first = parsed.data.into_iter().next().unwrap_or_default();
            if let Some(b64) = first.b64_json.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                return Ok(ImageResult::from_base64(b64));
            }
            if let Some(url) = first.url.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                return Ok(ImageResult::Url(url.to_string()));
            }

            Err(ImageError::MissingImage(format!(
                "{PROVIDER} returned no image. \
                 Check that {MODEL_ENV} ('{}') names a model with image output.",
                self.model()
            )))
        })
    }
}

// --- OpenRouter API types ---

#[derive(Serialize)]
struct OpenRouterRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    prompt: &'a str,
    size: &'a str,
    n: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Default)]
struct OpenRouterResponse {
    #[serde(default)]
    data: Vec<OpenRouterImageData>,
}

#[derive(Deserialize, Default)]
struct OpenRouterImageData {
    b64_json: Option<String>,
    url: Option<String>,
}
