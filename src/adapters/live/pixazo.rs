//! Live adapter for the Pixazo image generation API.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use super::{http_client, UPSTREAM_TIMEOUT};
use crate::config::ProviderConfig;
use crate::error::ImageError;
use crate::normalize::find_image_reference;
use crate::ports::image_generator::{GenerateFuture, ImageGenerator, ImageRequest};
use crate::upstream_error::describe_upstream_error;

const PROVIDER: &str = "Pixazo";

/// Live Pixazo generator. Anonymous calls are allowed when no key is set.
pub struct PixazoGenerator {
    client: Client,
    config: ProviderConfig,
}

impl PixazoGenerator {
    /// Create a new Pixazo generator from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, ImageError> {
        Self::with_timeout(config, UPSTREAM_TIMEOUT)
    }

    /// Like [`PixazoGenerator::new`], with a custom bound on each upstream call.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_timeout(config: ProviderConfig, timeout: Duration) -> Result<Self, ImageError> {
        Ok(Self { client: http_client(timeout)?, config })
    }
}

impl ImageGenerator for PixazoGenerator {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_> {
        let prompt = self.config.compose_prompt(request.sentence());
        Box::pin(async move {
            let body = PixazoRequest {
                prompt: &prompt,
                width: self.config.width,
                height: self.config.height,
            };

            let mut builder = self.client.post(&self.config.endpoint).json(&body);
            if let Some(ref key) = self.config.credential {
                builder = builder.bearer_auth(key);
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
                    message: describe_upstream_error(&response_text),
                });
            }

            let parsed: serde_json::Value = serde_json::from_str(&response_text).map_err(|e| {
                ImageError::MissingImage(format!(
                    "{PROVIDER} returned a response that is not JSON: {e}"
                ))
            })?;

            find_image_reference(&parsed).ok_or_else(|| {
                ImageError::MissingImage(format!(
                    "{PROVIDER} responded successfully but no image could be found in the response"
                ))
            })
        })
    }
}

// --- Pixazo API request types ---

#[derive(Serialize)]
struct PixazoRequest<'a> {
    prompt: &'a str,
    width: u32,
    height: u32,
}
