//! Service context that bundles the configured port implementation.

use std::sync::Arc;

use crate::adapters::live::openrouter::OpenRouterGenerator;
use crate::adapters::live::pixazo::PixazoGenerator;
use crate::adapters::live::pollinations::PollinationsGenerator;
use crate::config::ProviderConfig;
use crate::error::ImageError;
use crate::ports::ImageGenerator;
use crate::provider::ProviderKind;

/// Bundles all port trait objects into a single context.
pub struct ServiceContext {
    /// Image generator port, shared by every request.
    pub generator: Arc<dyn ImageGenerator>,
}

impl ServiceContext {
    /// Create a live context for the configured provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter rejects its configuration.
    pub fn live(config: &ProviderConfig) -> Result<Self, ImageError> {
        let generator: Arc<dyn ImageGenerator> = match config.kind {
            ProviderKind::Pixazo => Arc::new(PixazoGenerator::new(config.clone())?),
            ProviderKind::OpenRouter => Arc::new(OpenRouterGenerator::new(config.clone())?),
            ProviderKind::Pollinations => Arc::new(PollinationsGenerator::new(config.clone())?),
        };
        Ok(Self { generator })
    }
}
