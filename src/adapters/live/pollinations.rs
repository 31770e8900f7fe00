//! Pollinations adapter: builds a public image URL, the browser does the fetch.

use crate::config::ProviderConfig;
use crate::error::ImageError;
use crate::ports::image_generator::{GenerateFuture, ImageGenerator, ImageRequest, ImageResult};

const PROVIDER: &str = "Pollinations";
const PROMPT_PLACEHOLDER: &str = "{prompt}";

/// URL-template generator. Never issues a request and never fails once built.
pub struct PollinationsGenerator {
    config: ProviderConfig,
}

impl PollinationsGenerator {
    /// Create a new Pollinations generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is empty or has no `{prompt}` placeholder.
    pub fn new(config: ProviderConfig) -> Result<Self, ImageError> {
        if config.endpoint.trim().is_empty() {
            return Err(ImageError::Config("POLLINATIONS_URL_TEMPLATE is empty".into()));
        }
        if !config.endpoint.contains(PROMPT_PLACEHOLDER) {
            return Err(ImageError::Config(format!(
                "POLLINATIONS_URL_TEMPLATE must contain {PROMPT_PLACEHOLDER}, got '{}'",
                config.endpoint
            )));
        }
        Ok(Self { config })
    }

    /// Render the image URL for one sentence.
    #[must_use]
    pub fn image_url(&self, request: &ImageRequest) -> String {
        let prompt = self.config.compose_prompt(request.sentence());
        self.config
            .endpoint
            .replace(PROMPT_PLACEHOLDER, &urlencoding::encode(&prompt))
            .replace("{width}", &self.config.width.to_string())
            .replace("{height}", &self.config.height.to_string())
    }
}

impl ImageGenerator for PollinationsGenerator {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_> {
        let url = self.image_url(request);
        Box::pin(async move { Ok(ImageResult::Url(url)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderKind;

    fn config(template: &str, prefix: &str) -> ProviderConfig {
        ProviderConfig {
            kind: ProviderKind::Pollinations,
            endpoint: template.into(),
            credential: None,
            credential_var: "POLLINATIONS_API_KEY".into(),
            model: None,
            width: 640,
            height: 480,
            prompt_prefix: prefix.into(),
            referer: None,
            app_title: None,
        }
    }

    #[test]
    fn renders_encoded_prompt_and_size() {
        let generator = PollinationsGenerator::new(config(
            "https://img.test/prompt/{prompt}?width={width}&height={height}&nologo=true",
            "Crayon:",
        ))
        .unwrap();
        let request = ImageRequest::new("a cat & a dog?").unwrap();
        assert_eq!(
            generator.image_url(&request),
            "https://img.test/prompt/Crayon%3Aa%20cat%20%26%20a%20dog%3F\
             ?width=640&height=480&nologo=true"
        );
    }

    #[test]
    fn encodes_non_ascii() {
        let generator =
            PollinationsGenerator::new(config("https://img.test/{prompt}", "")).unwrap();
        let request = ImageRequest::new("기차").unwrap();
        assert_eq!(generator.image_url(&request), "https://img.test/%EA%B8%B0%EC%B0%A8");
    }

    #[tokio::test]
    async fn generate_returns_url() {
        let generator =
            PollinationsGenerator::new(config("https://img.test/{prompt}", "")).unwrap();
        let request = ImageRequest::new("moon").unwrap();
        let result = generator.generate(&request).await.unwrap();
        assert_eq!(result, ImageResult::Url("https://img.test/moon".into()));
    }

    #[test]
    fn empty_template_rejected() {
        assert!(matches!(
            PollinationsGenerator::new(config("  ", "")),
            Err(ImageError::Config(_))
        ));
    }

    #[test]
    fn template_without_placeholder_rejected() {
        let err =
            PollinationsGenerator::new(config("https://img.test/static.png", "")).err().unwrap();
        assert!(err.to_string().contains("{prompt}"));
    }
}
