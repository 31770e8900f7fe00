//! Image generator port for third-party illustration providers.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::error::ImageError;

/// MIME type assumed for bare base64 payloads.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// A request to illustrate one sentence.
///
/// The sentence is trimmed and guaranteed non-empty; the only way to build
/// one is [`ImageRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    sentence: String,
}

impl ImageRequest {
    /// Validate and wrap a raw sentence.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidRequest`] if the sentence is empty after trimming.
    pub fn new(raw: &str) -> Result<Self, ImageError> {
        let sentence = raw.trim();
        if sentence.is_empty() {
            return Err(ImageError::InvalidRequest("sentence is required".into()));
        }
        Ok(Self { sentence: sentence.to_string() })
    }

    /// The trimmed sentence.
    #[must_use]
    pub fn sentence(&self) -> &str {
        &self.sentence
    }
}

/// A located image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageResult {
    /// An absolute `http(s)` URL, or a `data:` URI that is not base64 encoded.
    Url(String),
    /// Inline base64 image bytes.
    DataUri {
        /// MIME type (e.g., `"image/png"`).
        mime_type: String,
        /// Base64 payload, passed through unvalidated.
        data: String,
    },
}

impl ImageResult {
    /// Wrap a bare base64 payload as a PNG data URI.
    #[must_use]
    pub fn from_base64(data: &str) -> Self {
        Self::DataUri { mime_type: DEFAULT_IMAGE_MIME.to_string(), data: data.to_string() }
    }

    /// Interpret a string as an image reference.
    ///
    /// Accepts `http://`, `https://` and `data:image/` prefixes; anything else
    /// is not a reference.
    #[must_use]
    pub fn from_reference(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            return Some(Self::Url(value.to_string()));
        }
        let rest = value.strip_prefix("data:")?;
        if !rest.starts_with("image/") {
            return None;
        }
        match rest.split_once(";base64,") {
            Some((mime_type, data)) => {
                Some(Self::DataUri { mime_type: mime_type.to_string(), data: data.to_string() })
            }
            None => Some(Self::Url(value.to_string())),
        }
    }
}

impl fmt::Display for ImageResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::DataUri { mime_type, data } => write!(f, "data:{mime_type};base64,{data}"),
        }
    }
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ImageResult, ImageError>> + Send + 'a>>;

/// Turns a sentence into an image reference via an external provider.
pub trait ImageGenerator: Send + Sync {
    /// Human-readable provider name used in logs.
    fn name(&self) -> &'static str;

    /// Generate an image for the given request.
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_>;
}
