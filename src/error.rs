//! Unified error type for the gateway.

use thiserror::Error;

/// Errors that can occur while turning a sentence into an image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The inbound request was malformed or missing required input.
    #[error("{0}")]
    InvalidRequest(String),

    /// An upstream provider returned a non-success status.
    #[error("{message}")]
    Api {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Short message extracted from the error body.
        message: String,
    },

    /// The provider could not be reached (DNS, refused connection, timeout).
    #[error("{provider} connection failed: {source}")]
    Network {
        /// The provider name.
        provider: &'static str,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with success but no image could be located.
    #[error("{0}")]
    MissingImage(String),

    /// No API key configured for the provider.
    #[error("{provider} API key is not configured. Set {env_var} or store it in the keychain.")]
    MissingApiKey {
        /// The provider name.
        provider: &'static str,
        /// The environment variable name.
        env_var: &'static str,
    },

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything unanticipated.
    #[error("unexpected error: {0}")]
    Internal(String),
}

impl ImageError {
    /// HTTP status the gateway answers with for this error.
    ///
    /// Upstream statuses are forwarded verbatim; a value outside the valid
    /// HTTP range is reported as 502.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 400,
            Self::Api { status, .. } if (100..=999).contains(status) => *status,
            Self::Api { .. } => 502,
            _ => 500,
        }
    }
}
