//! Live adapters that talk to (or point at) real providers.

pub mod openrouter;
pub mod pixazo;
pub mod pollinations;

use std::time::Duration;

use reqwest::Client;

use crate::error::ImageError;

/// Upper bound on one upstream round trip.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(90);

/// Build an HTTP client whose requests give up after `timeout`.
pub(crate) fn http_client(timeout: Duration) -> Result<Client, ImageError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ImageError::Internal(format!("failed to build HTTP client: {e}")))
}
