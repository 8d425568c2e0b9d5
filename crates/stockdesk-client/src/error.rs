//! Error types for stockdesk-client

use thiserror::Error;

/// Failures while setting up the HTTP transport.
///
/// Request-time failures are reported through
/// [`stockdesk_core::TransportError`] instead.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Invalid base URL: {url} (expected http:// or https://)")]
    InvalidBaseUrl { url: String },

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}
