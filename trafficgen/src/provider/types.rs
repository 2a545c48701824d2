//! Provider error types.

use thiserror::Error;

/// Errors that can occur when talking to remote HTTP services.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Transport failure or non-success HTTP status.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The service answered successfully but with an empty body.
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// Provider configuration is unusable.
    #[error("Invalid provider configuration: {0}")]
    InvalidConfig(String),
}
