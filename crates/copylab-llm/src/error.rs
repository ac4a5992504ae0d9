use copylab_core::CollaboratorError;
use thiserror::Error;

/// Errors returned by the chat-completion client.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("{provider} returned status {status}: {message}")]
    ApiError {
        provider: String,
        status: u16,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The completion parsed but carried no usable content.
    #[error("{provider} returned an empty completion")]
    EmptyCompletion { provider: String },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The provider used up its share of the call budget.
    #[error("{provider} did not answer within {budget_ms} ms")]
    Timeout { provider: String, budget_ms: u64 },

    #[error("no providers configured")]
    NoProviders,

    /// Every provider in the chain failed.
    #[error("all {attempted} providers failed; last error: {last}")]
    Exhausted { attempted: usize, last: String },
}

impl From<LlmError> for CollaboratorError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Deserialize { .. } | LlmError::EmptyCompletion { .. } => {
                CollaboratorError::MalformedResponse(err.to_string())
            }
            LlmError::Exhausted { .. } | LlmError::NoProviders => {
                CollaboratorError::Exhausted(err.to_string())
            }
            LlmError::Http(_)
            | LlmError::ApiError { .. }
            | LlmError::Timeout { .. }
            | LlmError::InvalidBaseUrl { .. } => CollaboratorError::Request(err.to_string()),
        }
    }
}
