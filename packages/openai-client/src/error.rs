//! Error types for the chat completion client.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// Client errors.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failed or the request could not be sent
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete within the client timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Non-2xx response, rate limit, empty choice list
    #[error("API error: {0}")]
    Api(String),

    /// Response body was not in the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for OpenAIError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            OpenAIError::Timeout(err.to_string())
        } else if err.is_decode() {
            OpenAIError::Parse(err.to_string())
        } else {
            OpenAIError::Network(err.to_string())
        }
    }
}
