/// Error types for the translation service
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MtError {
    /// Language code outside the supported set
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
    /// Request rejected at the boundary
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Error reported by a translation backend
    #[error("Translation error: {0}")]
    TranslationError(String),
    /// Error raised by a language estimator
    #[error("Detection error: {0}")]
    DetectionError(String),
    /// Dictionary resource could not be read or parsed
    #[error("Dictionary error: {0}")]
    DictionaryError(String),
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Transport-level failure talking to a remote backend
    #[error("Network error: {0}")]
    NetworkError(String),
}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MtError::NetworkError(format!("Request timed out: {}", err))
        } else {
            MtError::NetworkError(err.to_string())
        }
    }
}

/// Result type for translation operations
pub type MtResult<T> = Result<T, MtError>;
