use thiserror::Error;

/// Main error type for the scent engine
#[derive(Error, Debug)]
pub enum ScentEngineError {
    /// Filesystem errors from the durable store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Id not present in the catalog
    #[error("No perfume with id '{0}' in the catalog")]
    UnknownPerfume(String),

    /// Interaction label outside the known set
    #[error("Unknown interaction kind: '{0}'")]
    InvalidAction(String),

    /// Questionnaire answer outside the 1-5 scale
    #[error("Answer for '{axis}' must be between 1 and 5, got {value}")]
    InvalidAnswer { axis: &'static str, value: i64 },

    /// Search query below the provider minimum length
    #[error("Query is {len} characters, providers require at least {min}")]
    QueryTooShort { len: usize, min: usize },

    /// Provider errors
    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    /// Durable store errors
    #[error("Store error: {0}")]
    Store(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<String> for ScentEngineError {
    fn from(s: String) -> Self {
        ScentEngineError::Other(s)
    }
}

impl From<&str> for ScentEngineError {
    fn from(s: &str) -> Self {
        ScentEngineError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ScentEngineError>;
