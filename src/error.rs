use thiserror::Error;

/// Main error type for the game backend
#[derive(Error, Debug)]
pub enum EngineError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors (embedding file load, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// User-correctable input errors
    #[error("{0}")]
    Validation(String),

    /// Too many requests within the current window
    #[error("Rate limit exceeded for scope '{scope}'")]
    RateLimited { scope: String },

    /// Upstream resource absent
    #[error("{0}")]
    NotFound(String),

    /// Upstream service unreachable or misbehaving
    #[error("Upstream '{service}' error: {message}")]
    Upstream { service: String, message: String },

    /// Embedding index errors
    #[error("Embedding index error: {0}")]
    Embedding(String),

    /// Unexpected internal faults
    #[error("{0}")]
    Internal(String),
}

impl From<String> for EngineError {
    fn from(s: String) -> Self {
        EngineError::Internal(s)
    }
}

impl From<&str> for EngineError {
    fn from(s: &str) -> Self {
        EngineError::Internal(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EngineError>;
