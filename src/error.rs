use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected response shape: {0}")]
    Shape(String),

    #[error("Invalid timestamp: {0}")]
    Timestamp(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
