// Error types for gameshelf.
// Classifies Steam/Notion API failures, cache errors, and import-level errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transient API error: {0}")]
    Transient(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Invalid options: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShelfError {
    /// Whether a retry has any chance of succeeding.
    ///
    /// Network failures, non-success statuses, and malformed payloads are
    /// retryable; a missing store page or bad credentials are terminal.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ShelfError::Transient(_) | ShelfError::Http(_) | ShelfError::Json(_)
        )
    }

    /// Label used when rendering fatal errors to the operator.
    pub fn kind(&self) -> &'static str {
        match self {
            ShelfError::Auth(_) => "AuthError",
            ShelfError::NotFound(_) => "NotFoundError",
            ShelfError::Transient(_) | ShelfError::Http(_) => "TransientApiError",
            ShelfError::NoData(_) => "NoDataError",
            ShelfError::Config(_) => "ConfigError",
            ShelfError::Json(_) => "JsonError",
            ShelfError::Io(_) => "IoError",
        }
    }
}

pub type Result<T> = std::result::Result<T, ShelfError>;
