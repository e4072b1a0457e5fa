//! Error types for the Skylift backend

use thiserror::Error;

/// Main error type for the Skylift backend
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Remote fetch failed: {0}")]
    RemoteFetchError(String),

    #[error("Provisioning rejected: {0}")]
    ProvisioningError(String),

    #[error("Resource already exists: {0}")]
    ConflictError(String),

    #[error("Archive error: {0}")]
    ArchiveError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Shutdown error: {0}")]
    ShutdownError(String),
}
