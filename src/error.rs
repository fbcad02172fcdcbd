//! Error types shared across the crate

use axum::http::StatusCode;
use thiserror::Error;

/// Errors surfaced by steak collection and session operations
#[derive(Debug, Error)]
pub enum GrillError {
    #[error("A cook session is running; stop it before changing steaks")]
    SessionRunning,

    #[error("A cook session is already running")]
    AlreadyRunning,

    #[error("No cook session is running")]
    NotRunning,

    #[error("Add at least one steak before starting the timer")]
    EmptyCollection,

    #[error("Notification permission required: enable notifications in the system settings to get steak timer alerts")]
    PermissionDenied,

    #[error("Saved steak not found: {0}")]
    SavedSteakNotFound(u64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl GrillError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// HTTP status used when this error reaches the control API
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::SessionRunning | Self::AlreadyRunning | Self::NotRunning => StatusCode::CONFLICT,
            Self::EmptyCollection | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::SavedSteakNotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors from the durable key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the notification service
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Unknown notification channel: {0}")]
    UnknownChannel(String),

    #[error("Notification service unavailable: {0}")]
    Unavailable(String),
}

pub type GrillResult<T> = Result<T, GrillError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type NotifyResult<T> = Result<T, NotifyError>;
