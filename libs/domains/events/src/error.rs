//! Event domain error types

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::mongodb::MongoError;
use thiserror::Error;

/// Result type for event operations
pub type Result<T> = std::result::Result<T, EventError>;

/// Event domain errors
#[derive(Debug, Error)]
pub enum EventError {
    /// Request is malformed or missing a required part
    #[error("{0}")]
    BadRequest(String),

    /// The multipart body could not be read
    #[error("{0}")]
    InvalidForm(String),

    /// The multipart body exceeds the upload limit
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Field-level validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The media host rejected or failed the upload
    #[error("Upload error: {0}")]
    Upload(String),

    /// The document store rejected or failed an operation
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// No event with the given slug
    #[error("Event '{0}' not found")]
    NotFound(String),

    /// A required setting (connection string, media credentials) is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<MongoError> for EventError {
    fn from(err: MongoError) -> Self {
        match err {
            MongoError::Configuration(message) => Self::Configuration(message),
            other => Self::Persistence(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for EventError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upload(err.to_string())
    }
}

// Convert to axum_helpers::AppError for HTTP responses
impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::BadRequest(message) => AppError::BadRequest(message),
            EventError::InvalidForm(message) => AppError::InvalidFormData(message),
            EventError::PayloadTooLarge(message) => AppError::PayloadTooLarge(message),
            EventError::Validation(errors) => AppError::ValidationError(errors),
            EventError::NotFound(_) => AppError::NotFound(err.to_string()),
            EventError::Upload(message) => AppError::Upstream(message),
            EventError::Persistence(message) => AppError::Database(message),
            EventError::Configuration(message) | EventError::Internal(message) => {
                AppError::InternalServerError(message)
            }
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
