use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed index schema; fatal at startup, never per-query
    #[error("Schema validation error: {0}")]
    SchemaValidation(String),

    /// The retrieval engine could not be reached (network, timeout)
    #[error("Retrieval transport error: {0}")]
    RetrievalTransport(String),

    /// The retrieval engine rejected the query
    #[error("Retrieval engine error: {0}")]
    RetrievalEngine(String),

    /// A facet group outside the schema's known set was referenced
    #[error("Invalid facet selection: {0}")]
    InvalidFacetSelection(String),

    /// Request validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::SchemaValidation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RetrievalTransport(_) => StatusCode::BAD_GATEWAY,
            AppError::RetrievalEngine(_) => StatusCode::BAD_GATEWAY,
            AppError::InvalidFacetSelection(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::SchemaValidation(_) => "SCHEMA_VALIDATION_ERROR",
            AppError::RetrievalTransport(_) => "RETRIEVAL_TRANSPORT_ERROR",
            AppError::RetrievalEngine(_) => "RETRIEVAL_ENGINE_ERROR",
            AppError::InvalidFacetSelection(_) => "INVALID_FACET_SELECTION",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to the end user.
    ///
    /// Retrieval failures must read as "results unavailable", never as zero
    /// results, and engine-internal detail must not leak past the boundary.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::RetrievalTransport(_) | AppError::RetrievalEngine(_) => {
                "Search results are temporarily unavailable"
            }
            AppError::Validation(_) | AppError::InvalidFacetSelection(_) => {
                "Invalid search request"
            }
            _ => "Internal server error",
        }
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        tracing::error!(
            error_code = error_code,
            status_code = status.as_u16(),
            detail = %self,
            "Request error"
        );

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.public_message(),
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Conversion from validator::ValidationErrors
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
