//! Error types module
//!
//! Every failure the upload pipeline can produce is a variant of `AppError`. Each
//! variant self-describes how it is presented over HTTP through `ErrorMetadata`, so
//! handlers only decide *which* error happened, never how it is rendered.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for rejected but well-formed requests
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_UNAVAILABLE")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Record lookup failed: {0}")]
    RecordLookupFailed(String),

    #[error("Record update failed: {0}")]
    RecordUpdateFailed(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Entropy unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidIdentifier(format!("Invalid video ID: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::InvalidIdentifier(_) => (400, "INVALID_IDENTIFIER", false, LogLevel::Debug),
        AppError::Unauthenticated(_) => (401, "UNAUTHENTICATED", false, LogLevel::Debug),
        AppError::Forbidden(_) => (403, "FORBIDDEN", false, LogLevel::Warn),
        AppError::MalformedRequest(_) => (400, "MALFORMED_REQUEST", false, LogLevel::Debug),
        AppError::UnsupportedMediaType(_) => {
            (400, "UNSUPPORTED_MEDIA_TYPE", false, LogLevel::Debug)
        }
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::RecordLookupFailed(_) => (500, "RECORD_LOOKUP_FAILED", true, LogLevel::Error),
        AppError::RecordUpdateFailed(_) => (500, "RECORD_UPDATE_FAILED", true, LogLevel::Error),
        AppError::StorageUnavailable(_) => (500, "STORAGE_UNAVAILABLE", true, LogLevel::Error),
        AppError::EntropyUnavailable(_) => (500, "ENTROPY_UNAVAILABLE", true, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for logs
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidIdentifier(_) => "InvalidIdentifier",
            AppError::Unauthenticated(_) => "Unauthenticated",
            AppError::Forbidden(_) => "Forbidden",
            AppError::MalformedRequest(_) => "MalformedRequest",
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::NotFound(_) => "NotFound",
            AppError::RecordLookupFailed(_) => "RecordLookupFailed",
            AppError::RecordUpdateFailed(_) => "RecordUpdateFailed",
            AppError::StorageUnavailable(_) => "StorageUnavailable",
            AppError::EntropyUnavailable(_) => "EntropyUnavailable",
            AppError::Internal(_) => "Internal",
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidIdentifier(ref msg) => msg.clone(),
            AppError::Unauthenticated(ref msg) => msg.clone(),
            AppError::Forbidden(ref msg) => msg.clone(),
            AppError::MalformedRequest(ref msg) => msg.clone(),
            AppError::UnsupportedMediaType(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::RecordLookupFailed(_) => "Failed to fetch video record".to_string(),
            AppError::RecordUpdateFailed(_) => "Failed to update video record".to_string(),
            AppError::StorageUnavailable(_) => "Failed to store upload".to_string(),
            AppError::EntropyUnavailable(_) => "Failed to generate storage key".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}
