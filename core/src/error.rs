//! Error types for the TextAssist client core.
//!
//! - [`StageError`] - Rejections while staging files (never fatal)
//! - [`TransportError`] - The host could not obtain an HTTP response
//! - [`ApiError`] - Normalized failure of any remote endpoint
//! - [`UploadFailed`] - Per-file outcome of a failed upload
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Staging Errors
// =============================================================================

/// Reasons a candidate file is not added to the upload batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StageError {
    /// Extension is not in the allow-list.
    #[error("File {name} is not a supported document type ({allowed}).")]
    InvalidType { name: String, allowed: String },

    /// File exceeds the configured size ceiling.
    #[error("File {name} is larger than {limit_label}.")]
    TooLarge {
        name: String,
        size: u64,
        limit: u64,
        limit_label: String,
    },

    /// Same identity key as a file already staged.
    #[error("{name} is already in the list.")]
    Duplicate { name: String },
}

impl StageError {
    /// Short title for a notification.
    pub fn title(&self) -> &'static str {
        match self {
            StageError::InvalidType { .. } => "Invalid File Type",
            StageError::TooLarge { .. } => "File Too Large",
            StageError::Duplicate { .. } => "Duplicate File",
        }
    }

    /// Name of the rejected file.
    pub fn file_name(&self) -> &str {
        match self {
            StageError::InvalidType { name, .. }
            | StageError::TooLarge { name, .. }
            | StageError::Duplicate { name } => name,
        }
    }

    /// Duplicates are informational; the other kinds are errors.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StageError::Duplicate { .. })
    }
}

// =============================================================================
// Transport Errors
// =============================================================================

/// Raised by a [`crate::api::Backend`] when no HTTP response was received.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

// =============================================================================
// API Errors
// =============================================================================

/// Normalized failure of a request to the remote API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Request never completed (offline, CORS, DNS, aborted).
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx status, or a 2xx body reporting `success: false`.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Body could not be parsed as the expected JSON.
    #[error("Invalid server response: {0}")]
    MalformedResponse(String),
}

impl ApiError {
    /// Message suitable for inline display, without the kind prefix.
    pub fn reason(&self) -> &str {
        match self {
            ApiError::Network(msg) => msg,
            ApiError::Server { message, .. } => message,
            ApiError::MalformedResponse(_) => "Invalid server response",
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Network(err.0)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::MalformedResponse(err.to_string())
    }
}

// =============================================================================
// Upload Outcome Errors
// =============================================================================

/// A single file of a batch could not be uploaded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Upload of {file_name} failed: {reason}")]
pub struct UploadFailed {
    pub file_name: String,
    #[source]
    pub reason: ApiError,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for staging a single candidate.
pub type StageResult<T> = Result<T, StageError>;

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_becomes_network() {
        let err: ApiError = TransportError::new("connection refused").into();
        assert_eq!(err, ApiError::Network("connection refused".into()));
        assert_eq!(err.reason(), "connection refused");
    }

    #[test]
    fn test_upload_failed_format() {
        let err = UploadFailed {
            file_name: "report.pdf".into(),
            reason: ApiError::Server {
                status: 500,
                message: "disk full".into(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("report.pdf"));
        assert!(msg.contains("500"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_stage_error_titles() {
        let dup = StageError::Duplicate { name: "a.pdf".into() };
        assert!(dup.is_duplicate());
        assert_eq!(dup.title(), "Duplicate File");
        assert_eq!(dup.to_string(), "a.pdf is already in the list.");
        assert_eq!(dup.file_name(), "a.pdf");
    }
}
