//! Common types used across the frontend application.
//!
//! # Categories
//!
//! - **Toast Types** - Transient notifications
//! - **Upload Types** - Status lines of the upload card
//! - **Error Types** - Browser integration failures

use std::fmt;

use textassist::BatchKind;

// =============================================================================
// Toast Types
// =============================================================================

/// Toast variant, drives the colour of the notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Default,
    Success,
    Error,
}

impl ToastKind {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            ToastKind::Default => "toast toast-default",
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
        }
    }
}

/// A notification in the toast stack.
#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub kind: ToastKind,
    /// Set while the exit animation plays.
    pub closing: bool,
}

// =============================================================================
// Upload Types
// =============================================================================

/// Line shown under the upload button.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadStatus {
    /// Per-file message while the batch runs.
    Working(String),
    /// The last file failed; the batch keeps going.
    FileFailed(String),
    /// Outcome of the whole batch.
    Finished { kind: BatchKind, line: String },
}

impl UploadStatus {
    pub fn starting(name: &str) -> Self {
        UploadStatus::Working(format!("Starting upload of {}...", name))
    }

    /// Live transfer line, percent rounded to a whole number.
    pub fn uploading(name: &str, percent: f64) -> Self {
        UploadStatus::Working(format!("Uploading {}: {}%", name, percent.round() as u8))
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            UploadStatus::Working(_) => "upload-status status-working",
            UploadStatus::FileFailed(_) => "upload-status status-error",
            UploadStatus::Finished { kind, .. } => match kind {
                BatchKind::AllSucceeded => "upload-status status-success",
                BatchKind::Partial => "upload-status status-partial",
                BatchKind::AllFailed => "upload-status status-error",
            },
        }
    }

    pub fn text(&self) -> &str {
        match self {
            UploadStatus::Working(text) | UploadStatus::FileFailed(text) => text,
            UploadStatus::Finished { line, .. } => line,
        }
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
///
/// Failures of the browser APIs wrapped by [`crate::services`].
#[derive(Clone, Debug)]
pub enum AppError {
    /// Local storage unavailable or rejected the write.
    Storage(String),
    /// Speech recognition or synthesis failed.
    Speech(String),
    /// Building or triggering a download failed.
    Download(String),
    /// Any other DOM call that threw.
    Dom(String),
}

impl AppError {
    /// Wraps a thrown JavaScript value.
    pub fn dom(value: wasm_bindgen::JsValue) -> Self {
        AppError::Dom(format!("{:?}", value))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Speech(msg) => write!(f, "Speech error: {}", msg),
            AppError::Download(msg) => write!(f, "Download error: {}", msg),
            AppError::Dom(msg) => write!(f, "DOM error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_status_classes() {
        let finished = UploadStatus::Finished {
            kind: BatchKind::Partial,
            line: "1 of 2 files uploaded. Some had issues.".into(),
        };
        assert_eq!(finished.css_class(), "upload-status status-partial");
        assert_eq!(finished.text(), "1 of 2 files uploaded. Some had issues.");
        assert_eq!(
            UploadStatus::FileFailed("Failed: a.pdf".into()).css_class(),
            "upload-status status-error"
        );
    }

    #[test]
    fn test_working_lines_follow_progress() {
        assert_eq!(UploadStatus::starting("a.pdf").text(), "Starting upload of a.pdf...");
        let line = UploadStatus::uploading("notes.txt", 41.6);
        assert_eq!(line.text(), "Uploading notes.txt: 42%");
        assert_eq!(line.css_class(), "upload-status status-working");
        assert_eq!(UploadStatus::uploading("a.pdf", 100.0).text(), "Uploading a.pdf: 100%");
    }

    #[test]
    fn test_app_error_display() {
        assert_eq!(
            AppError::Storage("quota".into()).to_string(),
            "Storage error: quota"
        );
    }
}
