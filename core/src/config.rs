//! Pipeline and endpoint configuration.
//!
//! Defaults are compile-time constants. A host can override any of them
//! by building a [`PipelineConfig`] by hand.

/// Maximum file size accepted for staging (in bytes).
///
/// 50 MB limit.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Document extensions the backend knows how to ingest (lowercase, no dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "txt", "rtf", "ppt", "pptx"];

/// Share of the progress bar held back for the finalizing phase.
pub const FINALIZE_RESERVE_PERCENT: f64 = 5.0;

/// Number of ticks used to animate through the finalizing reserve.
pub const FINALIZE_STEPS: u32 = 5;

/// Interpolation never passes this fraction of a file's share
/// before the transport reports completion.
pub const INTERPOLATION_CEILING: f64 = 0.9;

/// Fraction of the remaining distance covered per interpolation tick.
pub const INTERPOLATION_RATE: f64 = 0.15;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Tunables for an [`crate::UploadPipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub max_file_size: u64,
    /// Lowercase extensions without the leading dot.
    pub allowed_extensions: Vec<String>,
    pub finalize_reserve: f64,
    pub finalize_steps: u32,
    pub interpolation_ceiling: f64,
    pub interpolation_rate: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            finalize_reserve: FINALIZE_RESERVE_PERCENT,
            finalize_steps: FINALIZE_STEPS,
            interpolation_ceiling: INTERPOLATION_CEILING,
            interpolation_rate: INTERPOLATION_RATE,
        }
    }
}

impl PipelineConfig {
    /// Human label of the accepted types, e.g. `PDF, DOCX, TXT`.
    pub fn allowed_label(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|e| e.to_uppercase())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Value for an `<input type="file" accept=...>` attribute.
    pub fn accept_attribute(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|e| format!(".{}", e))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// URLs of the remote API, derived from a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn upload(&self) -> String {
        format!("{}/api/upload/", self.base_url)
    }

    pub fn query(&self) -> String {
        format!("{}/api/query/", self.base_url)
    }

    pub fn documents(&self) -> String {
        format!("{}/api/documents/", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_strip_trailing_slash() {
        let endpoints = Endpoints::new("http://localhost:8000/");
        assert_eq!(endpoints.upload(), "http://localhost:8000/api/upload/");
        assert_eq!(endpoints.query(), "http://localhost:8000/api/query/");
        assert_eq!(endpoints.documents(), "http://localhost:8000/api/documents/");
    }

    #[test]
    fn test_accept_attribute() {
        let config = PipelineConfig::default();
        assert!(config.accept_attribute().starts_with(".pdf,.docx"));
        assert!(config.allowed_label().contains("PPTX"));
    }
}
