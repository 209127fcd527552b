//! # TextAssist core - upload pipeline and chat model
//!
//! Framework-independent logic of the TextAssist document Q&A client.
//! The browser frontend binds these types to the DOM; everything here
//! runs (and is tested) natively.
//!
//! ## Upload flow
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Selection  │────▶│   Staging   │────▶│  Sequential │────▶│   Summary   │
//! │ (drop/pick) │     │ (validate)  │     │   uploads   │     │ all/partial │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                               │
//!                                               ▼
//!                                        Progress events
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use textassist::{FileMeta, StagedFile, UploadPipeline, UploadEvent};
//!
//! let pipeline = UploadPipeline::default();
//! pipeline.stage(vec![StagedFile::new(FileMeta::new("report.pdf", 1024), handle)]);
//! let log_event = |e: &UploadEvent| log::debug!("{:?}", e);
//! let summary = pipeline.submit(&backend, &ticker, &log_event).await;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`config`] - Pipeline defaults and API endpoints
//! - [`staging`] - File metadata, validation, duplicate-free batch
//! - [`progress`] - Monotonic cumulative progress
//! - [`pipeline`] - Sequential upload orchestration
//! - [`api`] - Host transport traits and response normalization
//! - [`chat`] - Conversation and document selection
//! - [`markdown`] - Safe markdown subset renderer
//! - [`theme`] - Light/dark preference
//! - [`gradient`] - Animated gradient particle field
//! - [`format`] - Sizes and timestamps for display

// Core modules
pub mod error;
pub mod config;

// Upload
pub mod staging;
pub mod progress;
pub mod pipeline;

// Remote API
pub mod api;

// Chat
pub mod chat;
pub mod markdown;

// Presentation helpers
pub mod theme;
pub mod gradient;
pub mod format;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{ApiError, ApiResult, StageError, TransportError, UploadFailed};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{Endpoints, PipelineConfig, DEFAULT_MAX_FILE_SIZE, UPLOAD_FIELD};

// =============================================================================
// Re-exports - Upload pipeline
// =============================================================================

pub use staging::{FileKey, FileMeta, StageReport, StagedBatch, StagedFile};
pub use progress::{ProgressTracker, TransferProgress};
pub use pipeline::{
    BatchKind,
    BatchSummary,
    UploadEvent,
    UploadObserver,
    UploadOutcome,
    UploadPipeline,
    UploadRecord,
};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::{
    fetch_documents,
    submit_query,
    Backend,
    DocumentsResponse,
    HttpReply,
    QueryRequest,
    QueryResponse,
    Ticker,
    UploadResponse,
};

// =============================================================================
// Re-exports - Chat & presentation
// =============================================================================

pub use chat::{can_send, transcript_file_name, ChatMessage, Conversation, DocumentSelection, Role};
pub use markdown::{escape_html, render_markdown};
pub use theme::Theme;
pub use gradient::{hsl_to_rgb, sync_field, Density, ParticleField};
pub use format::{format_date, format_file_size, format_time};
