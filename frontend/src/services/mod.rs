//! Browser services.
//!
//! # Services
//!
//! - [`api`] - HTTP transport implementing the core `Backend`
//! - [`timer`] - `setTimeout` clock for progress interpolation
//! - [`storage`] - Theme persistence
//! - [`speech`] - Voice input and read-aloud
//! - [`download`] - Transcript download

pub mod api;
pub mod timer;
pub mod storage;
pub mod speech;
pub mod download;

pub use api::*;
pub use timer::*;
pub use storage::*;
pub use speech::*;
pub use download::*;
