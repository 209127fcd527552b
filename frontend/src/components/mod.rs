//! UI Components for the TextAssist application.
//!
//! # Layout Components
//! - [`Header`] - Navigation bar with theme toggle
//! - [`Hero`] - Title over the animated gradient
//! - [`Footer`] - Page footer
//! - [`ToastContainer`] - Notification stack, driven by [`Toaster`]
//!
//! # Feature Components
//! - [`UploadSection`] - Multi-file upload with drag & drop
//! - [`UploadProgress`] - Batch progress bar and status line
//! - [`UploadedFiles`] - Files uploaded this session
//! - [`ChatSection`] - Questions and answers over the documents
//! - [`DocumentsSidebar`] - Document list and selection
//! - `MessageBubble` - One chat message
//! - [`AnimatedGradient`] - Decorative particle canvas

mod header;
mod hero;
mod gradient;
mod toast;
mod upload;
mod progress;
mod history;
mod chat;
mod documents;
mod message;
mod footer;

pub use header::*;
pub use hero::*;
pub use gradient::*;
pub use toast::*;
pub use upload::*;
pub use progress::*;
pub use history::*;
pub use chat::*;
pub use documents::*;
pub use message::*;
pub use footer::*;
