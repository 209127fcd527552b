//! TextAssist - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for uploading documents and asking questions
//! about them. Upload orchestration, progress and chat state live in the
//! `textassist` core crate; this crate binds them to the browser.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (navigation, theme toggle)                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  "/"        AskPage                                          │
//! │             └── ChatSection (DocumentsSidebar, messages)     │
//! │  "/upload"  UploadPage                                       │
//! │             ├── Hero (AnimatedGradient)                      │
//! │             └── UploadSection (progress, history)            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                ToastContainer        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Common types (Toast, UploadStatus, AppError)
//! - [`components`] - UI components (Header, Upload, Chat, etc.)
//! - [`services`] - Browser integration (HTTP, storage, speech)

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Toasts
    Toast, ToastKind,
    // Upload
    UploadStatus,
    // Errors
    AppError, AppResult,
};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application
// =============================================================================

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    Toaster::provide();

    let theme = create_rw_signal(load_theme());
    create_effect(move |_| apply_theme(theme.get()));

    view! {
        <Title text=APP_NAME/>
        <Router>
            <Header theme=theme/>
            <main class="container">
                <Routes>
                    <Route path="/" view=AskPage/>
                    <Route path="/upload" view=UploadPage/>
                </Routes>
            </main>
            <Footer/>
            <ToastContainer/>
        </Router>
    }
}

#[component]
fn AskPage() -> impl IntoView {
    view! { <ChatSection/> }
}

#[component]
fn UploadPage() -> impl IntoView {
    view! {
        <Hero/>
        <UploadSection/>
    }
}
