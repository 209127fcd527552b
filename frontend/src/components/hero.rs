//! Hero section component

use leptos::*;

use crate::components::AnimatedGradient;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <AnimatedGradient/>
            <div class="hero-content">
                <h1>"Ask your documents"</h1>
                <p class="subtitle">
                    "Upload PDFs, Word files, presentations or plain text, "
                    "then ask TextAssist questions about them."
                </p>
            </div>
        </div>
    }
}
