use leptos::*;

use crate::types::UploadStatus;

/// Batch progress bar and the status line under it.
#[component]
pub fn UploadProgress(
    percent: ReadSignal<Option<f64>>,
    label: ReadSignal<Option<String>>,
    status: ReadSignal<Option<UploadStatus>>,
) -> impl IntoView {
    view! {
        <div class="progress-section">
            <Show when=move || percent.get().is_some() fallback=|| view! {}>
                <div class="progress-header">
                    <span class="progress-label">{move || label.get().unwrap_or_default()}</span>
                    <span class="progress-percent">
                        {move || format!("{}%", percent.get().unwrap_or(0.0).round() as u8)}
                    </span>
                </div>
                <div class="progress-bar">
                    <div
                        class="progress-fill"
                        style=move || format!("width: {:.1}%;", percent.get().unwrap_or(0.0))
                    ></div>
                </div>
            </Show>
            {move || {
                status
                    .get()
                    .map(|status| view! { <div class=status.css_class()>{status.text().to_string()}</div> })
            }}
        </div>
    }
}
