//! Files uploaded during this session.

use chrono::Local;
use leptos::*;

use textassist::{format_file_size, format_time, UploadRecord};

#[component]
pub fn UploadedFiles(history: ReadSignal<Vec<UploadRecord>>) -> impl IntoView {
    view! {
        <Show when=move || !history.get().is_empty() fallback=|| view! {}>
            <div class="card uploaded-files">
                <h3>"Uploaded Files"</h3>
                <ul class="file-list">
                    <For
                        each=move || history.get()
                        key=|record| (record.name.clone(), record.uploaded_at)
                        children=move |record| {
                            let time = format_time(&record.uploaded_at.with_timezone(&Local));
                            view! {
                                <li class="file-item">
                                    <span class="file-icon">"📄"</span>
                                    <span class="file-name">{record.name}</span>
                                    <span class="file-meta">
                                        {format_file_size(record.size)} " • " {time}
                                    </span>
                                </li>
                            }
                        }
                    />
                </ul>
            </div>
        </Show>
    }
}
