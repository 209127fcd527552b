//! Multi-file upload card with drag & drop support.
//!
//! Files are staged and validated first, then sent one at a time by the
//! core [`UploadPipeline`] when the user presses upload.

use std::rc::Rc;

use leptos::*;
use web_sys::{DragEvent, Event, FileList, HtmlInputElement};

use textassist::{
    format_file_size, FileMeta, StagedFile, UploadEvent, UploadPipeline, UploadRecord,
};

use crate::components::{Toaster, UploadProgress, UploadedFiles};
use crate::config::API_BASE_URL;
use crate::services::{BrowserBackend, TimeoutTicker};
use crate::types::{ToastKind, UploadStatus};

/// Wraps a browser file list as stageable files.
fn candidates(files: &FileList) -> Vec<StagedFile<web_sys::File>> {
    (0..files.length())
        .filter_map(|i| files.get(i))
        .map(|file| {
            let meta = FileMeta::new(file.name(), file.size() as u64)
                .with_mime(file.type_())
                .with_last_modified(file.last_modified() as i64);
            StagedFile::new(meta, file)
        })
        .collect()
}

#[component]
pub fn UploadSection() -> impl IntoView {
    let toaster = expect_context::<Toaster>();
    let pipeline = store_value(Rc::new(UploadPipeline::<web_sys::File>::default()));

    let (staged, set_staged) = create_signal(Vec::<FileMeta>::new());
    let (history, set_history) = create_signal(Vec::<UploadRecord>::new());
    let (submitting, set_submitting) = create_signal(false);
    let (percent, set_percent) = create_signal(None::<f64>);
    let (label, set_label) = create_signal(None::<String>);
    let (status, set_status) = create_signal(None::<UploadStatus>);
    let (drag_active, set_drag_active) = create_signal(false);
    let current_file = store_value(String::new());

    let file_input = create_node_ref::<html::Input>();
    let (allowed_label, accept, max_size) = pipeline.with_value(|p| {
        let config = p.config();
        (config.allowed_label(), config.accept_attribute(), format_file_size(config.max_file_size))
    });

    let add_files = move |files: FileList| {
        let report = pipeline.with_value(|p| p.stage(candidates(&files)));

        for rejection in &report.rejected {
            let kind = if rejection.is_duplicate() {
                ToastKind::Default
            } else {
                ToastKind::Error
            };
            toaster.show(rejection.title(), rejection.to_string(), kind);
        }
        if report.nothing_usable() {
            toaster.show("No Valid Files", "No valid files were selected or added.", ToastKind::Default);
        }

        log::info!("📎 {} file(s) staged, {} rejected", report.added.len(), report.rejected.len());
        set_staged.set(pipeline.with_value(|p| p.staged()));
        if !report.added.is_empty() {
            set_status.set(None);
        }
    };

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(files) = input.files() {
            add_files(files);
        }
        // Allows picking the same file again.
        input.set_value("");
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_drag_active.set(false);
        if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
            add_files(files);
        }
    };

    let trigger_file_input = move |_| {
        if submitting.get_untracked() {
            return;
        }
        if let Some(input) = file_input.get_untracked() {
            input.click();
        }
    };

    let remove_file = move |index: usize| {
        if let Some(meta) = pipeline.with_value(|p| p.unstage(index)) {
            toaster.show(
                "File Removed",
                format!("{} has been removed from the selection.", meta.name),
                ToastKind::Default,
            );
            set_staged.set(pipeline.with_value(|p| p.staged()));
        }
    };

    let on_upload = move |_| {
        let pipeline = pipeline.get_value();
        if pipeline.is_submitting() || pipeline.staged_count() == 0 {
            return;
        }

        set_submitting.set(true);
        set_status.set(None);
        set_percent.set(Some(0.0));

        spawn_local(async move {
            let observer = {
                let pipeline = pipeline.clone();
                move |event: &UploadEvent| match event {
                    UploadEvent::BatchStarted { total } => {
                        log::info!("📤 Uploading {} file(s)", total);
                    }
                    UploadEvent::FileStarted { index, total, name } => {
                        current_file.set_value(name.clone());
                        let position = format!("({}/{})", index + 1, total);
                        set_label.set(Some(format!("Uploading {} {}...", name, position)));
                        set_status.set(Some(UploadStatus::starting(name)));
                    }
                    UploadEvent::Progress { percent } => {
                        set_percent.set(Some(*percent));
                        current_file.with_value(|name| {
                            set_status.set(Some(UploadStatus::uploading(name, *percent)))
                        });
                    }
                    UploadEvent::FileSucceeded { name, message, .. } => {
                        log::info!("✅ {} uploaded: {}", name, message.as_deref().unwrap_or("ok"));
                        toaster.show(
                            "Upload Successful",
                            format!("{} processed.", name),
                            ToastKind::Success,
                        );
                        set_history.set(pipeline.history());
                    }
                    UploadEvent::FileFailed { failure, .. } => {
                        log::error!("❌ {}", failure);
                        let reason = failure.reason.reason().to_string();
                        toaster.show(
                            "Upload Failed",
                            format!("{}: {}", failure.file_name, reason),
                            ToastKind::Error,
                        );
                        set_status.set(Some(UploadStatus::FileFailed(format!(
                            "Failed: {} - {}",
                            failure.file_name, reason
                        ))));
                    }
                    UploadEvent::Finalizing => set_label.set(Some("Finalizing...".to_string())),
                    UploadEvent::BatchFinished(summary) => {
                        log::info!("🏁 {}", summary.status_line());
                        set_status.set(Some(UploadStatus::Finished {
                            kind: summary.kind(),
                            line: summary.status_line(),
                        }));
                    }
                }
            };

            let backend = BrowserBackend::new(API_BASE_URL);
            let summary = pipeline.submit(&backend, &TimeoutTicker::default(), &observer).await;
            if summary.is_none() {
                log::warn!("Upload skipped: nothing staged or already running");
            }

            set_staged.set(pipeline.staged());
            set_history.set(pipeline.history());
            // The bar stays at 100% until the next batch resets it.
            if summary.is_some() {
                set_label.set(Some("Upload complete".to_string()));
            } else {
                set_percent.set(None);
                set_label.set(None);
            }
            set_submitting.set(false);
        });
    };

    let staged_count = move || staged.with(|files| files.len());
    let staged_size = move || format_file_size(staged.with(|files| files.iter().map(|f| f.size).sum()));

    view! {
        <div class="card upload-card">
            <div
                class="upload-section"
                class:drag-active=move || drag_active.get()
                class:disabled=move || submitting.get()
                on:click=trigger_file_input
                on:dragenter=move |ev: DragEvent| {
                    ev.prevent_default();
                    set_drag_active.set(true);
                }
                on:dragover=move |ev: DragEvent| {
                    ev.prevent_default();
                    set_drag_active.set(true);
                }
                on:dragleave=move |ev: DragEvent| {
                    ev.prevent_default();
                    set_drag_active.set(false);
                }
                on:drop=on_drop
            >
                <div class="upload-icon">"📤"</div>
                <Show
                    when=move || { staged_count() > 0 }
                    fallback=move || {
                        let allowed_label = allowed_label.clone();
                        let max_size = max_size.clone();
                        view! {
                            <div class="upload-text">"Drag and drop or click to upload"</div>
                            <div class="upload-hint">{format!("{} (Max {})", allowed_label, max_size)}</div>
                        }
                    }
                >
                    <div class="upload-text">
                        {move || format!("{} file(s) selected for upload.", staged_count())}
                    </div>
                    <div class="upload-hint">{move || format!("Total size: {}", staged_size())}</div>
                </Show>
                <input
                    type="file"
                    multiple=true
                    accept=accept
                    style="display:none"
                    node_ref=file_input
                    on:click=|ev| ev.stop_propagation()
                    on:change=on_file_change
                />
            </div>

            <Show when=move || { staged_count() > 0 } fallback=|| view! {}>
                <ul class="file-list staged-files">
                    <For
                        each=move || staged.get().into_iter().enumerate()
                        key=|(index, file)| (*index, file.key())
                        children=move |(index, file)| {
                            view! {
                                <li class="file-item">
                                    <span class="file-icon">"📄"</span>
                                    <span class="file-name">{file.name.clone()}</span>
                                    <span class="file-meta">{format_file_size(file.size)}</span>
                                    <button
                                        class="file-remove"
                                        title="Remove file"
                                        disabled=move || submitting.get()
                                        on:click=move |_| remove_file(index)
                                    >
                                        "×"
                                    </button>
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>

            <button
                class="upload-button"
                disabled=move || submitting.get() || staged_count() == 0
                on:click=on_upload
            >
                {move || {
                    if submitting.get() {
                        label.get().unwrap_or_else(|| "Uploading...".to_string())
                    } else if staged_count() > 0 {
                        format!("Upload {} File(s)", staged_count())
                    } else {
                        "Upload Document".to_string()
                    }
                }}
            </button>

            <UploadProgress percent=percent label=label status=status/>
        </div>

        <UploadedFiles history=history/>
    }
}
