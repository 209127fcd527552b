//! Sidebar listing the uploaded documents, with checkboxes to narrow a query.

use leptos::*;

use textassist::DocumentSelection;

/// Names longer than this get a hover title.
const LONG_NAME: usize = 25;

#[component]
pub fn DocumentsSidebar(
    selection: RwSignal<DocumentSelection>,
    loading: ReadSignal<bool>,
    error: ReadSignal<Option<String>>,
    collapsed: RwSignal<bool>,
    #[prop(into)] on_refresh: Callback<()>,
) -> impl IntoView {
    let documents = move || selection.with(|s| s.available().to_vec());

    view! {
        <aside class="documents-sidebar" class:collapsed=move || collapsed.get()>
            <div class="sidebar-header">
                <h3>"Documents"</h3>
                <span class="document-count">{move || selection.with(|s| s.count_line())}</span>
                <button class="icon-button" title="Refresh" on:click=move |_| on_refresh.call(())>
                    "⟳"
                </button>
                <button
                    class="icon-button sidebar-toggle"
                    title="Toggle sidebar"
                    on:click=move |_| collapsed.update(|c| *c = !*c)
                >
                    {move || if collapsed.get() { "»" } else { "«" }}
                </button>
            </div>

            <Show when=move || loading.get() fallback=|| view! {}>
                <div class="documents-loading">"Loading documents..."</div>
            </Show>

            <ul class="documents-list">
                {move || {
                    if loading.get() {
                        return None;
                    }
                    if error.get().is_some() {
                        return Some(view! { <li class="document-item">"Failed to load documents."</li> }.into_view());
                    }
                    if documents().is_empty() {
                        return Some(view! { <li class="document-item">"No documents uploaded yet."</li> }.into_view());
                    }
                    None
                }}
                <For
                    each=documents
                    key=|name| name.clone()
                    children=move |name| {
                        let id = format!(
                            "doc-{}",
                            name.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '-' }).collect::<String>()
                        );
                        let title = (name.len() > LONG_NAME).then(|| name.clone());
                        let checked_name = name.clone();
                        let toggled_name = name.clone();
                        view! {
                            <li class="document-item">
                                <input
                                    type="checkbox"
                                    class="document-checkbox"
                                    id=id.clone()
                                    prop:checked=move || selection.with(|s| s.is_selected(&checked_name))
                                    on:change=move |_| selection.update(|s| s.toggle(&toggled_name))
                                />
                                <label class="document-info" for=id>
                                    <span class="document-name" title=title>{name}</span>
                                </label>
                            </li>
                        }
                    }
                />
            </ul>

            <div class="selection-status">{move || selection.with(|s| s.status_line())}</div>
        </aside>
    }
}
