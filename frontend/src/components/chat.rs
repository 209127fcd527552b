//! Question/answer chat over the uploaded documents.

use std::rc::Rc;

use chrono::Local;
use leptos::*;
use web_sys::KeyboardEvent;

use textassist::{
    can_send, fetch_documents, submit_query, transcript_file_name, Conversation, DocumentSelection,
};

use crate::components::{AnimatedGradient, DocumentsSidebar, MessageBubble, Toaster};
use crate::config::API_BASE_URL;
use crate::services::{
    is_speaking, save_text_file, speak, stop_speaking, BrowserBackend, VoiceInput,
};
use crate::types::ToastKind;

const PLACEHOLDER: &str = "Ask a question about your documents...";

#[component]
pub fn ChatSection() -> impl IntoView {
    let toaster = expect_context::<Toaster>();

    let selection = create_rw_signal(DocumentSelection::default());
    let (docs_loading, set_docs_loading) = create_signal(false);
    let (docs_error, set_docs_error) = create_signal(None::<String>);
    let sidebar_collapsed = create_rw_signal(false);

    let conversation = create_rw_signal(Conversation::new());
    let input = create_rw_signal(String::new());
    let (querying, set_querying) = create_signal(false);
    let (listening, set_listening) = create_signal(false);
    let (speaking, set_speaking) = create_signal(false);
    let voice = store_value(None::<Rc<VoiceInput>>);

    let messages_ref = create_node_ref::<html::Div>();
    let textarea_ref = create_node_ref::<html::Textarea>();

    // =========================================================================
    // Documents
    // =========================================================================

    let load_documents = move || {
        set_docs_loading.set(true);
        set_docs_error.set(None);
        spawn_local(async move {
            let backend = BrowserBackend::new(API_BASE_URL);
            match fetch_documents(&backend).await {
                Ok(documents) => {
                    log::info!("📚 {} document(s) available", documents.len());
                    selection.update(|s| s.set_available(documents));
                }
                Err(e) => {
                    log::error!("Error fetching documents: {}", e);
                    toaster.show("Error", e.reason().to_string(), ToastKind::Error);
                    set_docs_error.set(Some(e.reason().to_string()));
                }
            }
            set_docs_loading.set(false);
        });
    };
    load_documents();

    // =========================================================================
    // Input
    // =========================================================================

    let fit_textarea = move || {
        if let Some(textarea) = textarea_ref.get_untracked() {
            let style = (*textarea).style();
            let _ = style.set_property("height", "auto");
            let _ = style.set_property("height", &format!("{}px", textarea.scroll_height()));
        }
    };

    let send = move || {
        let text = input.get_untracked();
        let ready = selection.with_untracked(|s| can_send(&text, s, querying.get_untracked()));
        if !ready {
            return;
        }

        let query = text.trim().to_string();
        let names = selection.with_untracked(|s| s.query_names());
        conversation.update(|c| {
            c.push_user(query.clone());
        });
        input.set(String::new());
        fit_textarea();
        set_querying.set(true);

        spawn_local(async move {
            let backend = BrowserBackend::new(API_BASE_URL);
            let reply = submit_query(&backend, &query, &names).await;
            if let Err(e) = &reply {
                log::error!("Query error: {}", e);
            }
            conversation.update(|c| {
                c.record_reply(reply);
            });
            set_querying.set(false);
        });
    };

    let on_keydown = move |ev: KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            send();
        }
    };

    // Keep the newest message in view.
    create_effect(move |_| {
        let _ = (conversation.with(|c| c.len()), querying.get());
        request_animation_frame(move || {
            if let Some(list) = messages_ref.get_untracked() {
                list.set_scroll_top(list.scroll_height());
            }
        });
    });

    // =========================================================================
    // Voice
    // =========================================================================

    let toggle_voice = move |_| {
        if listening.get_untracked() {
            if let Some(Err(e)) = voice.with_value(|v| v.as_ref().map(|v| v.stop())) {
                log::warn!("{}", e);
            }
            set_listening.set(false);
            return;
        }

        if voice.with_value(Option::is_none) {
            let created = VoiceInput::new(
                move |transcript| {
                    input.set(transcript);
                    fit_textarea();
                },
                move |reason| {
                    set_listening.set(false);
                    toaster.show(
                        "Voice Input Error",
                        format!("Error: {}. Please try again.", reason),
                        ToastKind::Error,
                    );
                },
                move || set_listening.set(false),
            );
            match created {
                Some(recognition) => voice.set_value(Some(Rc::new(recognition))),
                None => {
                    toaster.show(
                        "Voice Input Not Supported",
                        "Your browser doesn't support voice input. Please use a modern browser like Chrome.",
                        ToastKind::Error,
                    );
                    return;
                }
            }
        }

        input.set(String::new());
        match voice.with_value(|v| v.as_ref().map(|v| v.start())) {
            Some(Ok(())) => set_listening.set(true),
            Some(Err(e)) => toaster.show("Voice Input Error", e.to_string(), ToastKind::Error),
            None => {}
        }
    };

    let on_speak = move |text: String| {
        if speaking.get_untracked() || is_speaking() {
            stop_speaking();
            set_speaking.set(false);
            return;
        }
        match speak(&text, move || set_speaking.set(false)) {
            Ok(()) => set_speaking.set(true),
            Err(e) => {
                log::warn!("{}", e);
                toaster.show(
                    "Text-to-Speech Not Supported",
                    "Your browser doesn't support text-to-speech. Please use a modern browser.",
                    ToastKind::Error,
                );
            }
        }
    };

    on_cleanup(move || {
        stop_speaking();
        voice.set_value(None);
    });

    // =========================================================================
    // Conversation actions
    // =========================================================================

    let download = move |_| {
        let transcript = conversation.with_untracked(|c| (!c.is_empty()).then(|| c.transcript()));
        let Some(transcript) = transcript else {
            toaster.show("No Conversation", "There's no conversation to download.", ToastKind::Default);
            return;
        };
        match save_text_file(&transcript_file_name(Local::now().date_naive()), &transcript) {
            Ok(()) => toaster.show(
                "Download Complete",
                "Your conversation has been downloaded.",
                ToastKind::Success,
            ),
            Err(e) => toaster.show("Download Failed", e.to_string(), ToastKind::Error),
        }
    };

    let clear = move |_| {
        let mut cleared = false;
        conversation.update(|c| cleared = c.clear());
        if cleared {
            stop_speaking();
            set_speaking.set(false);
            toaster.show(
                "Conversation Cleared",
                "Your conversation history has been cleared.",
                ToastKind::Success,
            );
        }
    };

    let empty = move || conversation.with(|c| c.is_empty());
    let input_disabled = move || !selection.with(|s| s.can_query());
    let send_disabled = move || selection.with(|s| !can_send(&input.get(), s, querying.get()));

    view! {
        <div class="chat-layout">
            <DocumentsSidebar
                selection=selection
                loading=docs_loading
                error=docs_error
                collapsed=sidebar_collapsed
                on_refresh=move |_| load_documents()
            />

            <section class="chat-section">
                <div class="chat-toolbar">
                    <button class="icon-button" title="Download conversation" disabled=empty on:click=download>
                        "⬇"
                    </button>
                    <button class="icon-button" title="Clear conversation" disabled=empty on:click=clear>
                        "🗑"
                    </button>
                </div>

                <div class="chat-messages" node_ref=messages_ref>
                    <Show when=empty fallback=|| view! {}>
                        <div class="empty-chat">
                            <AnimatedGradient small=true/>
                            <h3>"Ask anything about your documents"</h3>
                            <p>"Select documents on the left to narrow the search, or query them all."</p>
                        </div>
                    </Show>
                    <For
                        each=move || conversation.with(|c| c.messages().to_vec())
                        key=|message| message.id
                        children=move |message| {
                            view! { <MessageBubble message=message speaking=speaking on_speak=on_speak/> }
                        }
                    />
                    <Show when=move || querying.get() fallback=|| view! {}>
                        <div class="message assistant typing">
                            <div class="message-bubble">
                                <span class="typing-dot"></span>
                                <span class="typing-dot"></span>
                                <span class="typing-dot"></span>
                            </div>
                        </div>
                    </Show>
                </div>

                <form
                    class="chat-input"
                    on:submit=move |ev| {
                        ev.prevent_default();
                        send();
                    }
                >
                    <button
                        type="button"
                        class="voice-toggle"
                        class:active=move || listening.get()
                        title="Voice input"
                        on:click=toggle_voice
                    >
                        {move || if listening.get() { "🔇" } else { "🎤" }}
                    </button>
                    <textarea
                        rows="1"
                        node_ref=textarea_ref
                        placeholder=move || if listening.get() { "Listening..." } else { PLACEHOLDER }
                        disabled=input_disabled
                        prop:value=move || input.get()
                        on:input=move |ev| {
                            input.set(event_target_value(&ev));
                            fit_textarea();
                        }
                        on:keydown=on_keydown
                    ></textarea>
                    <button type="submit" class="send-button" disabled=send_disabled>
                        "Send"
                    </button>
                </form>
            </section>
        </div>
    }
}
