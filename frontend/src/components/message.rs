//! A single chat bubble.

use chrono::Local;
use leptos::*;

use textassist::{format_time, render_markdown, ChatMessage, Role};

#[component]
pub fn MessageBubble(
    message: ChatMessage,
    /// Whether any message is currently read aloud.
    speaking: ReadSignal<bool>,
    #[prop(into)] on_speak: Callback<String>,
) -> impl IntoView {
    let time = format_time(&message.timestamp.with_timezone(&Local));
    let class = format!("message {}", message.role.css_class());

    // Assistant text is rendered markdown; user text stays literal.
    let content = match message.role {
        Role::Assistant => {
            view! { <div class="message-content" inner_html=render_markdown(&message.content)></div> }
        }
        Role::User => view! { <div class="message-content">{message.content.clone()}</div> },
    };

    let actions = (message.role == Role::Assistant).then(|| {
        let text = message.content.clone();
        view! {
            <div class="message-actions">
                <button
                    class="message-action-btn"
                    title=move || if speaking.get() { "Stop speaking" } else { "Speak response" }
                    on:click=move |_| on_speak.call(text.clone())
                >
                    {move || if speaking.get() { "⏹" } else { "▶" }}
                </button>
            </div>
        }
    });

    view! {
        <div class=class>
            <div class="message-header">
                <span class="message-sender">{message.role.label()}</span>
                <span class="message-time">{time}</span>
            </div>
            <div class="message-bubble">{content}</div>
            {actions}
        </div>
    }
}
