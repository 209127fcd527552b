//! Toast notifications.
//!
//! [`Toaster`] is provided as context by the app root; any component can
//! `expect_context::<Toaster>()` and call [`Toaster::show`].

use std::time::Duration;

use leptos::*;

use crate::config::{TOAST_DURATION_MS, TOAST_EXIT_MS};
use crate::types::{Toast, ToastKind};

/// Handle to the toast stack.
#[derive(Clone, Copy)]
pub struct Toaster {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl Toaster {
    /// Creates the stack and registers it as context.
    pub fn provide() -> Self {
        let toaster = Self {
            toasts: create_rw_signal(Vec::new()),
            next_id: store_value(0),
        };
        provide_context(toaster);
        toaster
    }

    pub fn toasts(&self) -> RwSignal<Vec<Toast>> {
        self.toasts
    }

    /// Shows a toast that dismisses itself after a few seconds.
    pub fn show(&self, title: impl Into<String>, message: impl Into<String>, kind: ToastKind) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);

        self.toasts.update(|toasts| {
            toasts.push(Toast {
                id,
                title: title.into(),
                message: message.into(),
                kind,
                closing: false,
            })
        });

        let toaster = *self;
        set_timeout(move || toaster.dismiss(id), Duration::from_millis(TOAST_DURATION_MS));
    }

    /// Plays the exit animation, then removes the toast.
    pub fn dismiss(&self, id: u64) {
        let mut found = false;
        self.toasts.update(|toasts| {
            if let Some(toast) = toasts.iter_mut().find(|t| t.id == id && !t.closing) {
                toast.closing = true;
                found = true;
            }
        });
        if !found {
            return;
        }

        let toasts = self.toasts;
        set_timeout(
            move || toasts.update(|list| list.retain(|t| t.id != id)),
            Duration::from_millis(TOAST_EXIT_MS),
        );
    }
}

#[component]
pub fn ToastContainer() -> impl IntoView {
    let toaster = expect_context::<Toaster>();

    view! {
        <div class="toast-container">
            <For
                each=move || toaster.toasts().get()
                key=|toast| (toast.id, toast.closing)
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.kind.css_class() class:closing=toast.closing>
                            <div class="toast-content">
                                <div class="toast-title">{toast.title}</div>
                                <div class="toast-message">{toast.message}</div>
                            </div>
                            <button class="toast-close" on:click=move |_| toaster.dismiss(id)>
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
