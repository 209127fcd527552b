//! Navigation bar with theme toggle and mobile menu.

use leptos::*;
use leptos_router::A;
use wasm_bindgen::JsCast;

use textassist::Theme;

use crate::config::APP_NAME;
use crate::services::save_theme;

#[component]
pub fn Header(theme: RwSignal<Theme>) -> impl IntoView {
    let (menu_open, set_menu_open) = create_signal(false);
    let menu_ref = create_node_ref::<html::Div>();
    let button_ref = create_node_ref::<html::Button>();

    let on_theme_click = move |_| {
        let next = theme.get_untracked().toggle();
        theme.set(next);
        if let Err(e) = save_theme(next) {
            log::warn!("Theme not persisted: {}", e);
        }
    };

    // Clicks outside the menu and its button close it.
    let outside_click = window_event_listener(ev::click, move |event| {
        if !menu_open.get_untracked() {
            return;
        }
        let Some(target) = event.target().and_then(|t| t.dyn_into::<web_sys::Node>().ok()) else {
            return;
        };
        let inside_menu = menu_ref.get_untracked().is_some_and(|menu| menu.contains(Some(&target)));
        let on_button = button_ref.get_untracked().is_some_and(|button| button.contains(Some(&target)));
        if !inside_menu && !on_button {
            set_menu_open.set(false);
        }
    });
    on_cleanup(move || outside_click.remove());

    view! {
        <header>
            <div class="header-left">
                <A href="/" class="logo">{APP_NAME}</A>
            </div>
            <nav class="header-nav">
                <A href="/" exact=true class="nav-link">"Ask"</A>
                <A href="/upload" class="nav-link">"Upload"</A>
            </nav>
            <div class="header-right">
                <button
                    class="theme-toggle"
                    title="Toggle theme"
                    on:click=on_theme_click
                >
                    {move || if theme.get().is_dark() { "☀️" } else { "🌙" }}
                </button>
                <button
                    class="mobile-menu-button"
                    node_ref=button_ref
                    on:click=move |_| set_menu_open.update(|open| *open = !*open)
                >
                    {move || if menu_open.get() { "✕" } else { "☰" }}
                </button>
            </div>
            <div
                class="mobile-menu"
                class:hidden=move || !menu_open.get()
                node_ref=menu_ref
                on:click=move |_| set_menu_open.set(false)
            >
                <A href="/" exact=true class="mobile-link">"Ask"</A>
                <A href="/upload" class="mobile-link">"Upload"</A>
            </div>
        </header>
    }
}
