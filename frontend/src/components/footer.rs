//! Footer component

use leptos::*;

#[component]
pub fn Footer() -> impl IntoView {
    let year = js_sys::Date::new_0().get_full_year();

    view! {
        <footer>
            <div>"Copyright © " {year} " TextAssist • Powered by " <span class="rust-badge">"🦀 Rust + Leptos"</span></div>
            <div class="footer-links">
                <a href="/" class="footer-link">"Ask"</a>
                <a href="/upload" class="footer-link">"Upload"</a>
            </div>
        </footer>
    }
}
