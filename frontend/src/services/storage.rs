//! Theme persistence in local storage.

use gloo_utils::{document_element, window};
use textassist::Theme;

use crate::config::{DARK_SCHEME_QUERY, THEME_STORAGE_KEY};
use crate::types::{AppError, AppResult};

fn local_storage() -> Option<web_sys::Storage> {
    window().local_storage().ok().flatten()
}

/// Theme to start with: the stored one, else the OS preference.
pub fn load_theme() -> Theme {
    let stored = local_storage().and_then(|s| s.get_item(THEME_STORAGE_KEY).ok().flatten());
    let prefers_dark = window()
        .match_media(DARK_SCHEME_QUERY)
        .ok()
        .flatten()
        .map(|query| query.matches())
        .unwrap_or(false);
    Theme::resolve(stored.as_deref(), prefers_dark)
}

/// Toggles the `dark` class on `<html>`.
pub fn apply_theme(theme: Theme) {
    if let Err(e) = document_element()
        .class_list()
        .toggle_with_force("dark", theme.is_dark())
    {
        log::warn!("Could not apply theme: {:?}", e);
    }
}

pub fn save_theme(theme: Theme) -> AppResult<()> {
    let storage = local_storage().ok_or_else(|| AppError::Storage("local storage unavailable".into()))?;
    storage
        .set_item(THEME_STORAGE_KEY, theme.as_str())
        .map_err(|e| AppError::Storage(format!("{:?}", e)))
}
