//! Application configuration.
//!
//! Compile-time settings for the TextAssist frontend. The API location can
//! be overridden at build time with `TEXTASSIST_API_URL`.

/// Backend API base URL.
pub const API_BASE_URL: &str = match option_env!("TEXTASSIST_API_URL") {
    Some(url) => url,
    None => "http://localhost:8000",
};

/// Application name shown in the header and page title.
pub const APP_NAME: &str = "TextAssist";

/// How long a toast stays on screen.
pub const TOAST_DURATION_MS: u64 = 3000;

/// Length of the toast exit animation.
pub const TOAST_EXIT_MS: u64 = 300;

/// Interval of the upload progress interpolation.
pub const PROGRESS_TICK_MS: u32 = 100;

/// Local storage key of the theme preference.
pub const THEME_STORAGE_KEY: &str = "theme";

/// Media query used when no theme was stored.
pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

/// Fallback particle colour when `--primary` cannot be read.
pub const DEFAULT_PRIMARY_RGB: [u8; 3] = [124, 58, 237];
