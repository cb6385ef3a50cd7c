use crate::utils::ThemePreference;

// Site-wide
pub const SITE_NAME: &str = "My Dioxus App";
pub const SITE_DESCRIPTION: &str = "A modern Dioxus boilerplate.";

// UI
pub const DEFAULT_THEME: ThemePreference = ThemePreference::System;
pub const THEME_STORAGE_KEY: &str = "theme";

// API
pub const API_URL_ENV: &str = "API_URL";
