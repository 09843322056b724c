//! Applies appearance preferences to the document root.
//!
//! Stylesheets key off two attributes on `<html>`: `data-theme` (one of the
//! colour themes, or `light`) and `data-sidebar-logo`.

use shared::models::{DEFAULT_THEME, DarkMode, KNOWN_THEMES};
use shared::session::ThemePreferences;
use web_sys::window;

const LIGHT_THEME: &str = "light";

/// Theme attribute for the given preferences. Colour themes are dark
/// variants; light mode always uses the single light theme.
pub fn theme_attribute(preferences: &ThemePreferences, prefers_dark: bool) -> &str {
    let dark = match preferences.dark_mode {
        DarkMode::Dark => true,
        DarkMode::Light => false,
        DarkMode::System => prefers_dark,
    };
    if !dark {
        return LIGHT_THEME;
    }
    if KNOWN_THEMES.contains(&preferences.theme.as_str()) {
        &preferences.theme
    } else {
        DEFAULT_THEME
    }
}

fn system_prefers_dark() -> bool {
    window()
        .and_then(|window| window.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .is_some_and(|media_query| media_query.matches())
}

pub fn apply(preferences: &ThemePreferences) {
    if let Some(window) = window()
        && let Some(document) = window.document()
        && let Some(html_element) = document.document_element()
    {
        let theme = theme_attribute(preferences, system_prefers_dark());
        html_element
            .set_attribute("data-theme", theme)
            .unwrap_or_default();
        html_element
            .set_attribute("data-sidebar-logo", preferences.sidebar_logo.as_ref())
            .unwrap_or_default();
    }
}
