use crate::api::Services;
use crate::models::app_state::AppState;
use shared::models::{DarkMode, KNOWN_THEMES, PreferencesUpdate, SidebarLogo};
use strum::IntoEnumIterator;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::{Callback, Event, Html, TargetCast, function_component, html};
use yewdux::prelude::use_selector;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

fn send(update: PreferencesUpdate) {
    spawn_local(async move {
        if let Err(err) = Services::shared().session.update_preferences(update).await {
            log(&format!("Saving preferences failed: {err}"));
        }
    });
}

fn on_select(build: fn(String) -> Option<PreferencesUpdate>) -> Callback<Event> {
    Callback::from(move |event: Event| {
        let select: HtmlSelectElement = event.target_unchecked_into();
        if let Some(update) = build(select.value()) {
            send(update);
        }
    })
}

/// Theme, colour scheme and sidebar logo pickers.
#[function_component(PreferencesMenu)]
pub fn preferences_menu() -> Html {
    let appearance = use_selector(|state: &AppState| state.appearance.clone());

    let on_theme = on_select(|value| Some(PreferencesUpdate::theme(value)));
    let on_dark_mode = on_select(|value| {
        value.parse::<DarkMode>().ok().map(|mode| PreferencesUpdate {
            dark_mode: Some(mode),
            ..PreferencesUpdate::default()
        })
    });
    let on_sidebar_logo = on_select(|value| {
        value.parse::<SidebarLogo>().ok().map(|logo| PreferencesUpdate {
            sidebar_logo: Some(logo),
            ..PreferencesUpdate::default()
        })
    });

    html! {
        <div class="flex gap-1">
            <select class="select select-sm" aria-label="Theme" onchange={on_theme}>
                { for KNOWN_THEMES.iter().map(|theme| html! {
                    <option value={*theme} selected={appearance.theme == *theme}>{*theme}</option>
                }) }
            </select>
            <select class="select select-sm" aria-label="Colour scheme" onchange={on_dark_mode}>
                { for DarkMode::iter().map(|mode| html! {
                    <option value={mode.to_string()} selected={appearance.dark_mode == mode}>{mode.to_string()}</option>
                }) }
            </select>
            <select class="select select-sm" aria-label="Sidebar logo" onchange={on_sidebar_logo}>
                { for SidebarLogo::iter().map(|logo| html! {
                    <option value={logo.to_string()} selected={appearance.sidebar_logo == logo}>{logo.to_string()}</option>
                }) }
            </select>
        </div>
    }
}
