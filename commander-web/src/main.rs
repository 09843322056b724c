//! Proxmox Commander dashboard: a Yew single-page app whose every route
//! passes the shared navigation guard before it renders.

mod api;
mod app;
mod components;
mod models;
mod pages;
mod routes;
mod theme;

#[cfg(all(test, target_arch = "wasm32"))]
mod storage_test;

use app::App;
use yew::Renderer;
use yew::{Html, function_component, html};
use yewdux::YewduxRoot;

#[function_component(Root)]
fn root() -> Html {
    html! {
        <YewduxRoot>
            <App />
        </YewduxRoot>
    }
}

fn main() {
    // Disable truncation of panic payloads to debug any panics
    std::panic::set_hook(Box::new(|info| {
        if let Some(s) = info.payload().downcast_ref::<String>() {
            web_sys::console::log_1(&format!("Panic: {s}").into());
        } else if let Some(s) = info.payload().downcast_ref::<&str>() {
            web_sys::console::log_1(&format!("Panic: {s}").into());
        } else {
            web_sys::console::log_1(&"Unknown panic".into());
        }
        if let Some(location) = info.location() {
            web_sys::console::log_1(
                &format!(
                    "  at {}:{}:{}",
                    location.file(),
                    location.line(),
                    location.column()
                )
                .into(),
            );
        }
    }));

    web_sys::console::log_1(&"Starting Proxmox Commander".into());

    let Some(body) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
    else {
        web_sys::console::log_1(&"No document body to mount into".into());
        return;
    };

    Renderer::<Root>::with_root(body.into()).render();
}
