//! First-run setup page.
//!
//! Lists what the backend still reports as missing and lets the operator
//! create the bootstrap administrator. The navigation guard drops the cached
//! setup status whenever this page is entered, so leaving it re-checks the
//! server.

use crate::{api::Services, routes::MainRoute};
use shared::api::SetupApi;
use shared::models::SetupStatus;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::hooks::use_navigator;

#[derive(Clone, PartialEq)]
enum StatusView {
    Loading,
    Loaded(SetupStatus),
    Unavailable(String),
}

#[function_component(SetupPage)]
pub fn setup_page() -> Html {
    let status = use_state(|| StatusView::Loading);
    let notice = use_state(|| None::<String>);
    let navigator = use_navigator();

    {
        let status = status.clone();
        use_effect_with((), move |()| {
            spawn_local(async move {
                let view = match Services::shared().client.setup_status().await {
                    Ok(current) => StatusView::Loaded(current),
                    Err(err) => StatusView::Unavailable(err.to_string()),
                };
                status.set(view);
            });
            || ()
        });
    }

    let on_create_admin = {
        let notice = notice.clone();
        Callback::from(move |_: MouseEvent| {
            let notice = notice.clone();
            spawn_local(async move {
                let message = match Services::shared().session.init_admin().await {
                    Ok(admin) => format!(
                        "Administrator '{}' created. Sign in and change the initial password right away.",
                        admin.username
                    ),
                    Err(err) => err.user_message(),
                };
                notice.set(Some(message));
            });
        })
    };

    let on_continue = Callback::from(move |_: MouseEvent| {
        if let Some(nav) = &navigator {
            nav.push(&MainRoute::Login);
        }
    });

    let checklist = match &*status {
        StatusView::Loading => html! { <span class="loading loading-dots"></span> },
        StatusView::Unavailable(reason) => html! {
            <div class="alert alert-warning">{format!("Setup status unavailable: {reason}")}</div>
        },
        StatusView::Loaded(current) => html! {
            <ul class="space-y-1">
                { check_item("Proxmox connection", current.has_proxmox_config) }
                { check_item("Secret key", current.has_secret_key) }
                { check_item("SSH key", current.has_ssh_key) }
                { for current.missing_items.iter().map(|item| html! {
                    <li class="text-warning">{format!("Missing: {item}")}</li>
                }) }
            </ul>
        },
    };

    html! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-lg shadow-lg bg-base-100">
                <div class="card-body space-y-4">
                    <h2 class="card-title text-2xl">{"Welcome to Proxmox Commander"}</h2>
                    <p>{"Finish the server configuration before signing in."}</p>
                    {checklist}
                    if let Some(message) = &*notice {
                        <div class="alert alert-info"><span>{message.clone()}</span></div>
                    }
                    <div class="card-actions justify-end">
                        <button class="btn btn-ghost" onclick={on_create_admin}>
                            {"Create administrator"}
                        </button>
                        <button class="btn btn-primary" onclick={on_continue}>
                            {"Continue"}
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}

fn check_item(label: &str, done: bool) -> Html {
    let (icon, class) = if done {
        ("mdi mdi-check-circle", "text-success")
    } else {
        ("mdi mdi-alert-circle", "text-warning")
    };
    html! {
        <li class={class}>
            <i class={icon}></i>
            {format!(" {label}")}
        </li>
    }
}
