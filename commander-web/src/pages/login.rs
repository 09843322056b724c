use super::bind_input;
use crate::{api::Services, routes::MainRoute};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::hooks::use_navigator;
use yew_router::prelude::Link;

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let username = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);
    let navigator = use_navigator();

    let onsubmit = {
        let username_handle = username.clone();
        let password_handle = password.clone();
        let error_handle = error.clone();
        let loading_handle = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let username_value = (*username_handle).trim().to_string();
            let password_value = (*password_handle).clone();
            loading_handle.set(true);
            error_handle.set(None);
            let loading_ref = loading_handle.clone();
            let error_ref = error_handle.clone();
            let navigator_handle = navigator.clone();
            spawn_local(async move {
                let session = Services::shared().session;
                match session.login(&username_value, &password_value).await {
                    Ok(_) => {
                        if let Some(ref nav) = navigator_handle {
                            nav.push(&MainRoute::Dashboard);
                        }
                    }
                    Err(err) => error_ref.set(Some(err.user_message())),
                }
                loading_ref.set(false);
            });
        })
    };

    let on_username_change = bind_input(&username);
    let on_password_change = bind_input(&password);

    let is_busy = *loading;
    let disable_submit = (*username).trim().is_empty() || (*password).is_empty() || is_busy;

    html! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-lg bg-base-100">
                <form class="card-body" onsubmit={onsubmit}>
                    <h2 class="card-title text-2xl">{"Proxmox Commander"}</h2>
                    if let Some(message) = &*error {
                        <div class="alert alert-error">
                            <span>{message.clone()}</span>
                        </div>
                    }
                    <div class="form-control">
                        <label class="label" for="username">
                            <span class="label-text">{"Username"}</span>
                        </label>
                        <input
                            id="username"
                            class="input input-bordered"
                            type="text"
                            autocomplete="username"
                            required=true
                            value={(*username).clone()}
                            oninput={on_username_change}
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="password">
                            <span class="label-text">{"Password"}</span>
                        </label>
                        <input
                            id="password"
                            class="input input-bordered"
                            type="password"
                            autocomplete="current-password"
                            required=true
                            value={(*password).clone()}
                            oninput={on_password_change}
                        />
                    </div>
                    <div class="form-control mt-6">
                        <button class="btn btn-primary" type="submit" disabled={disable_submit}>
                            if is_busy {
                                <span class="loading loading-spinner"></span>
                            }
                            {"Sign in"}
                        </button>
                    </div>
                    <Link<MainRoute> to={MainRoute::ForgotPassword} classes="link link-hover text-sm">
                        {"Forgot your password?"}
                    </Link<MainRoute>>
                </form>
            </div>
        </div>
    }
}
