use super::bind_input;
use crate::api::Services;
use shared::models::{UserQuery, UserSummary};
use shared::users::UsersState;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

const PAGE_SIZE: u32 = 50;

/// User administration list (super-admins only; the guard enforces it).
#[function_component(UsersPage)]
pub fn users_page() -> Html {
    let state = use_state(UsersState::default);
    let error = use_state(|| None::<String>);
    let search = use_state(String::new);

    let load = {
        let state = state.clone();
        let error = error.clone();
        Callback::from(move |term: String| {
            let state = state.clone();
            let error = error.clone();
            let store = Services::shared().users;
            state.set(UsersState {
                loading: true,
                ..store.state()
            });
            spawn_local(async move {
                let query = UserQuery {
                    limit: Some(PAGE_SIZE),
                    search: Some(term).filter(|term| !term.is_empty()),
                    ..UserQuery::default()
                };
                match store.fetch_users(query).await {
                    Ok(_) => error.set(None),
                    Err(err) => error.set(Some(err.to_string())),
                }
                state.set(store.state());
            });
        })
    };

    {
        let load = load.clone();
        use_effect_with((), move |()| {
            load.emit(String::new());
            || ()
        });
    }

    let on_search = bind_input(&search);

    let on_submit = {
        let search = search.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            load.emit((*search).trim().to_string());
        })
    };

    html! {
        <div class="p-4 space-y-4">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">{"Users"}</h1>
                <span class="badge">{format!("{} total", state.total)}</span>
            </div>
            <form class="flex gap-2" onsubmit={on_submit}>
                <input
                    class="input input-bordered input-sm"
                    type="search"
                    placeholder="Search users"
                    value={(*search).clone()}
                    oninput={on_search}
                />
                <button class="btn btn-sm" type="submit" disabled={state.loading}>{"Search"}</button>
            </form>
            if let Some(message) = &*error {
                <div class="alert alert-error"><span>{message.clone()}</span></div>
            }
            <table class="table table-zebra">
                <thead>
                    <tr>
                        <th>{"Username"}</th>
                        <th>{"Email"}</th>
                        <th>{"Role"}</th>
                        <th>{"Status"}</th>
                        <th>{"Last login"}</th>
                    </tr>
                </thead>
                <tbody>
                    { for state.users.iter().map(user_row) }
                </tbody>
            </table>
        </div>
    }
}

fn user_row(user: &UserSummary) -> Html {
    let role = if user.is_super_admin { "Super-admin" } else { "User" };
    let (status, status_class) = if user.is_active {
        ("Active", "badge badge-success")
    } else {
        ("Disabled", "badge badge-ghost")
    };
    html! {
        <tr key={user.id}>
            <td>{user.username.clone()}</td>
            <td>{user.email.clone().unwrap_or_default()}</td>
            <td>{role}</td>
            <td><span class={status_class}>{status}</span></td>
            <td>{user.last_login.clone().unwrap_or_else(|| "never".to_string())}</td>
        </tr>
    }
}
