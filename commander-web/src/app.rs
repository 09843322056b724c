use crate::api::Services;
use crate::components::loading::Loading;
use crate::models::app_state::AppState;
use crate::routes::{MainRoute, switch};
use crate::theme;
use shared::Session;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::{Html, function_component, html, use_effect_with};
use yew_router::prelude::*;
use yewdux::prelude::use_store;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

#[function_component(App)]
pub fn app() -> Html {
    let (state, dispatch) = use_store::<AppState>();

    {
        let dispatch = dispatch.clone();
        use_effect_with((), move |()| {
            let session = Services::shared().session;
            dispatch.set(AppState::from_session(
                session.session(),
                session.persisted_preferences(),
            ));

            let listener_dispatch = dispatch.clone();
            session.subscribe(move |current: &Session| {
                let current = current.clone();
                listener_dispatch.reduce_mut(move |state| {
                    if let Some(profile) = current.profile() {
                        state.appearance = profile.preferences.clone();
                    }
                    state.session = current;
                });
            });

            // Super-admin routes need the profile, so hold the router back
            // until a restored token has been resolved into one.
            spawn_local(async move {
                if session.is_authenticated()
                    && let Err(err) = session.fetch_profile().await
                {
                    log(&format!("Loading profile failed: {err}"));
                }
                dispatch.reduce_mut(|state| state.ready = true);
            });
            || ()
        });
    }

    use_effect_with(state.appearance.clone(), |appearance| {
        theme::apply(appearance);
        || ()
    });

    if !state.ready {
        return html! { <Loading /> };
    }

    html! {
        <BrowserRouter>
            <Switch<MainRoute> render={switch} />
        </BrowserRouter>
    }
}
