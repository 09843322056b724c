use crate::api::Services;
use crate::components::preferences_menu::PreferencesMenu;
use crate::models::app_state::AppState;
use crate::routes::{MainRoute, NAV_ROUTES};
use yew::{Callback, Children, Html, Properties, classes, function_component, html};
use yew_router::prelude::Link;
use yewdux::prelude::use_selector;

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    pub current_route: MainRoute,
}

/// Navigation shell around every signed-in page.
///
/// Links the current user may not open are hidden; the guard still enforces
/// the same rules on navigation.
#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    let session = use_selector(|state: &AppState| state.session.clone());
    let username = session
        .profile()
        .map(|profile| profile.username.clone())
        .unwrap_or_default();

    let on_logout = Callback::from(|_: yew::MouseEvent| {
        Services::shared().session.logout();
    });

    let links = NAV_ROUTES
        .iter()
        .filter(|route| !route.meta().super_admin_required || session.is_super_admin())
        .map(|route| {
            let active = route == &props.current_route;
            html! {
                <li>
                    <Link<MainRoute> to={route.clone()} classes={classes!(active.then_some("active"))}>
                        {route.title()}
                    </Link<MainRoute>>
                </li>
            }
        })
        .collect::<Html>();

    html! {
    <>
        <header class="navbar bg-base-200 border-b border-base-300">
            <div class="flex-1">
                <span class="sidebar-logo text-xl font-semibold px-2">{"Proxmox Commander"}</span>
            </div>
            <div class="flex-none gap-2">
                <PreferencesMenu />
                <span class="text-sm opacity-80">{username}</span>
                <button class="btn btn-ghost btn-sm" onclick={on_logout}>{"Sign out"}</button>
            </div>
        </header>
        <div class="min-h-screen bg-base-100 drawer lg:drawer-open">
            <aside class="drawer-side">
                <ul class="menu p-4 w-60 bg-base-200">{links}</ul>
            </aside>
            <div class="drawer-content flex flex-col">
                <main class={classes!("flex-grow", "p-4", "transition-all", "duration-300")}>
                    {props.children.clone()}
                </main>
            </div>
        </div>
    </>
    }
}
