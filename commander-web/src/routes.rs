use crate::components::guarded_route::GuardedRoute;
use shared::RouteMeta;
use strum::EnumIter;
use wasm_bindgen::prelude::*;
use yew::prelude::*;
use yew_router::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

/// Dashboard routes. Access rules live in [`shared::routes::ROUTES`]; each
/// variant finds its entry by path.
#[derive(Debug, Clone, PartialEq, Eq, Routable, EnumIter)]
pub enum MainRoute {
    #[at("/setup")]
    Setup,
    #[at("/login")]
    Login,
    #[at("/forgot-password")]
    ForgotPassword,
    #[at("/reset-password")]
    ResetPassword,
    #[at("/")]
    Dashboard,
    #[at("/executions")]
    Executions,
    #[at("/executions/:id")]
    ExecutionDetail { id: String },
    #[at("/playbooks")]
    Playbooks,
    #[at("/inventory")]
    Inventory,
    #[at("/terraform")]
    Terraform,
    #[at("/netbox")]
    NetBox,
    #[at("/users")]
    Users,
    #[at("/settings/notifications")]
    NotificationSettings,
    #[at("/settings/cloud-init")]
    CloudInitSettings,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl MainRoute {
    pub fn meta(&self) -> &'static RouteMeta {
        shared::routes::resolve(&self.to_path())
    }

    /// Route for a guard redirect target.
    pub fn from_redirect(path: &str) -> Self {
        Self::recognize(path).unwrap_or(Self::Dashboard)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Setup => "Setup",
            Self::Login => "Sign in",
            Self::ForgotPassword => "Forgot password",
            Self::ResetPassword => "Reset password",
            Self::Dashboard => "Dashboard",
            Self::Executions => "Executions",
            Self::ExecutionDetail { .. } => "Execution",
            Self::Playbooks => "Playbooks",
            Self::Inventory => "Inventory",
            Self::Terraform => "Terraform",
            Self::NetBox => "NetBox",
            Self::Users => "Users",
            Self::NotificationSettings => "Notifications",
            Self::CloudInitSettings => "Cloud-Init",
            Self::NotFound => "Not found",
        }
    }

    /// Whether the page is rendered inside the navigation layout.
    pub fn uses_layout(&self) -> bool {
        self.meta().auth_required
    }
}

/// Links shown in the navigation bar, in display order.
pub const NAV_ROUTES: [MainRoute; 9] = [
    MainRoute::Dashboard,
    MainRoute::Executions,
    MainRoute::Playbooks,
    MainRoute::Inventory,
    MainRoute::Terraform,
    MainRoute::NetBox,
    MainRoute::Users,
    MainRoute::NotificationSettings,
    MainRoute::CloudInitSettings,
];

/// Switch function for the main routes; every route passes the guard.
pub fn switch(route: MainRoute) -> Html {
    log(std::format!("Switching to route: {route:?}").as_str());
    html! { <GuardedRoute {route} /> }
}
