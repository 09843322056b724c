//! Runs the navigation guard before a route's page is rendered.

use crate::api::Services;
use crate::components::layout::Layout;
use crate::components::loading::Loading;
use crate::models::app_state::AppState;
use crate::pages::{ErrorPage, LoginPage, SectionPage, SetupPage, UsersPage};
use crate::routes::MainRoute;
use shared::{GuardDecision, RouteMeta, Session};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

#[derive(Properties, PartialEq)]
pub struct GuardedRouteProps {
    pub route: MainRoute,
}

/// Shows a loading state while the guard runs, then either redirects or
/// renders the page.
///
/// The guard is re-evaluated whenever the route or the session's access
/// level changes, so signing out on a protected page immediately leaves it.
/// Appearance changes keep the page mounted.
#[function_component(GuardedRoute)]
pub fn guarded_route(props: &GuardedRouteProps) -> Html {
    let session = use_selector(|state: &AppState| state.session.clone());
    let access = SessionAccess::of(&session);
    let decision = use_state(|| None::<Evaluated>);
    let previous = use_mut_ref(|| None::<&'static RouteMeta>);
    let generation = use_mut_ref(|| 0_u64);

    {
        let decision = decision.clone();
        let previous = previous.clone();
        let generation = generation.clone();
        let session = (*session).clone();
        use_effect_with((props.route.clone(), access), move |(route, _)| {
            evaluate(route.clone(), session, &previous, &generation, decision);
            || ()
        });
    }

    match current_decision(decision.as_ref(), &props.route, access) {
        None => html! { <Loading /> },
        Some(GuardDecision::Redirect(path)) => {
            html! { <Redirect<MainRoute> to={MainRoute::from_redirect(path)} /> }
        }
        Some(GuardDecision::Allow) => render_page(&props.route),
    }
}

/// The parts of a session the guard rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SessionAccess {
    authenticated: bool,
    super_admin: bool,
}

impl SessionAccess {
    fn of(session: &Session) -> Self {
        Self {
            authenticated: session.is_authenticated(),
            super_admin: session.is_super_admin(),
        }
    }
}

/// A guard decision together with the inputs it was made for.
#[derive(Debug, Clone, PartialEq)]
struct Evaluated {
    route: MainRoute,
    access: SessionAccess,
    decision: GuardDecision,
}

/// The component outlives route changes; a decision made for another route
/// or access level must not render this one.
fn current_decision(
    evaluated: Option<&Evaluated>,
    route: &MainRoute,
    access: SessionAccess,
) -> Option<GuardDecision> {
    evaluated
        .filter(|evaluated| evaluated.route == *route && evaluated.access == access)
        .map(|evaluated| evaluated.decision)
}

/// Starts an evaluation; only the most recent one may publish its result.
fn evaluate(
    route: MainRoute,
    session: Session,
    previous: &Rc<RefCell<Option<&'static RouteMeta>>>,
    generation: &Rc<RefCell<u64>>,
    decision: UseStateHandle<Option<Evaluated>>,
) {
    let target = route.meta();
    let access = SessionAccess::of(&session);
    let ticket = generation.borrow().wrapping_add(1);
    *generation.borrow_mut() = ticket;
    let previous = Rc::clone(previous);
    let generation = Rc::clone(generation);

    spawn_local(async move {
        let current = *previous.borrow();
        let outcome = Services::shared()
            .guard
            .evaluate(target, current, &session)
            .await;
        if *generation.borrow() != ticket {
            return;
        }
        if let GuardDecision::Redirect(path) = outcome {
            log(&format!("Guard redirected {} to {path}", target.path));
        } else {
            *previous.borrow_mut() = Some(target);
        }
        decision.set(Some(Evaluated {
            route,
            access,
            decision: outcome,
        }));
    });
}

fn render_page(route: &MainRoute) -> Html {
    let page = match route {
        MainRoute::Setup => html! { <SetupPage /> },
        MainRoute::Login => html! { <LoginPage /> },
        MainRoute::ForgotPassword | MainRoute::ResetPassword => html! {
            <SectionPage title={route.title()}
                description="Password resets are handled by an administrator. Ask a super-admin to set a new password for your account." />
        },
        MainRoute::Users => html! { <UsersPage /> },
        MainRoute::ExecutionDetail { id } => html! {
            <SectionPage title={format!("Execution #{id}")}
                description="Live output and status of a single playbook or Terraform run." />
        },
        MainRoute::NotFound => html! { <ErrorPage /> },
        MainRoute::Dashboard
        | MainRoute::Executions
        | MainRoute::Playbooks
        | MainRoute::Inventory
        | MainRoute::Terraform
        | MainRoute::NetBox
        | MainRoute::NotificationSettings
        | MainRoute::CloudInitSettings => html! {
            <SectionPage title={route.title()} description={section_description(route)} />
        },
    };

    if route.uses_layout() {
        html! { <Layout current_route={route.clone()}>{page}</Layout> }
    } else {
        page
    }
}

fn section_description(route: &MainRoute) -> &'static str {
    match route {
        MainRoute::Dashboard => "Cluster overview and recent activity.",
        MainRoute::Executions => "History of playbook and Terraform runs.",
        MainRoute::Playbooks => "Ansible playbooks available to your groups.",
        MainRoute::Inventory => "Hosts and groups known to Ansible.",
        MainRoute::Terraform => "Provisioning of virtual machines on Proxmox.",
        MainRoute::NetBox => "IP address management and documentation.",
        MainRoute::NotificationSettings => "Mail and webhook notification targets.",
        MainRoute::CloudInitSettings => "Cloud-Init templates used when provisioning.",
        _ => "",
    }
}
