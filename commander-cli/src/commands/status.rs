use anyhow::{Context as _, Result};
use shared::GuardDecision;
use shared::api::SetupApi;
use shared::routes;
use tracing::warn;

use crate::context::Context;

/// Prints the stored session, then the backend's setup checklist.
pub async fn status(ctx: &Context) -> Result<()> {
    println!("backend: {}", ctx.config.api_base_url);
    if ctx.session.is_authenticated() {
        println!("session: token stored at {}", ctx.storage.path().display());
    } else {
        println!("session: signed out");
    }

    let status = ctx
        .client
        .setup_status()
        .await
        .context("failed to fetch setup status")?;

    let mark = |done: bool| if done { "ok" } else { "missing" };
    println!(
        "setup: {}",
        if status.setup_complete {
            "complete"
        } else {
            "incomplete"
        }
    );
    println!("  proxmox connection: {}", mark(status.has_proxmox_config));
    println!("  secret key: {}", mark(status.has_secret_key));
    println!("  ssh key: {}", mark(status.has_ssh_key));
    for item in &status.missing_items {
        println!("  missing: {item}");
    }
    Ok(())
}

/// Runs the navigation guard for `path` against the stored session.
pub async fn check_route(ctx: &Context, path: &str) {
    let target = routes::resolve(path);

    // Super-admin checks need the profile, which is not persisted.
    if ctx.session.is_authenticated()
        && let Err(err) = ctx.session.fetch_profile().await
    {
        warn!(error = %err, "profile unavailable, evaluating as signed out");
    }

    let decision = ctx
        .guard
        .evaluate(target, None, &ctx.session.session())
        .await;
    match decision {
        GuardDecision::Allow => println!("{path} ({}): allow", target.name),
        GuardDecision::Redirect(to) => {
            println!("{path} ({}): redirect to {to}", target.name);
        }
    }
}
