use anyhow::{Context as _, Result, bail};
use shared::models::UserQuery;

use crate::context::Context;

pub async fn list(
    ctx: &Context,
    search: Option<String>,
    skip: Option<u32>,
    limit: u32,
) -> Result<()> {
    ctx.require_session().await?;
    if !ctx.session.session().is_super_admin() {
        bail!("listing users requires a super-admin account");
    }

    let query = UserQuery {
        skip,
        limit: Some(limit),
        search: search.filter(|term| !term.trim().is_empty()),
    };
    let page = ctx
        .users
        .fetch_users(query)
        .await
        .context("failed to list users")?;

    println!("{:<6} {:<24} {:<12} {:<9} last login", "id", "username", "role", "status");
    for user in &page.items {
        let role = if user.is_super_admin {
            "super-admin"
        } else {
            "user"
        };
        let status = if user.is_active { "active" } else { "disabled" };
        println!(
            "{:<6} {:<24} {:<12} {:<9} {}",
            user.id,
            user.username,
            role,
            status,
            user.last_login.as_deref().unwrap_or("never")
        );
    }
    println!("{} of {} users", page.items.len(), page.total);
    Ok(())
}
