use std::io::{self, Write};

use anyhow::{Context as _, Result, anyhow, bail};
use rpassword::prompt_password;
use shared::models::{DarkMode, KNOWN_THEMES, PreferencesUpdate, SidebarLogo};
use shared::session::{Profile, ThemePreferences};

use crate::context::Context;

pub async fn login(ctx: &Context, username: Option<String>) -> Result<()> {
    let username = match username {
        Some(name) => name.trim().to_string(),
        None => prompt("Username: ")?,
    };
    let password = prompt_password("Password: ")?;
    if password.is_empty() {
        bail!("password must not be empty");
    }

    let profile = ctx
        .session
        .login(&username, &password)
        .await
        .map_err(|err| anyhow!("login failed: {}", err.user_message()))?;

    print_profile(&profile);
    println!("session stored at {}", ctx.storage.path().display());
    Ok(())
}

pub async fn whoami(ctx: &Context, access: bool) -> Result<()> {
    ctx.require_session().await?;
    if access {
        ctx.session
            .fetch_access_summary()
            .await
            .context("failed to load access summary")?;
    }

    let session = ctx.session.session();
    let profile = session
        .profile()
        .ok_or_else(|| anyhow!("not signed in; run `commander login` first"))?;
    print_profile(profile);

    if let Some(summary) = &profile.access {
        println!("active: {}", summary.is_active);
        println!("can manage users: {}", summary.can_manage_users);
    }
    Ok(())
}

pub fn logout(ctx: &Context) {
    if ctx.session.is_authenticated() {
        ctx.session.logout();
        println!("Signed out; token removed from {}", ctx.storage.path().display());
    } else {
        println!("No session stored at {}", ctx.storage.path().display());
    }
}

pub async fn preferences(
    ctx: &Context,
    theme: Option<String>,
    dark_mode: Option<DarkMode>,
    sidebar_logo: Option<SidebarLogo>,
) -> Result<()> {
    if let Some(theme) = &theme
        && !KNOWN_THEMES.contains(&theme.as_str())
    {
        bail!(
            "unknown theme '{theme}'; choose one of {}",
            KNOWN_THEMES.join(", ")
        );
    }
    ctx.require_session().await?;

    let update = PreferencesUpdate {
        theme,
        dark_mode,
        sidebar_logo,
    };
    let profile = ctx
        .session
        .update_preferences(update)
        .await
        .context("failed to save preferences")?;
    print_preferences(&profile.preferences);
    Ok(())
}

pub async fn change_password(ctx: &Context, sync_to_netbox: bool) -> Result<()> {
    if !ctx.session.is_authenticated() {
        bail!("not signed in; run `commander login` first");
    }
    let current = prompt_password("Current password: ")?;
    let new = prompt_password("New password: ")?;
    let confirm = prompt_password("Confirm new password: ")?;

    let response = ctx
        .session
        .change_password(&current, &new, &confirm, sync_to_netbox)
        .await
        .map_err(|err| anyhow!("password not changed: {}", err.user_message()))?;

    if response.message.is_empty() {
        println!("Password changed.");
    } else {
        println!("{}", response.message);
    }
    Ok(())
}

pub async fn init_admin(ctx: &Context) -> Result<()> {
    let admin = ctx
        .session
        .init_admin()
        .await
        .context("failed to create the administrator")?;
    println!("Created administrator '{}'.", admin.username);
    println!("Sign in with `commander login` and change the initial password right away.");
    Ok(())
}

fn print_profile(profile: &Profile) {
    let role = if profile.is_super_admin {
        "super-admin"
    } else {
        "user"
    };
    println!("Signed in as {} ({role})", profile.username);
    if let Some(email) = &profile.email {
        println!("email: {email}");
    }
    if !profile.accessible_groups.is_empty() {
        println!("groups: {}", join(&profile.accessible_groups));
    }
    if !profile.accessible_playbooks.is_empty() {
        println!("playbooks: {}", join(&profile.accessible_playbooks));
    }
    print_preferences(&profile.preferences);
}

fn print_preferences(preferences: &ThemePreferences) {
    println!(
        "theme: {} ({}), sidebar logo: {}",
        preferences.theme, preferences.dark_mode, preferences.sidebar_logo
    );
}

fn join<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    values
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}
