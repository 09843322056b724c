//! Operator CLI for a Proxmox Commander backend.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use dotenv::dotenv;
use shared::config::ClientConfig;
use shared::models::{DarkMode, SidebarLogo};
use url::Url;

mod commands;
mod context;
mod logging;
mod storage;

use context::Context;

/// Proxmox Commander CLI
#[derive(Parser)]
#[command(name = "commander")]
#[command(version, about = "Command-line client for Proxmox Commander", long_about = None)]
struct Cli {
    /// Path to a configuration file (YAML or JSON)
    #[arg(long, short, global = true, env = "COMMANDER_CONFIG")]
    config: Option<PathBuf>,

    /// Backend URL, overriding the configuration file and environment
    #[arg(long, global = true)]
    api_url: Option<Url>,

    /// Where the session token and cached preferences are kept
    #[arg(long, global = true, env = "COMMANDER_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the Proxmox Commander CLI
#[derive(Subcommand)]
enum Commands {
    /// Show first-run setup progress and the stored session
    Status,

    /// Create the bootstrap administrator on a fresh installation
    InitAdmin,

    /// Sign in and store the session token
    Login {
        /// Account name; prompted for when omitted
        #[arg(long, short)]
        username: Option<String>,
    },

    /// Show the signed-in user
    Whoami {
        /// Also fetch the permission summary
        #[arg(long)]
        access: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show or change appearance preferences
    Preferences {
        /// Colour theme (blue, orange, green, purple, teal)
        #[arg(long)]
        theme: Option<String>,

        /// Colour scheme (light, dark, system)
        #[arg(long)]
        dark_mode: Option<DarkMode>,

        /// Sidebar logo variant (icon, banner)
        #[arg(long)]
        sidebar_logo: Option<SidebarLogo>,
    },

    /// Change the signed-in user's password
    ChangePassword {
        /// Do not push the new password to the linked NetBox account
        #[arg(long)]
        no_sync: bool,
    },

    /// Report whether the dashboard would open a path for the stored session
    CheckRoute {
        /// Dashboard path, e.g. /users or /executions/42
        path: String,
    },

    /// List user accounts (super-admin only)
    Users {
        /// Filter by username or email
        #[arg(long, short)]
        search: Option<String>,

        /// Number of users to skip
        #[arg(long)]
        skip: Option<u32>,

        /// Maximum number of users to return
        #[arg(long, short, default_value_t = 50)]
        limit: u32,
    },

    /// Generate a configuration file
    Config {
        /// Format of the configuration file to generate (yaml or json). Defaults to yaml.
        #[arg(long, short, default_value = "yaml")]
        format: String,
    },

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script
        #[arg(long, short)]
        shell: Shell,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    // Offline commands never touch configuration or the session file.
    match &cli.command {
        Commands::Config { format } => return commands::config::generate_config(format),
        Commands::Completion { shell } => {
            commands::completion::generate_completion(*shell);
            return Ok(());
        }
        _ => {}
    }

    let config = ClientConfig::load_config(cli.config.as_deref(), cli.api_url)
        .context("failed to load configuration")?;
    logging::init(&config);
    let ctx = Context::new(config, cli.session_file)?;

    match cli.command {
        Commands::Status => commands::status::status(&ctx).await,
        Commands::InitAdmin => commands::session::init_admin(&ctx).await,
        Commands::Login { username } => commands::session::login(&ctx, username).await,
        Commands::Whoami { access } => commands::session::whoami(&ctx, access).await,
        Commands::Logout => {
            commands::session::logout(&ctx);
            Ok(())
        }
        Commands::Preferences {
            theme,
            dark_mode,
            sidebar_logo,
        } => commands::session::preferences(&ctx, theme, dark_mode, sidebar_logo).await,
        Commands::ChangePassword { no_sync } => {
            commands::session::change_password(&ctx, !no_sync).await
        }
        Commands::CheckRoute { path } => {
            commands::status::check_route(&ctx, &path).await;
            Ok(())
        }
        Commands::Users {
            search,
            skip,
            limit,
        } => commands::users::list(&ctx, search, skip, limit).await,
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}
