//! Travel Guru CLI
//!
//! Command-line reader and admin console for Travel Guru, plus the
//! ingestion endpoint (`guru serve`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use guru_core::{AdminGate, CategoryFilter, Config, SyncCoordinator};

mod commands;
mod editor;
mod output;
mod server;

use commands::article::ArticleFields;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "guru")]
#[command(about = "Travel Guru - travel magazine reader, admin console and ingestion server")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the homepage feed (newest stories)
    Feed,
    /// Browse destinations by category and title/location
    Browse {
        /// Category, or "All Posts"
        #[arg(short, long)]
        category: Option<CategoryFilter>,
        /// Filter on title or location
        #[arg(short = 'Q', long)]
        query: Option<String>,
    },
    /// Read an article
    Show {
        /// Article id or slug
        key: String,
    },
    /// Search all articles
    Search {
        /// Search query
        query: String,
    },
    /// Show status (load source, counts, remote store)
    Status,
    /// Manage articles (admin)
    Article {
        #[command(subcommand)]
        command: ArticleCommands,
    },
    /// Write the bundled articles to the remote store (admin)
    Seed {
        #[command(flatten)]
        admin: AdminArgs,
    },
    /// Show or change the homepage
    Site {
        #[command(subcommand)]
        command: Option<SiteCommands>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Run the ingestion endpoint
    Serve {
        /// Listen address (defaults to bind_addr from config)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[derive(Args, Clone)]
struct AdminArgs {
    /// Admin password
    #[arg(long, env = "GURU_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum ArticleCommands {
    /// Create and publish an article
    #[command(alias = "add")]
    Create {
        #[command(flatten)]
        admin: AdminArgs,
        #[command(flatten)]
        fields: ArticleFields,
    },
    /// Edit an article (opens editor on the body if no fields are given)
    Edit {
        /// Article id or slug
        key: String,
        #[command(flatten)]
        admin: AdminArgs,
        #[command(flatten)]
        fields: ArticleFields,
    },
    /// Delete an article
    #[command(alias = "rm")]
    Delete {
        /// Article id or slug
        key: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        #[command(flatten)]
        admin: AdminArgs,
    },
}

#[derive(Subcommand)]
enum SiteCommands {
    /// Show the homepage configuration
    Show,
    /// Change homepage fields (admin)
    Set {
        #[command(flatten)]
        admin: AdminArgs,
        #[arg(long)]
        hero_title: Option<String>,
        #[arg(long)]
        hero_highlight: Option<String>,
        #[arg(long)]
        hero_subtitle: Option<String>,
        #[arg(long)]
        hero_image: Option<String>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, firebase_api_key, site_url, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

impl Commands {
    /// Credentials for commands that need the admin gate
    fn admin_args(&self) -> Option<&AdminArgs> {
        match self {
            Commands::Seed { admin } => Some(admin),
            Commands::Article { command } => match command {
                ArticleCommands::Create { admin, .. }
                | ArticleCommands::Edit { admin, .. }
                | ArticleCommands::Delete { admin, .. } => Some(admin),
            },
            Commands::Site {
                command: Some(SiteCommands::Set { admin, .. }),
            } => Some(admin),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(LogSettings::for_cli(&cli));

    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_deref();

    // Config commands work on the file directly
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config = Config::load_with_override(config_path).context("Failed to load configuration")?;

    if let Some(admin) = cli.command.admin_args() {
        AdminGate::new(config.admin_password())
            .verify(admin.password.as_deref())
            .context("Admin access denied")?;
    }

    if let Commands::Serve { bind } = cli.command {
        return server::serve(&config, bind).await;
    }

    let mut sync = SyncCoordinator::open(&config).context("Failed to open local cache")?;
    sync.load().await;

    let result = match cli.command {
        Commands::Feed => commands::catalog::feed(&sync, &output),
        Commands::Browse { category, query } => {
            commands::catalog::browse(&sync, category, query, &output)
        }
        Commands::Show { key } => commands::catalog::show(&mut sync, key, &output),
        Commands::Search { query } => commands::catalog::search(&sync, query, &output),
        Commands::Status => commands::status::show(&sync, &config, &output),
        Commands::Article { command } => handle_article_command(command, &mut sync, &output).await,
        Commands::Seed { .. } => commands::article::seed(&mut sync, &output).await,
        Commands::Site { command } => handle_site_command(command, &mut sync, &output).await,
        Commands::Config { .. } | Commands::Serve { .. } => Ok(()), // Handled above
    };

    output.print_toasts(&sync.take_toasts());
    result
}

async fn handle_article_command(
    command: ArticleCommands,
    sync: &mut SyncCoordinator,
    output: &Output,
) -> Result<()> {
    match command {
        ArticleCommands::Create { fields, .. } => commands::article::create(sync, fields, output).await,
        ArticleCommands::Edit { key, fields, .. } => {
            commands::article::edit(sync, key, fields, output).await
        }
        ArticleCommands::Delete { key, yes, .. } => {
            commands::article::delete(sync, key, yes, output).await
        }
    }
}

async fn handle_site_command(
    command: Option<SiteCommands>,
    sync: &mut SyncCoordinator,
    output: &Output,
) -> Result<()> {
    match command {
        Some(SiteCommands::Show) | None => commands::site::show(sync, output),
        Some(SiteCommands::Set {
            hero_title,
            hero_highlight,
            hero_subtitle,
            hero_image,
            ..
        }) => {
            commands::site::set(
                sync,
                hero_title,
                hero_highlight,
                hero_subtitle,
                hero_image,
                output,
            )
            .await
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&std::path::Path>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Logging choices derived from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSettings {
    default_filter: String,
    ansi: bool,
}

impl LogSettings {
    fn for_cli(cli: &Cli) -> Self {
        let level = if matches!(cli.command, Commands::Serve { .. }) {
            "info"
        } else {
            "warn"
        };
        Self {
            default_filter: format!("guru_core={0},guru_cli={0},tower_http={0}", level),
            ansi: !cli.json,
        }
    }
}

/// Log to stderr; GURU_LOG or RUST_LOG override the default filter
fn init_tracing(settings: LogSettings) {
    let env_filter = EnvFilter::try_from_env("GURU_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(&settings.default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(settings.ansi)
        .with_writer(std::io::stderr)
        .try_init();
}
