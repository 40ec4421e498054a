//! passvault command-line frontend
//!
//! Logs in with a user from the `username{N}`/`password{N}` environment
//! table and runs one command against that user's password tree.

mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use passvault_app::{AppConfig, AppState, AppStateBuilder};
use passvault_core::types::{Account, AddItemRequest};

/// Environment variable read when `--password` is not given
const PASSWORD_ENV: &str = "PASSVAULT_PASSWORD";

/// passvault - personal password manager
#[derive(Parser, Debug)]
#[command(name = "passvault", version)]
#[command(about = "Manage a categorized password vault from the terminal")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "passvault.toml")]
    config: PathBuf,

    /// User to log in as
    #[arg(short, long)]
    user: String,

    /// Login password (falls back to $PASSVAULT_PASSWORD)
    #[arg(short, long)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the whole tree
    List {
        /// Show passwords in clear text
        #[arg(long)]
        show_passwords: bool,
    },
    /// Print items whose website or username matches
    Search {
        term: String,
        #[arg(long)]
        show_passwords: bool,
    },
    /// Print the password strength overview
    Stats,
    /// Export all accounts as CSV
    Export {
        /// Output file (defaults to the suggested file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Add an item with one account
    Add {
        #[arg(long)]
        category: String,
        /// Target subcategory (defaults to the category's default bucket)
        #[arg(long)]
        subcategory: Option<String>,
        #[arg(long)]
        website: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        username: String,
        #[arg(long = "account-password")]
        account_password: String,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Delete one account of an item
    DeleteAccount {
        #[arg(long)]
        item: String,
        #[arg(long)]
        index: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr, command output to stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(&cli.config)?;
    let state = AppStateBuilder::from_config(&config)
        .await
        .context("Failed to initialize storage")?
        .build()?;

    let password = match cli.password {
        Some(password) => password,
        None => std::env::var(PASSWORD_ENV)
            .with_context(|| format!("--password or ${PASSWORD_ENV} is required"))?,
    };
    state.login(&cli.user, &password).await?;

    execute(&state, &cli.user, cli.command).await
}

async fn execute(state: &AppState, user: &str, command: Command) -> Result<()> {
    let session = state.session().await?;

    match command {
        Command::List { show_passwords } => {
            print!("{}", render::tree(&session.vault.snapshot().await, show_passwords));
        }
        Command::Search {
            term,
            show_passwords,
        } => {
            let filtered = session.vault.search(&term).await;
            if filtered.is_empty() {
                println!("No items match \"{term}\"");
            } else {
                print!("{}", render::tree(&filtered, show_passwords));
            }
        }
        Command::Stats => {
            print!("{}", render::security(&session.vault.security_overview().await));
        }
        Command::Export { output } => {
            let export = state.export_service.export_csv(user).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(&export.suggested_filename));
            tokio::fs::write(&path, export.content.as_bytes())
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {} accounts to {}", export.row_count, path.display());
        }
        Command::Add {
            category,
            subcategory,
            website,
            url,
            username,
            account_password,
            note,
        } => {
            let id = session
                .vault
                .add_item(AddItemRequest {
                    category_id: category,
                    subcategory_id: subcategory,
                    website,
                    url,
                    account: Account::new(&username, &account_password, &note),
                })
                .await?;
            println!("Added item {id}");
        }
        Command::DeleteAccount { item, index } => {
            session.vault.delete_account(&item, index).await?;
            println!("Deleted account #{index} of {item}");
        }
    }
    Ok(())
}
