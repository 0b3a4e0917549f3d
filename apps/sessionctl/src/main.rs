//! sessionctl binary.

use std::sync::Arc;

use auth::SessionRepository;
use clap::{Parser, Subcommand};
use session_store::SqliteSessionStore;

mod commands;
mod config;

use config::Config;

#[derive(Debug, Parser)]
#[command(name = "sessionctl")]
#[command(about = "Local session store CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Stores a session for a signed-in account
    SignIn(commands::SignInArgs),
    /// Logs every session out
    Logout,
    /// Prints the currently logged-in account
    Whoami,
    /// Follows the logged-in account, printing every change
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    init_tracing(&config.log_level);

    let cli = Cli::parse();

    let store = Arc::new(SqliteSessionStore::open(&config.db_path).await?);
    let repository = SessionRepository::new(store.clone());

    tracing::debug!(db_path = %config.db_path.display(), "Session store opened");

    match cli.command {
        Commands::SignIn(args) => commands::sign_in(&repository, args).await,
        Commands::Logout => commands::logout(&repository).await,
        Commands::Whoami => commands::whoami(&repository).await,
        Commands::Watch => commands::watch(store).await,
    }
}

/// Initializes tracing with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
