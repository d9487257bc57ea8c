use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rollcall::catalog::Catalog;
use rollcall::db::RegistrationStore;
use rollcall::state::AppState;

/// School event registration service driven by a JSON class catalog.
#[derive(Debug, Parser)]
#[command(name = "rollcall", version)]
struct Cli {
    /// Path to the class catalog
    #[arg(short, long, default_value = "classes.json")]
    config: PathBuf,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// SQLite file holding accepted registrations
    #[arg(long, default_value = "registrations.sqlite3")]
    data: PathBuf,

    /// Verbose logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    // An invalid catalog must never serve traffic.
    let catalog = Catalog::load(&cli.config)
        .with_context(|| format!("loading class catalog from {}", cli.config.display()))?;
    info!(
        grades = catalog.grades().count(),
        config = %cli.config.display(),
        "catalog loaded"
    );

    let store = RegistrationStore::open(&cli.data)?;
    let state = AppState::new(catalog, store, cli.host, cli.port)?;
    rollcall::serve(state).await
}
