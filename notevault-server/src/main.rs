//! NoteVault Persistence Server
//!
//! Remote half of the encrypted notepad. Stores an opaque ciphertext blob
//! per sync identifier together with an ownership fingerprint -- it never
//! possesses security codes or plaintext, and only fingerprint holders can
//! read, overwrite, or delete a record.

mod config;
mod error;
mod handlers;
mod server;
mod storage;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "notevault-server", about = "NoteVault persistence server")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "notevault.toml")]
    config: PathBuf,

    /// Listen address override
    #[arg(short, long)]
    listen: Option<String>,

    /// Database path override
    #[arg(short, long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut cfg = if cli.config.exists() {
        config::ServerConfig::load(&cli.config)?
    } else {
        tracing::info!("No config file found, using defaults");
        config::ServerConfig::default()
    };

    if let Some(listen) = cli.listen {
        cfg.listen_addr = listen;
    }
    if let Some(database) = cli.database {
        cfg.storage_path = database;
    }

    tracing::info!("Starting NoteVault server on {}", cfg.listen_addr);

    let storage = storage::VaultStorage::open(&cfg.storage_path)?;
    let app = server::build_router(storage, &cfg);

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
