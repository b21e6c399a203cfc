//! NoteVault CLI
//!
//! Drives the sync coordinator from a terminal: unlock a vault, show or
//! edit the note, delete the vault, or report sync status. Note content is
//! encrypted before it leaves the process; the server only ever sees
//! ciphertext and the ownership fingerprint.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use notevault_core::sync::remote::{
    FetchOutcome, PushOutcome, RemoteError, RemoteVault, RemoveOutcome,
};
use notevault_core::{
    Connectivity, DeleteOutcome, HttpRemoteVault, MirrorStore, SaveDebouncer, SaveOutcome,
    SyncCoordinator, UnlockSource,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// NoteVault - single-user encrypted notepad with cloud mirroring
#[derive(Parser)]
#[command(name = "notevault", about = "Encrypted notepad with optional cloud sync")]
struct Cli {
    /// Sync server base URL
    #[arg(long, default_value = "http://127.0.0.1:4000")]
    server: String,

    /// Directory for the local mirror (defaults to the platform data dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Skip the network entirely and work from the local mirror
    #[arg(long)]
    offline: bool,

    /// Security code (prompted interactively when omitted)
    #[arg(long)]
    code: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unlock a vault and print the note
    Show {
        /// Sync identifier
        id: String,
    },

    /// Replace the note with content read from stdin, autosaving after
    /// each quiet second of input
    Edit {
        /// Sync identifier
        id: String,
    },

    /// Delete the vault remotely and locally
    Delete {
        /// Sync identifier
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Report connectivity and where the note currently lives
    Status {
        /// Sync identifier
        id: String,
    },
}

/// Remote that refuses every call, for `--offline`. The coordinator's
/// degradation path does the rest.
struct OfflineRemote;

#[async_trait::async_trait]
impl RemoteVault for OfflineRemote {
    async fn fetch(&self, _: &str, _: &str) -> Result<FetchOutcome, RemoteError> {
        Err(RemoteError::Unreachable("offline mode".to_string()))
    }

    async fn push(&self, _: &str, _: &str, _: &str) -> Result<PushOutcome, RemoteError> {
        Err(RemoteError::Unreachable("offline mode".to_string()))
    }

    async fn delete(&self, _: &str, _: &str) -> Result<RemoveOutcome, RemoteError> {
        Err(RemoteError::Unreachable("offline mode".to_string()))
    }
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(dirs::data_dir)
        .or_else(|| dirs::home_dir().map(|h| h.join(".data")))
        .unwrap_or_else(|| PathBuf::from("."));

    base.join("NoteVault")
}

fn connectivity_message(connectivity: Connectivity) -> &'static str {
    match connectivity {
        Connectivity::Online => "Connected",
        Connectivity::Offline => "Offline Mode",
        Connectivity::Degraded => "Server Degraded",
    }
}

fn outcome_message(outcome: SaveOutcome) -> &'static str {
    match outcome {
        SaveOutcome::Unchanged => "No changes",
        SaveOutcome::Synced => "All changes synced",
        SaveOutcome::Conflict => "Sync failed: this ID is locked to another code",
        SaveOutcome::SavedLocally(Connectivity::Degraded) => {
            "Saved locally (server storage failing)"
        }
        SaveOutcome::SavedLocally(_) => "Saved locally (Offline)",
    }
}

fn source_message(source: UnlockSource) -> &'static str {
    match source {
        UnlockSource::Remote => "cloud copy",
        UnlockSource::LocalMirror => "local mirror",
        UnlockSource::Fresh => "new empty vault",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    let mirror = MirrorStore::open(&data_dir).context("Failed to open local mirror")?;

    let remote: Arc<dyn RemoteVault> = if cli.offline {
        Arc::new(OfflineRemote)
    } else {
        Arc::new(HttpRemoteVault::new(&cli.server).map_err(|e| anyhow::anyhow!("{}", e))?)
    };

    let mut coordinator = SyncCoordinator::new(remote, mirror);

    let code = match &cli.code {
        Some(code) => code.clone(),
        None => rpassword::prompt_password("Security code: ")?,
    };

    match cli.command {
        Commands::Show { id } => {
            let report = coordinator.unlock(&id, &code).await?;
            eprintln!(
                "[{}] {} ({})",
                id,
                connectivity_message(report.connectivity),
                source_message(report.source)
            );
            println!("{}", report.plaintext);
            coordinator.lock();
        }

        Commands::Edit { id } => {
            let report = coordinator.unlock(&id, &code).await?;
            eprintln!(
                "[{}] {}. Enter new note content, Ctrl-D to finish.",
                id,
                connectivity_message(report.connectivity)
            );

            edit_loop(&mut coordinator).await?;
            coordinator.lock();
        }

        Commands::Delete { id, yes } => {
            coordinator.unlock(&id, &code).await?;

            if !yes && !confirm(&format!("Delete vault '{}' everywhere?", id))? {
                eprintln!("Aborted");
                coordinator.lock();
                return Ok(());
            }

            match coordinator.delete_vault().await? {
                DeleteOutcome::Deleted => eprintln!("Vault '{}' deleted", id),
                DeleteOutcome::Conflict => {
                    bail!("Delete refused: this ID is locked to another code")
                }
                DeleteOutcome::Unavailable(_) => {
                    bail!("Cannot delete while offline; the vault was left untouched")
                }
            }
        }

        Commands::Status { id } => {
            let report = coordinator.unlock(&id, &code).await?;
            println!("Status:  {}", connectivity_message(report.connectivity));
            println!("Source:  {}", source_message(report.source));
            println!("Length:  {} characters", report.plaintext.chars().count());
            coordinator.lock();
        }
    }

    Ok(())
}

/// Read note content line by line, autosaving on the trailing edge of a
/// one-second quiet period, with a final flush at end of input.
async fn edit_loop(coordinator: &mut SyncCoordinator) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut debouncer = SaveDebouncer::default();
    let mut buffer = String::new();
    let mut got_input = false;

    loop {
        let wait = debouncer
            .time_until_fire()
            .unwrap_or(Duration::from_secs(3600));

        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    if got_input {
                        buffer.push('\n');
                    }
                    buffer.push_str(&line);
                    got_input = true;
                    debouncer.record_input();
                }
                None => break,
            },
            _ = tokio::time::sleep(wait), if debouncer.is_pending() => {
                if debouncer.take_ready() {
                    let outcome = coordinator.save(&buffer).await?;
                    eprintln!("{}", outcome_message(outcome));
                }
            }
        }
    }

    debouncer.cancel();
    if got_input {
        let outcome = coordinator.save(&buffer).await?;
        eprintln!("{}", outcome_message(outcome));
    } else {
        eprintln!("No input; note left unchanged");
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{} [y/N] ", prompt);
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
