//! Buildwise server - construction project management over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use buildwise_server::{router, seed, AppState, Backend, ServerConfig};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "buildwise")]
#[command(about = "Construction project management API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
        /// Data directory
        #[arg(short, long, default_value = ".buildwise")]
        storage: PathBuf,
        /// Storage backend
        #[arg(long, value_enum, default_value_t = Backend::Json)]
        backend: Backend,
    },
    /// Load demo users and a project
    Seed {
        /// Data directory
        #[arg(short, long, default_value = ".buildwise")]
        storage: PathBuf,
        /// Storage backend
        #[arg(long, value_enum, default_value_t = Backend::Json)]
        backend: Backend,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, storage, backend } => {
            let config = ServerConfig { bind, storage_path: storage, backend };
            let state = AppState::open(&config).await.context("Failed to open storage")?;

            let listener = tokio::net::TcpListener::bind(config.bind)
                .await
                .with_context(|| format!("Failed to bind {}", config.bind))?;
            info!("Buildwise v{} listening on {}", env!("CARGO_PKG_VERSION"), config.bind);
            axum::serve(listener, router(state)).await?;
        }
        Commands::Seed { storage, backend } => {
            let config = ServerConfig { storage_path: storage, backend, ..Default::default() };
            let state = AppState::open(&config).await.context("Failed to open storage")?;

            info!("Starting seed...");
            let mut storage = state.write().await;
            let seeded = seed::seed(&mut **storage).await.context("Seed failed")?;
            info!("Seed completed successfully! Project id: {}", seeded.project.id);
        }
    }

    Ok(())
}
