//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Which storage backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Backend {
    /// One JSON file per record
    #[default]
    Json,
    /// A single SQLite database file (requires the `sqlite` feature)
    Sqlite,
}

/// Buildwise server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: SocketAddr,
    /// Data directory
    pub storage_path: PathBuf,
    /// Storage backend
    pub backend: Backend,
}

impl ServerConfig {
    /// Database file used by the SQLite backend.
    pub fn database_path(&self) -> PathBuf {
        self.storage_path.join("buildwise.db")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            storage_path: ".buildwise".into(),
            backend: Backend::Json,
        }
    }
}
