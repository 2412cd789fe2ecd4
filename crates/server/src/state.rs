//! Shared server state.

use std::sync::Arc;

use buildwise_storage::Storage;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

use crate::config::{Backend, ServerConfig};

/// Storage shared by every request.
///
/// Reads share the lock; any handler that writes holds it exclusively for
/// its whole read-modify-write sequence.
#[derive(Clone)]
pub struct AppState {
    storage: Arc<RwLock<Box<dyn Storage>>>,
}

impl AppState {
    /// Wrap an opened backend.
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Arc::new(RwLock::new(Box::new(storage))),
        }
    }

    /// Open the backend selected by `config`.
    pub async fn open(config: &ServerConfig) -> buildwise_storage::Result<Self> {
        match config.backend {
            Backend::Json => {
                info!("Using JSON storage at {}", config.storage_path.display());
                let storage = buildwise_storage::JsonStorage::new(&config.storage_path).await?;
                Ok(Self::new(storage))
            }
            #[cfg(feature = "sqlite")]
            Backend::Sqlite => {
                tokio::fs::create_dir_all(&config.storage_path).await?;
                let path = config.database_path();
                info!("Using SQLite storage at {}", path.display());
                let storage = buildwise_storage::SqliteStorage::new_from_path(&path).await?;
                Ok(Self::new(storage))
            }
            #[cfg(not(feature = "sqlite"))]
            Backend::Sqlite => Err(buildwise_storage::StorageError::Other(
                "SQLite backend not compiled in; rebuild with --features sqlite".to_string(),
            )),
        }
    }

    /// Shared access for reads.
    pub async fn read(&self) -> RwLockReadGuard<'_, Box<dyn Storage>> {
        self.storage.read().await
    }

    /// Exclusive access for writes.
    pub async fn write(&self) -> RwLockWriteGuard<'_, Box<dyn Storage>> {
        self.storage.write().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildwise_core::{User, UserRole};
    use buildwise_storage::MemoryStorage;

    #[tokio::test]
    async fn test_writes_are_visible_to_clones() {
        let state = AppState::new(MemoryStorage::new());
        let other = state.clone();

        let user = User::new("pm@site.test", None, UserRole::ProjectManager);
        state.write().await.save_user(&user).await.unwrap();

        assert!(other.read().await.load_user(user.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_open_json_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            storage_path: dir.path().join("data"),
            ..Default::default()
        };
        let state = AppState::open(&config).await.unwrap();
        assert!(state.read().await.list_users().await.unwrap().is_empty());
    }
}
