//! Extension de bvconfig pour la playlist

use crate::manager::{ConcurrencyPolicy, ManagerConfig, PlaylistManager, MAX_EVENT_CAPACITY};
use crate::store::{KeyValueStore, MemoryStore, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Backend de stockage sélectionné par la configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

/// Trait d'extension pour bvconfig::Config
pub trait PlaylistConfigExt {
    /// Paramètres du gestionnaire (clé, politique, capacité du canal)
    fn playlist_manager_config(&self) -> anyhow::Result<ManagerConfig>;

    /// Backend de stockage configuré
    fn storage_backend(&self) -> anyhow::Result<StorageBackend>;

    /// Chemin de la base SQLite de la playlist
    fn playlist_db_path(&self) -> anyhow::Result<PathBuf>;
}

impl PlaylistConfigExt for bvconfig::Config {
    fn playlist_manager_config(&self) -> anyhow::Result<ManagerConfig> {
        let raw_policy = self.get_concurrency()?;
        let policy = raw_policy.parse().unwrap_or_else(|err| {
            tracing::warn!("{}, falling back to {}", err, ConcurrencyPolicy::default());
            ConcurrencyPolicy::default()
        });

        let raw_capacity = self.get_event_capacity()?;
        let event_capacity = raw_capacity.clamp(1, MAX_EVENT_CAPACITY);
        if event_capacity != raw_capacity {
            tracing::warn!(
                "Event capacity {} out of range, using {}",
                raw_capacity,
                event_capacity
            );
        }

        Ok(ManagerConfig {
            storage_key: self.get_storage_key()?,
            policy,
            event_capacity,
        })
    }

    fn storage_backend(&self) -> anyhow::Result<StorageBackend> {
        let backend = self.get_storage_backend()?;
        match backend.to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => Err(anyhow::anyhow!("Unknown storage backend: {}", other)),
        }
    }

    fn playlist_db_path(&self) -> anyhow::Result<PathBuf> {
        let storage_dir = self.get_storage_dir()?;
        Ok(PathBuf::from(storage_dir).join("playlist.db"))
    }
}

impl PlaylistManager {
    /// Construit un gestionnaire à partir de la configuration
    pub fn from_config(config: &bvconfig::Config) -> crate::Result<Self> {
        let manager_config = config.playlist_manager_config()?;

        let store: Arc<dyn KeyValueStore> = match config.storage_backend()? {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::Sqlite => {
                let path = config.playlist_db_path()?;
                tracing::info!(path = %path.display(), "Using SQLite playlist storage");
                Arc::new(SqliteStore::open(&path)?)
            }
        };

        Ok(Self::with_config(store, manager_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(dir: &tempfile::TempDir, vars: &[(&str, &str)]) -> bvconfig::Config {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>();
        bvconfig::Config::load_config_with_overrides(dir.path().to_str().unwrap(), vars).unwrap()
    }

    #[test]
    fn test_manager_config_from_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir, &[]);

        let manager_config = config.playlist_manager_config().unwrap();
        assert_eq!(manager_config.storage_key, "playlist");
        assert_eq!(manager_config.policy, ConcurrencyPolicy::Queue);
        assert_eq!(manager_config.event_capacity, 64);
        assert_eq!(config.storage_backend().unwrap(), StorageBackend::Sqlite);
        assert_eq!(
            config.playlist_db_path().unwrap(),
            dir.path().join("storage").join("playlist.db")
        );
    }

    #[test]
    fn test_unknown_policy_falls_back_to_queue() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir, &[("BARNVAKT_CONFIG__PLAYLIST__CONCURRENCY", "parallel")]);
        assert_eq!(
            config.playlist_manager_config().unwrap().policy,
            ConcurrencyPolicy::Queue
        );
    }

    #[test]
    fn test_event_capacity_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let huge = load(
            &dir,
            &[("BARNVAKT_CONFIG__PLAYLIST__EVENT_CAPACITY", "9223372036854775807")],
        );
        assert_eq!(
            huge.playlist_manager_config().unwrap().event_capacity,
            MAX_EVENT_CAPACITY
        );

        // Un canal de capacité nulle ferait paniquer tokio
        let zero = load(&dir, &[("BARNVAKT_CONFIG__PLAYLIST__EVENT_CAPACITY", "0")]);
        assert_eq!(zero.playlist_manager_config().unwrap().event_capacity, 1);

        let manager = PlaylistManager::from_config(&huge).unwrap();
        assert!(manager.subscribe().is_empty());
    }

    #[test]
    fn test_unknown_backend_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir, &[("BARNVAKT_CONFIG__STORAGE__BACKEND", "cloud")]);
        assert!(config.storage_backend().is_err());
        assert!(PlaylistManager::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_from_config_memory_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(
            &dir,
            &[
                ("BARNVAKT_CONFIG__STORAGE__BACKEND", "memory"),
                ("BARNVAKT_CONFIG__STORAGE__KEY", "urls"),
                ("BARNVAKT_CONFIG__PLAYLIST__CONCURRENCY", "reject"),
            ],
        );

        let manager = PlaylistManager::from_config(&config).unwrap();
        assert_eq!(manager.storage_key(), "urls");
        assert_eq!(manager.policy(), ConcurrencyPolicy::Reject);
        assert!(manager.initialize().await.unwrap().playlist.is_empty());
    }

    #[tokio::test]
    async fn test_from_config_sqlite_backend_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir, &[]);

        let manager = PlaylistManager::from_config(&config).unwrap();
        manager.initialize().await.unwrap();
        manager.set_pending_input("https://example.com/a");
        manager.add().await.unwrap();

        let reopened = PlaylistManager::from_config(&config).unwrap();
        let snapshot = reopened.initialize().await.unwrap();
        assert_eq!(snapshot.playlist, vec!["https://example.com/a".to_string()]);
    }
}
