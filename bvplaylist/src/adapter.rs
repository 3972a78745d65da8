//! Adaptateur entre le gestionnaire et le stockage clé/valeur
//!
//! Une seule clé (par défaut `playlist`), une seule forme de valeur : un
//! tableau JSON de chaînes. Pas de relance en cas d'échec.

use crate::state::Playlist;
use crate::store::{KeyValueStore, StoreError};
use crate::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Clé de stockage par défaut
pub const DEFAULT_STORAGE_KEY: &str = "playlist";

#[derive(Clone)]
pub struct StoreAdapter {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl StoreAdapter {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Lit la playlist persistée. Clé absente ou `null` : playlist vide.
    pub async fn load(&self) -> Result<Playlist> {
        let value = self.store.get(&self.key).await.map_err(|e| {
            warn!(key = %self.key, "Failed to load playlist: {}", e);
            e
        })?;

        let playlist = match value {
            None | Some(Value::Null) => Playlist::new(),
            Some(value) => serde_json::from_value(value).map_err(|source| {
                warn!(key = %self.key, "Stored playlist is malformed: {}", source);
                StoreError::Malformed {
                    key: self.key.clone(),
                    source,
                }
            })?,
        };

        debug!(key = %self.key, len = playlist.len(), "Loaded playlist");
        Ok(playlist)
    }

    /// Remplace la playlist persistée par `playlist`
    pub async fn save(&self, playlist: &[String]) -> Result<()> {
        let value = serde_json::to_value(playlist).map_err(StoreError::from)?;

        self.store.set(&self.key, value).await.map_err(|e| {
            warn!(key = %self.key, "Failed to save playlist: {}", e);
            e
        })?;

        debug!(key = %self.key, len = playlist.len(), "Saved playlist");
        Ok(())
    }
}

impl std::fmt::Debug for StoreAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreAdapter")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
