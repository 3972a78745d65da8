//! Contrat du stockage clé/valeur externe et ses implémentations
//!
//! Le gestionnaire ne connaît le stockage qu'à travers [`KeyValueStore`] :
//! `get(key)` et `set(key, value)`, valeurs JSON.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde_json::Value;

/// Erreurs remontées par un backend de stockage
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed value at key '{key}': {source}")]
    Malformed {
        key: String,
        source: serde_json::Error,
    },
}

/// Stockage clé/valeur durable, éventuellement synchronisé entre appareils.
///
/// Un `set` remplace atomiquement la valeur associée à la clé. Une clé
/// absente se lit comme `Ok(None)`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}
