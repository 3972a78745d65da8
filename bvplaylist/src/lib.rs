//! # bvplaylist - Gestionnaire de la playlist de Barnvakt
//!
//! Cette crate maintient une liste ordonnée d'adresses web synchronisée avec
//! un stockage clé/valeur durable, partagé entre appareils :
//! - Validation des adresses saisies (URL syntaxiquement valide)
//! - Ajout, suppression et déplacement d'éléments
//! - Relecture du stockage après `add` et `remove` (reload-after-write)
//! - Diffusion de l'état après chaque changement
//!
//! # Architecture
//!
//! - **KeyValueStore** : contrat `get`/`set` du stockage externe
//!   ([`MemoryStore`], [`SqliteStore`])
//! - **StoreAdapter** : une clé (`playlist`), une forme de valeur
//!   (tableau de chaînes)
//! - **PlaylistManager** : état local, intentions, politique de cohérence
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use bvplaylist::{AddOutcome, MemoryStore, PlaylistManager};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> bvplaylist::Result<()> {
//! let manager = PlaylistManager::new(Arc::new(MemoryStore::new()));
//! manager.initialize().await?;
//!
//! manager.set_pending_input("https://example.com/a");
//! assert_eq!(manager.add().await?, AddOutcome::Added);
//!
//! manager.set_pending_input("not a url");
//! assert_eq!(manager.add().await?, AddOutcome::Rejected);
//! # Ok(())
//! # }
//! ```

mod adapter;
mod error;
mod intent;
mod manager;
mod state;
pub mod store;

#[cfg(feature = "bvconfig")]
mod config_ext;

// Réexports publics
pub use adapter::{StoreAdapter, DEFAULT_STORAGE_KEY};
pub use error::{Error, Result};
pub use intent::{AddOutcome, Intent};
pub use manager::{
    ConcurrencyPolicy, ManagerConfig, PlaylistEvent, PlaylistEventKind, PlaylistManager,
    DEFAULT_EVENT_CAPACITY, MAX_EVENT_CAPACITY,
};
pub use state::{move_item, validate_address, Playlist, PlaylistSnapshot, ValidationError};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};

#[cfg(feature = "bvconfig")]
pub use config_ext::{PlaylistConfigExt, StorageBackend};
