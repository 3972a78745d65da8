//! Types d'erreurs pour bvplaylist

use crate::store::StoreError;

/// Erreurs du gestionnaire de playlist
///
/// Une adresse invalide n'est pas une erreur : elle est signalée dans l'état
/// via [`crate::ValidationError::InvalidUrl`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("Index {index} out of range for playlist of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Another playlist intent is already in flight")]
    IntentInFlight,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Type Result spécialisé pour bvplaylist
pub type Result<T> = std::result::Result<T, Error>;
