//! PlaylistManager : état local de la playlist synchronisé avec le stockage
//!
//! Politique de cohérence :
//! - `add` et `remove` écrivent puis relisent toute la playlist depuis le
//!   stockage (reload-after-write). La valeur locale calculée avant l'écriture
//!   est jetée ; seul ce que le stockage contient après coup fait foi, même si
//!   un autre appareil a écrit entre-temps.
//! - `reorder` applique le nouvel ordre localement puis l'écrit, sans relire.
//!
//! Les intentions qui touchent au stockage passent par un verrou à une place
//! (voir [`ConcurrencyPolicy`]) : tant qu'une écriture n'a pas été relue,
//! aucune autre intention ne part de l'état local périmé.

use crate::adapter::{StoreAdapter, DEFAULT_STORAGE_KEY};
use crate::intent::{AddOutcome, Intent};
use crate::state::{
    move_item, validate_address, Playlist, PlaylistSnapshot, PlaylistState, ValidationError,
};
use crate::store::KeyValueStore;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock as StdRwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Capacité par défaut du canal d'évènements
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Capacité maximale du canal d'évènements, allouée d'emblée par tokio
pub const MAX_EVENT_CAPACITY: usize = 4096;

/// Conduite à tenir quand une intention arrive pendant qu'une autre attend
/// encore le stockage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConcurrencyPolicy {
    /// Attendre la fin de l'intention en cours
    #[default]
    Queue,
    /// Refuser immédiatement avec [`Error::IntentInFlight`]
    Reject,
}

impl ConcurrencyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConcurrencyPolicy::Queue => "queue",
            ConcurrencyPolicy::Reject => "reject",
        }
    }
}

impl fmt::Display for ConcurrencyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConcurrencyPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queue" => Ok(ConcurrencyPolicy::Queue),
            "reject" => Ok(ConcurrencyPolicy::Reject),
            other => Err(format!("unknown concurrency policy: {}", other)),
        }
    }
}

/// Paramètres du gestionnaire
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    pub storage_key: String,
    pub policy: ConcurrencyPolicy,
    pub event_capacity: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            policy: ConcurrencyPolicy::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Variantes d'évènements émis après chaque changement d'état.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistEventKind {
    /// Playlist relue depuis le stockage (démarrage, ajout, suppression)
    Reloaded,
    /// Saisie modifiée
    InputChanged,
    /// Ajout refusé, saisie invalide
    ValidationFailed,
    /// Nouvel ordre appliqué localement
    Reordered,
}

/// Évènement diffusé aux abonnés (couche de présentation).
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistEvent {
    pub kind: PlaylistEventKind,
    pub snapshot: PlaylistSnapshot,
    pub timestamp: DateTime<Utc>,
}

struct ManagerInner {
    adapter: StoreAdapter,
    state: StdRwLock<PlaylistState>,
    in_flight: Mutex<()>,
    policy: ConcurrencyPolicy,
    event_tx: broadcast::Sender<PlaylistEvent>,
}

/// Gestionnaire de la playlist
///
/// Les clones partagent le même état.
#[derive(Clone)]
pub struct PlaylistManager {
    inner: Arc<ManagerInner>,
}

impl PlaylistManager {
    /// Gestionnaire avec les paramètres par défaut (clé `playlist`, file d'attente)
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(store, ManagerConfig::default())
    }

    pub fn with_config(store: Arc<dyn KeyValueStore>, config: ManagerConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_capacity.clamp(1, MAX_EVENT_CAPACITY));

        Self {
            inner: Arc::new(ManagerInner {
                adapter: StoreAdapter::new(store, config.storage_key),
                state: StdRwLock::new(PlaylistState::default()),
                in_flight: Mutex::new(()),
                policy: config.policy,
                event_tx,
            }),
        }
    }

    pub fn storage_key(&self) -> &str {
        self.inner.adapter.key()
    }

    pub fn policy(&self) -> ConcurrencyPolicy {
        self.inner.policy
    }

    /// État courant
    pub fn snapshot(&self) -> PlaylistSnapshot {
        self.read_state().snapshot()
    }

    /// Playlist courante
    pub fn playlist(&self) -> Vec<String> {
        self.read_state().playlist.clone()
    }

    pub fn validation_error(&self) -> ValidationError {
        self.read_state().validation_error
    }

    /// S'abonne aux changements d'état
    pub fn subscribe(&self) -> broadcast::Receiver<PlaylistEvent> {
        self.inner.event_tx.subscribe()
    }

    /// Charge la playlist depuis le stockage et remet à zéro la saisie et
    /// l'erreur de validation.
    ///
    /// En cas d'échec, l'état local reste celui d'avant l'appel.
    pub async fn initialize(&self) -> Result<PlaylistSnapshot> {
        let _slot = self.acquire_slot().await?;
        self.reload().await
    }

    /// Met à jour la saisie en cours, sans validation ni accès au stockage.
    pub fn set_pending_input(&self, text: impl Into<String>) -> PlaylistSnapshot {
        let snapshot = {
            let mut state = self.write_state();
            state.pending_input = text.into();
            state.snapshot()
        };
        self.notify(PlaylistEventKind::InputChanged, snapshot.clone());
        snapshot
    }

    /// Ajoute la saisie en cours en fin de playlist.
    ///
    /// Une saisie qui n'est pas une URL positionne l'erreur de validation et
    /// ne touche ni à la playlist ni au stockage. Sinon la playlist complétée
    /// est écrite, puis relue.
    ///
    /// La validation ne touche pas au stockage : elle a lieu avant de prendre
    /// le créneau d'intention, puis à nouveau une fois le créneau obtenu, la
    /// relecture d'une intention précédente ayant pu vider la saisie.
    pub async fn add(&self) -> Result<AddOutcome> {
        if self.validated_append().is_none() {
            return Ok(AddOutcome::Rejected);
        }

        let _slot = self.acquire_slot().await?;

        let Some(next) = self.validated_append() else {
            return Ok(AddOutcome::Rejected);
        };

        self.inner.adapter.save(&next).await?;
        self.reload().await?;
        Ok(AddOutcome::Added)
    }

    /// Retire l'élément `index`, écrit la playlist puis la relit.
    ///
    /// Un index hors bornes est une erreur de l'appelant : assertion en debug,
    /// [`Error::IndexOutOfRange`] sinon.
    pub async fn remove(&self, index: usize) -> Result<PlaylistSnapshot> {
        let _slot = self.acquire_slot().await?;

        let next = {
            let state = self.read_state();
            check_index(index, state.playlist.len())?;
            state.without(index)
        };

        self.inner.adapter.save(&next).await?;
        self.reload().await
    }

    /// Déplace l'élément `from` en position `to`.
    ///
    /// Le nouvel ordre est appliqué localement avant l'écriture et n'est pas
    /// relu : si l'écriture échoue, l'état local garde le nouvel ordre.
    pub async fn reorder(&self, from: usize, to: usize) -> Result<PlaylistSnapshot> {
        let _slot = self.acquire_slot().await?;

        let snapshot = {
            let mut state = self.write_state();
            let len = state.playlist.len();
            check_index(from, len)?;
            check_index(to, len)?;
            move_item(&mut state.playlist, from, to);
            state.snapshot()
        };
        self.notify(PlaylistEventKind::Reordered, snapshot.clone());

        self.inner.adapter.save(&snapshot.playlist).await?;
        debug!(from, to, "Reordered playlist");
        Ok(snapshot)
    }

    /// Applique une intention et retourne l'état qui en résulte.
    pub async fn dispatch(&self, intent: Intent) -> Result<PlaylistSnapshot> {
        match intent {
            Intent::InputChange(text) => Ok(self.set_pending_input(text)),
            Intent::Add => {
                self.add().await?;
                Ok(self.snapshot())
            }
            Intent::Remove(index) => self.remove(index).await,
            Intent::Reorder { from, to } => self.reorder(from, to).await,
        }
    }

    async fn reload(&self) -> Result<PlaylistSnapshot> {
        let playlist = self.inner.adapter.load().await?;

        let snapshot = {
            let mut state = self.write_state();
            state.reset(playlist);
            state.snapshot()
        };
        self.notify(PlaylistEventKind::Reloaded, snapshot.clone());
        Ok(snapshot)
    }

    /// Playlist complétée par la saisie si elle est une URL valide ; sinon
    /// positionne `invalid-url`, notifie et renvoie `None`.
    fn validated_append(&self) -> Option<Playlist> {
        let rejected = {
            let mut state = self.write_state();
            match validate_address(&state.pending_input) {
                Ok(_) => return Some(state.appended()),
                Err(err) => {
                    info!(input = %state.pending_input, "Rejected playlist address: {}", err);
                    state.validation_error = ValidationError::InvalidUrl;
                    state.snapshot()
                }
            }
        };

        self.notify(PlaylistEventKind::ValidationFailed, rejected);
        None
    }

    async fn acquire_slot(&self) -> Result<MutexGuard<'_, ()>> {
        match self.inner.policy {
            ConcurrencyPolicy::Queue => Ok(self.inner.in_flight.lock().await),
            ConcurrencyPolicy::Reject => self.inner.in_flight.try_lock().map_err(|_| {
                warn!("Playlist intent rejected, another one is in flight");
                Error::IntentInFlight
            }),
        }
    }

    fn notify(&self, kind: PlaylistEventKind, snapshot: PlaylistSnapshot) {
        let event = PlaylistEvent {
            kind,
            snapshot,
            timestamp: Utc::now(),
        };
        // Ignoré si aucun abonné
        let _ = self.inner.event_tx.send(event);
    }

    fn read_state(&self) -> RwLockReadGuard<'_, PlaylistState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, PlaylistState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for PlaylistManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaylistManager")
            .field("adapter", &self.inner.adapter)
            .field("policy", &self.inner.policy)
            .field("state", &*self.read_state())
            .finish()
    }
}

fn check_index(index: usize, len: usize) -> Result<()> {
    debug_assert!(index < len, "index {index} out of range for playlist of length {len}");
    if index >= len {
        return Err(Error::IndexOutOfRange { index, len });
    }
    Ok(())
}
