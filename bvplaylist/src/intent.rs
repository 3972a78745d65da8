//! Intentions émises par la couche de présentation

use serde::{Deserialize, Serialize};

/// Action utilisateur transmise au [`crate::PlaylistManager`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Intent {
    /// Le texte du champ d'ajout a changé
    InputChange(String),
    /// Valider la saisie et l'ajouter en fin de playlist
    Add,
    /// Retirer l'élément à cet index
    Remove(usize),
    /// Déplacer un élément (glisser-déposer)
    Reorder { from: usize, to: usize },
}

/// Issue d'un ajout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Adresse enregistrée, playlist relue depuis le stockage
    Added,
    /// Saisie refusée : ce n'est pas une URL
    Rejected,
}
