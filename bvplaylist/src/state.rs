//! État local du gestionnaire et transitions pures

use serde::{Deserialize, Serialize};
use url::Url;

/// Playlist : suite ordonnée d'adresses, dans l'ordre de lecture
pub type Playlist = Vec<String>;

/// Erreur de validation affichée sous le formulaire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationError {
    #[default]
    None,
    InvalidUrl,
}

impl ValidationError {
    pub fn is_none(&self) -> bool {
        matches!(self, ValidationError::None)
    }
}

/// Vue en lecture seule de l'état, transmise à la couche de présentation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSnapshot {
    pub playlist: Playlist,
    pub pending_input: String,
    pub validation_error: ValidationError,
}

/// Vérifie qu'une saisie est une URL syntaxiquement valide (tout schéma).
pub fn validate_address(input: &str) -> Result<Url, url::ParseError> {
    Url::parse(input)
}

/// État interne du gestionnaire
#[derive(Debug, Clone, Default)]
pub(crate) struct PlaylistState {
    pub playlist: Playlist,
    pub pending_input: String,
    pub validation_error: ValidationError,
}

impl PlaylistState {
    /// Remplace la playlist par une valeur relue du stockage
    pub fn reset(&mut self, playlist: Playlist) {
        self.playlist = playlist;
        self.pending_input.clear();
        self.validation_error = ValidationError::None;
    }

    /// Playlist suivie de la saisie en cours
    pub fn appended(&self) -> Playlist {
        let mut next = Vec::with_capacity(self.playlist.len() + 1);
        next.extend(self.playlist.iter().cloned());
        next.push(self.pending_input.clone());
        next
    }

    /// Playlist sans l'élément `index`
    pub fn without(&self, index: usize) -> Playlist {
        let mut next = self.playlist.clone();
        next.remove(index);
        next
    }

    pub fn snapshot(&self) -> PlaylistSnapshot {
        PlaylistSnapshot {
            playlist: self.playlist.clone(),
            pending_input: self.pending_input.clone(),
            validation_error: self.validation_error,
        }
    }
}

/// Déplace l'élément `from` vers la position `to` ; les éléments
/// intermédiaires glissent d'une case. Les deux indices doivent être valides.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(s: &str) -> Vec<String> {
        s.chars().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_move_forward() {
        let mut items = letters("abc");
        move_item(&mut items, 0, 2);
        assert_eq!(items, letters("bca"));
    }

    #[test]
    fn test_move_backward() {
        let mut items = letters("abcde");
        move_item(&mut items, 3, 1);
        assert_eq!(items, letters("adbce"));
    }

    #[test]
    fn test_move_same_index() {
        let mut items = letters("abc");
        move_item(&mut items, 1, 1);
        assert_eq!(items, letters("abc"));
    }

    #[test]
    fn test_move_all_pairs() {
        let original = letters("abcdef");
        for from in 0..original.len() {
            for to in 0..original.len() {
                let mut items = original.clone();
                move_item(&mut items, from, to);

                assert_eq!(items.len(), original.len());
                assert_eq!(items[to], original[from]);

                // Les autres éléments gardent leur ordre relatif
                let mut rest = original.clone();
                rest.remove(from);
                let mut moved_rest = items.clone();
                moved_rest.remove(to);
                assert_eq!(moved_rest, rest, "from={from} to={to}");
            }
        }
    }

    #[test]
    fn test_without_keeps_order() {
        let state = PlaylistState {
            playlist: letters("abc"),
            ..Default::default()
        };
        assert_eq!(state.without(1), letters("ac"));
        assert_eq!(state.without(0), letters("bc"));
        assert_eq!(state.without(2), letters("ab"));
    }

    #[test]
    fn test_appended() {
        let state = PlaylistState {
            playlist: letters("ab"),
            pending_input: "c".into(),
            ..Default::default()
        };
        assert_eq!(state.appended(), letters("abc"));
        assert_eq!(state.playlist, letters("ab"));
    }

    #[test]
    fn test_reset_clears_transient_state() {
        let mut state = PlaylistState {
            playlist: letters("a"),
            pending_input: "draft".into(),
            validation_error: ValidationError::InvalidUrl,
        };
        state.reset(letters("xy"));
        assert_eq!(state.playlist, letters("xy"));
        assert!(state.pending_input.is_empty());
        assert!(state.validation_error.is_none());
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("https://example.com/a").is_ok());
        assert!(validate_address("http://localhost:8080").is_ok());
        assert!(validate_address("mailto:someone@example.com").is_ok());
        assert!(validate_address("file:///tmp/video.mp4").is_ok());

        assert!(validate_address("").is_err());
        assert!(validate_address("not a url").is_err());
        assert!(validate_address("example.com").is_err());
        assert!(validate_address("/relative/path").is_err());
    }

    #[test]
    fn test_validation_error_serialization() {
        let snapshot = PlaylistSnapshot {
            playlist: vec!["https://example.com/".into()],
            pending_input: "x".into(),
            validation_error: ValidationError::InvalidUrl,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["validation_error"], "invalid-url");
        assert_eq!(json["pending_input"], "x");

        let json = serde_json::to_value(PlaylistSnapshot::default()).unwrap();
        assert_eq!(json["validation_error"], "none");
    }
}
