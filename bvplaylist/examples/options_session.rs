//! Exemple simulant une session sur la page d'options
//!
//! Cet exemple démontre :
//! - La construction du gestionnaire depuis la configuration bvconfig
//! - Les intentions de la couche de présentation (saisie, ajout, tri, suppression)
//! - Le suivi des changements d'état via `subscribe`
//!
//! Pour exécuter :
//! ```bash
//! cargo run -p bvplaylist --example options_session
//! ```

use bvconfig::get_config;
use bvplaylist::{Intent, PlaylistManager};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = get_config();

    let level = config.get_log_min_level()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_lowercase())),
        )
        .init();

    let manager = PlaylistManager::from_config(&config)?;

    // Afficher chaque nouvel état, comme le ferait la page d'options
    let mut events = manager.subscribe();
    let monitor = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match serde_json::to_string(&event.snapshot) {
                Ok(json) => println!("🔄 [{:?}] {}", event.kind, json),
                Err(e) => eprintln!("⚠️ Failed to serialize snapshot: {}", e),
            }
        }
    });

    let snapshot = manager.initialize().await?;
    info!(len = snapshot.playlist.len(), "Playlist loaded");

    let session = vec![
        Intent::InputChange("https://www.svtplay.se/barnkanalen".into()),
        Intent::Add,
        Intent::InputChange("inte en adress".into()),
        Intent::Add,
        Intent::InputChange("https://www.ur.se/".into()),
        Intent::Add,
        Intent::Reorder { from: 0, to: 1 },
    ];

    for intent in session {
        manager.dispatch(intent).await?;
    }

    let snapshot = manager.snapshot();
    println!("\n📋 Playlist ({} adresses):", snapshot.playlist.len());
    for (index, address) in snapshot.playlist.iter().enumerate() {
        println!("  {}. {}", index + 1, address);
    }

    drop(manager);
    monitor.await?;
    Ok(())
}
