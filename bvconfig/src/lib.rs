//! # Barnvakt Configuration Module
//!
//! This module provides configuration management for Barnvakt, including:
//! - Loading configuration from YAML files
//! - Merging with embedded default configuration
//! - Environment variable overrides
//! - Type-safe getters and setters for configuration values
//! - Thread-safe singleton access pattern
//!
//! ## Usage
//!
//! ```no_run
//! use bvconfig::get_config;
//!
//! let config = get_config();
//!
//! let key = config.get_storage_key()?;
//! let storage_dir = config.get_storage_dir()?;
//!
//! config.set_event_capacity(128)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Number, Value};
use std::{
    env, fs,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::info;

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("barnvakt.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load Barnvakt configuration"));
}

const ENV_CONFIG_DIR: &str = "BARNVAKT_CONFIG";
const ENV_PREFIX: &str = "BARNVAKT_CONFIG__";
const CONFIG_DIR_NAME: &str = ".barnvakt";

// Default values for configuration
pub const DEFAULT_STORAGE_KEY: &str = "playlist";
pub const DEFAULT_STORAGE_BACKEND: &str = "sqlite";
pub const DEFAULT_STORAGE_DIR: &str = "storage";
pub const DEFAULT_CONCURRENCY: &str = "queue";
pub const DEFAULT_EVENT_CAPACITY: usize = 64;
pub const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";

/// Macro to generate getter/setter for usize values with default
macro_rules! impl_usize_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<usize> {
            match self.get_value($path) {
                Ok(Value::Number(n)) => Ok(n.as_u64().map(|v| v as usize).unwrap_or($default)),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, size: usize) -> Result<()> {
            let n = Number::from(size);
            self.set_value($path, Value::Number(n))
        }
    };
}

/// Macro to generate getter/setter for string values with default
macro_rules! impl_string_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<String> {
            match self.get_value($path) {
                Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
                _ => Ok($default.to_string()),
            }
        }

        pub fn $setter(&self, value: String) -> Result<()> {
            self.set_value($path, Value::String(value))
        }
    };
}

/// Configuration manager for Barnvakt
///
/// This structure manages the application configuration, including:
/// - Loading configuration from YAML files
/// - Merging with default configuration
/// - Handling environment variable overrides
/// - Providing typed getters/setters for configuration values
///
/// # Examples
///
/// ```no_run
/// use bvconfig::get_config;
///
/// let config = get_config();
/// let key = config.get_storage_key()?;
/// println!("Playlist stored under key: {}", key);
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
}

impl Config {
    fn data(&self) -> MutexGuard<'_, Value> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Finds a config directory by trying different locations in order
    fn find_config_dir(directory: &str) -> String {
        // 1. Try provided directory
        if !directory.is_empty() {
            return directory.to_string();
        }

        // 2. Try environment variable
        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var=ENV_CONFIG_DIR, path=%env_path, "Trying to load config from env");
            return env_path;
        }

        // 3. Try current directory
        if Path::new(CONFIG_DIR_NAME).exists() {
            return CONFIG_DIR_NAME.to_string();
        }

        // 4. Try home directory
        if let Some(home) = home_dir() {
            let home_config = home.join(CONFIG_DIR_NAME);
            if home_config.exists() {
                return home_config.to_string_lossy().to_string();
            }
        }

        CONFIG_DIR_NAME.to_string()
    }

    /// Validates and prepares a config directory
    fn validate_config_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        if !path.is_dir() {
            return Err(anyhow!("{} is not a directory", path.display()));
        }

        // Test d'écriture puis de lecture
        let test_file = path.join(".write_test");
        fs::write(&test_file, b"test")?;
        fs::remove_file(&test_file)?;
        fs::read_dir(path)?;

        Ok(())
    }

    /// Determines and validates the configuration directory
    ///
    /// The directory is searched in the following order:
    /// 1. The provided `directory` parameter if not empty
    /// 2. The `BARNVAKT_CONFIG` environment variable
    /// 3. `.barnvakt` in the current directory
    /// 4. `.barnvakt` in the user's home directory
    ///
    /// The directory is created if it doesn't exist, and validated for read/write permissions.
    pub fn config_dir(directory: &str) -> Result<String> {
        let dir_path = Self::find_config_dir(directory);
        Self::validate_config_dir(Path::new(&dir_path))?;
        Ok(dir_path)
    }

    /// Loads the configuration from the specified directory
    ///
    /// This method:
    /// 1. Determines the configuration directory
    /// 2. Loads the default embedded configuration
    /// 3. Merges it with the external config.yaml file if present
    /// 4. Applies environment variable overrides
    /// 5. Saves the merged configuration
    ///
    /// # Arguments
    ///
    /// * `directory` - The directory containing the config.yaml file, or empty to use defaults
    pub fn load_config(directory: &str) -> Result<Self> {
        Self::load_config_with_overrides(directory, env::vars())
    }

    /// Same as [`Config::load_config`], with the override variables supplied
    /// by the caller instead of read from the process environment.
    pub fn load_config_with_overrides<I>(directory: &str, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config_dir = Self::config_dir(directory)?;
        info!(config_dir=%config_dir, "Using config directory");

        let config_file_path = Path::new(&config_dir).join("config.yaml");
        let path = config_file_path.to_string_lossy().to_string();

        let default_value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        let yaml_data = if let Ok(data) = fs::read(&path) {
            info!(config_file=%path, "Loaded config file");
            data
        } else {
            info!(config_file=%path, "Config file not found, using default embedded config");
            DEFAULT_CONFIG.as_bytes().to_vec()
        };

        // Un fichier vide se lit comme Null : on garde alors les défauts
        let external_value: Value = serde_yaml::from_slice(&yaml_data)?;
        let mut config_value = Self::lower_keys_value(default_value);
        merge_yaml(&mut config_value, &Self::lower_keys_value(external_value));

        Self::apply_env_overrides(&mut config_value, vars);

        let config = Config {
            config_dir,
            path,
            data: Mutex::new(config_value),
        };

        config.save()?;
        Ok(config)
    }

    /// Saves the current configuration to the config.yaml file
    pub fn save(&self) -> Result<()> {
        let yaml = serde_yaml::to_string(&*self.data())?;
        fs::write(&self.path, yaml)?;
        Ok(())
    }

    /// Sets a configuration value at the specified path and saves it
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["storage", "key"]`)
    /// * `value` - The YAML value to set
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        {
            let mut data = self.data();
            Self::set_value_internal(&mut data, path, value)?;
        }
        self.save()
    }

    fn set_value_internal<S: AsRef<str>>(data: &mut Value, path: &[S], value: Value) -> Result<()> {
        if path.is_empty() {
            *data = value;
            return Ok(());
        }
        if let Value::Mapping(map) = data {
            let key_value = Value::String(path[0].as_ref().to_lowercase());
            if path.len() == 1 {
                map.insert(key_value, value);
            } else {
                let entry = map
                    .entry(key_value)
                    .or_insert(Value::Mapping(Mapping::new()));
                Self::set_value_internal(entry, &path[1..], value)?;
            }
            Ok(())
        } else {
            Err(anyhow!("Current node is not a map"))
        }
    }

    /// Gets a configuration value at the specified path
    ///
    /// Returns an error if the path doesn't exist.
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.data();
        Self::get_value_internal(&data, path)
    }

    fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
        let mut current = data;
        for (i, key) in path.iter().enumerate() {
            if let Value::Mapping(map) = current {
                if let Some(next) = map.get(&Value::String(key.to_lowercase())) {
                    current = next;
                } else {
                    return Err(anyhow!("Path {} does not exist", path[..=i].join(".")));
                }
            } else {
                return Err(anyhow!("Path {} is not a Config", path[..i].join(".")));
            }
        }
        Ok(current.clone())
    }

    fn apply_env_overrides<I>(config: &mut Value, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                let key_path = stripped.split("__").collect::<Vec<_>>();
                let yaml_value = Self::convert_env_value(&value);
                if let Err(err) = Self::set_value_internal(config, &key_path[..], yaml_value) {
                    tracing::warn!(variable=%key, "Ignoring configuration override: {}", err);
                }
            }
        }
    }

    fn convert_env_value(value: &str) -> Value {
        if let Ok(parsed) = serde_yaml::from_str::<Value>(value) {
            return parsed;
        }
        Value::String(value.to_string())
    }

    fn lower_keys_value(value: Value) -> Value {
        match value {
            Value::Mapping(map) => {
                let mut new_map = Mapping::new();
                for (k, v) in map {
                    let new_key = match k {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    new_map.insert(new_key, Self::lower_keys_value(v));
                }
                Value::Mapping(new_map)
            }
            Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Self::lower_keys_value).collect())
            }
            _ => value,
        }
    }

    /// Résout un chemin relatif ou absolu et crée le répertoire si nécessaire
    fn resolve_and_create_dir(&self, dir_path: &str) -> Result<String> {
        let path = Path::new(dir_path);

        let absolute_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            // Chemin relatif : résolu par rapport à config_dir
            Path::new(&self.config_dir).join(path)
        };

        if !absolute_path.exists() {
            fs::create_dir_all(&absolute_path)?;
            info!(directory=%absolute_path.display(), "Created managed directory");
        }

        Ok(absolute_path.to_string_lossy().to_string())
    }

    /// Récupère un répertoire géré par la configuration
    ///
    /// Le répertoire peut être absolu ou relatif au répertoire de
    /// configuration. Il est créé s'il n'existe pas.
    ///
    /// # Arguments
    ///
    /// * `path` - Chemin dans l'arbre de configuration (ex: `&["storage", "directory"]`)
    /// * `default` - Nom de répertoire par défaut si non configuré
    pub fn get_managed_dir(&self, path: &[&str], default: &str) -> Result<String> {
        let dir_path = match self.get_value(path) {
            Ok(Value::String(s)) => s,
            _ => {
                self.set_managed_dir(path, default.to_string())?;
                default.to_string()
            }
        };
        self.resolve_and_create_dir(&dir_path)
    }

    /// Définit un répertoire géré par la configuration
    pub fn set_managed_dir(&self, path: &[&str], directory: String) -> Result<()> {
        self.set_value(path, Value::String(directory))
    }

    /// Répertoire du stockage durable de la playlist
    pub fn get_storage_dir(&self) -> Result<String> {
        self.get_managed_dir(&["storage", "directory"], DEFAULT_STORAGE_DIR)
    }

    impl_string_config!(
        get_storage_key,
        set_storage_key,
        &["storage", "key"],
        DEFAULT_STORAGE_KEY
    );

    impl_string_config!(
        get_storage_backend,
        set_storage_backend,
        &["storage", "backend"],
        DEFAULT_STORAGE_BACKEND
    );

    impl_string_config!(
        get_concurrency,
        set_concurrency,
        &["playlist", "concurrency"],
        DEFAULT_CONCURRENCY
    );

    impl_usize_config!(
        get_event_capacity,
        set_event_capacity,
        &["playlist", "event_capacity"],
        DEFAULT_EVENT_CAPACITY
    );

    impl_string_config!(
        get_log_min_level,
        set_log_min_level,
        &["host", "logger", "min_level"],
        DEFAULT_LOG_MIN_LEVEL
    );
}

/// Returns the global configuration instance
///
/// The instance is lazily loaded on first access.
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

/// Merges external YAML configuration into default configuration
///
/// - For mappings, keys from external are merged into default
/// - For scalars and sequences, external values replace default values
/// - A null external document leaves the defaults untouched
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (_, Value::Null) => {}
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            Config::load_config_with_overrides(dir.path().to_str().unwrap(), no_env()).unwrap();

        assert_eq!(config.get_storage_key().unwrap(), "playlist");
        assert_eq!(config.get_storage_backend().unwrap(), "sqlite");
        assert_eq!(config.get_concurrency().unwrap(), "queue");
        assert_eq!(config.get_event_capacity().unwrap(), 64);
        assert_eq!(config.get_log_min_level().unwrap(), "INFO");

        // La configuration fusionnée est réécrite sur disque
        assert!(dir.path().join("config.yaml").exists());
    }

    #[test]
    fn test_config_file_is_merged_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "storage:\n  backend: memory\nPlaylist:\n  Event_Capacity: 8\n",
        )
        .unwrap();

        let config =
            Config::load_config_with_overrides(dir.path().to_str().unwrap(), no_env()).unwrap();

        assert_eq!(config.get_storage_backend().unwrap(), "memory");
        assert_eq!(config.get_event_capacity().unwrap(), 8);
        // Les clés non redéfinies gardent leur valeur par défaut
        assert_eq!(config.get_storage_key().unwrap(), "playlist");
        assert_eq!(config.get_concurrency().unwrap(), "queue");
    }

    #[test]
    fn test_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let vars = vec![
            ("BARNVAKT_CONFIG__PLAYLIST__CONCURRENCY".to_string(), "reject".to_string()),
            ("BARNVAKT_CONFIG__PLAYLIST__EVENT_CAPACITY".to_string(), "16".to_string()),
            ("UNRELATED".to_string(), "x".to_string()),
        ];

        let config =
            Config::load_config_with_overrides(dir.path().to_str().unwrap(), vars).unwrap();

        assert_eq!(config.get_concurrency().unwrap(), "reject");
        assert_eq!(config.get_event_capacity().unwrap(), 16);
    }

    #[test]
    fn test_set_value_persists() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();
        let config = Config::load_config_with_overrides(dir_str, no_env()).unwrap();

        config.set_storage_key("urls".to_string()).unwrap();
        assert_eq!(config.get_storage_key().unwrap(), "urls");

        let reloaded = Config::load_config_with_overrides(dir_str, no_env()).unwrap();
        assert_eq!(reloaded.get_storage_key().unwrap(), "urls");
    }

    #[test]
    fn test_get_value_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            Config::load_config_with_overrides(dir.path().to_str().unwrap(), no_env()).unwrap();

        let err = config.get_value(&["storage", "nope"]).unwrap_err();
        assert!(err.to_string().contains("storage.nope"));
    }

    #[test]
    fn test_managed_dir_is_created_relative_to_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            Config::load_config_with_overrides(dir.path().to_str().unwrap(), no_env()).unwrap();

        let storage = config.get_storage_dir().unwrap();
        assert_eq!(Path::new(&storage), dir.path().join("storage"));
        assert!(Path::new(&storage).is_dir());
    }

    #[test]
    fn test_blank_string_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            Config::load_config_with_overrides(dir.path().to_str().unwrap(), no_env()).unwrap();

        config.set_storage_key("   ".to_string()).unwrap();
        assert_eq!(config.get_storage_key().unwrap(), DEFAULT_STORAGE_KEY);
    }
}
