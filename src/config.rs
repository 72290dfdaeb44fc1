//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::app::BackendKind;
use crate::auth::IdentityConfig;
use crate::particles::FieldConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub renderer: FieldConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Key-value store location
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("marketplace").to_string_lossy().to_string())
        .unwrap_or_else(|| "./marketplace_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Auth backend selection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default)]
    pub identity: IdentityConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let loaded = Self::env_only();
        loaded.log_notes();
        loaded.config
    }

    fn env_only() -> LoadedConfig {
        let mut config = Config::default();
        let notes = config.apply_env_overrides();
        LoadedConfig { config, notes }
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let loaded = Self::read_with_env(path)?;
        loaded.log_notes();
        Ok(loaded.config)
    }

    /// Like `load_with_env`, but hands the load notes back instead of logging
    pub fn read_with_env(path: &Path) -> Result<LoadedConfig, ConfigError> {
        let mut config = Self::load(path)?;
        let notes = config.apply_env_overrides();
        Ok(LoadedConfig { config, notes })
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let loaded = Self::discover_default();
        loaded.log_notes();
        loaded.config
    }

    /// Search the default locations without logging
    ///
    /// For callers that install their log subscriber from the result.
    pub fn discover_default() -> LoadedConfig {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("marketplace").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        let mut notes = Vec::new();
        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::read_with_env(path) {
                    Ok(loaded) => {
                        notes.push(LoadNote::Loaded(path.clone()));
                        return loaded.after(notes);
                    }
                    Err(e) => notes.push(LoadNote::Failed {
                        path: path.clone(),
                        error: e.to_string(),
                    }),
                }
            }
        }

        notes.push(LoadNote::Defaults);
        Self::env_only().after(notes)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) -> Vec<LoadNote> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Vec<LoadNote> {
        let mut notes = Vec::new();

        if let Some(data_dir) = var("MARKETPLACE_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        if let Some(backend) = var("MARKETPLACE_AUTH_BACKEND") {
            match backend.parse() {
                Ok(kind) => self.auth.backend = kind,
                Err(error) => notes.push(LoadNote::IgnoredOverride {
                    name: "MARKETPLACE_AUTH_BACKEND",
                    error,
                }),
            }
        }
        if let Some(api_key) = var("MARKETPLACE_API_KEY") {
            self.auth.identity.api_key = api_key;
        }
        if let Some(project_id) = var("MARKETPLACE_PROJECT_ID") {
            self.auth.identity.project_id = project_id;
        }
        if let Some(app_id) = var("MARKETPLACE_APP_ID") {
            self.auth.identity.app_id = app_id;
        }

        if let Some(level) = var("MARKETPLACE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("MARKETPLACE_LOG_FORMAT") {
            self.logging.format = format;
        }

        notes
    }
}

/// A config plus what happened while assembling it
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub notes: Vec<LoadNote>,
}

impl LoadedConfig {
    /// Prepend notes from earlier search steps
    fn after(mut self, mut earlier: Vec<LoadNote>) -> Self {
        earlier.append(&mut self.notes);
        self.notes = earlier;
        self
    }

    /// Emit every note through `tracing`
    pub fn log_notes(&self) {
        for note in &self.notes {
            note.log();
        }
    }
}

/// Something worth reporting about where settings came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadNote {
    Loaded(PathBuf),
    Failed { path: PathBuf, error: String },
    Defaults,
    IgnoredOverride { name: &'static str, error: String },
}

impl LoadNote {
    pub fn log(&self) {
        match self {
            LoadNote::Loaded(_) | LoadNote::Defaults => tracing::info!("{}", self),
            LoadNote::Failed { .. } | LoadNote::IgnoredOverride { .. } => {
                tracing::warn!("{}", self)
            }
        }
    }
}

impl std::fmt::Display for LoadNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadNote::Loaded(path) => write!(f, "Loaded config from {:?}", path),
            LoadNote::Failed { path, error } => {
                write!(f, "Failed to load config from {:?}: {}", path, error)
            }
            LoadNote::Defaults => f.write_str("Using default config with environment overrides"),
            LoadNote::IgnoredOverride { name, error } => write!(f, "Ignoring {}: {}", name, error),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Marketplace Configuration
#
# Environment variables override these settings:
# - MARKETPLACE_DATA_DIR
# - MARKETPLACE_AUTH_BACKEND
# - MARKETPLACE_API_KEY
# - MARKETPLACE_PROJECT_ID
# - MARKETPLACE_APP_ID
# - MARKETPLACE_LOG_LEVEL
# - MARKETPLACE_LOG_FORMAT

[storage]
# Directory holding local_storage.json
data_dir = "./marketplace_data"

[auth]
# local, identity, or auto (identity when an API key is set)
backend = "auto"

[auth.identity]
# Hosted identity provider credentials
api_key = ""
project_id = ""

# Scopes profile documents: artifacts/{app_id}/users/{uid}/profile/{uid}
app_id = "default-app-id"

auth_base_url = "https://identitytoolkit.googleapis.com"
document_base_url = "https://firestore.googleapis.com"

[renderer]
# Number of particles
count = 200

# Distance lost per frame and respawn distance
decrement = 0.05
respawn_threshold = 5.0

# Spawn range: min_spawn_distance .. + shorter side * spawn_span_ratio
min_spawn_distance = 20.0
spawn_span_ratio = 0.5

# Angular speed (radians per frame)
min_speed = 0.002
max_speed = 0.007

max_radius = 2.0
min_opacity = 0.1
max_opacity = 0.6
horizontal_stretch = 0.8

# Central gradient disk
disk_radius = 80.0

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();

        assert_eq!(config.storage.data_dir, "./marketplace_data");
        assert_eq!(config.auth.backend, BackendKind::Auto);
        assert_eq!(config.auth.identity.app_id, "default-app-id");
        assert_eq!(config.renderer, FieldConfig::default());
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[auth]\nbackend = \"local\"\n\n[renderer]\ncount = 50\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.auth.backend, BackendKind::Local);
        assert_eq!(config.renderer.count, 50);
        assert_eq!(config.renderer.disk_radius, 80.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[auth\nbackend = ").unwrap();
        assert!(matches!(Config::load(&broken), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MARKETPLACE_AUTH_BACKEND", "identity"),
            ("MARKETPLACE_API_KEY", "abc"),
            ("MARKETPLACE_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.auth.backend, BackendKind::Identity);
        assert!(config.auth.identity.is_configured());
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_bad_backend_override_ignored() {
        let mut config = Config::default();
        let notes = config.apply_overrides(|name| {
            (name == "MARKETPLACE_AUTH_BACKEND").then(|| "ldap".to_string())
        });
        assert_eq!(config.auth.backend, BackendKind::Auto);
        assert_eq!(notes.len(), 1);
        assert_eq!(
            notes[0].to_string(),
            "Ignoring MARKETPLACE_AUTH_BACKEND: Unknown auth backend: ldap"
        );
    }

    #[test]
    fn test_search_notes_keep_order() {
        let loaded = LoadedConfig {
            config: Config::default(),
            notes: vec![LoadNote::IgnoredOverride {
                name: "MARKETPLACE_AUTH_BACKEND",
                error: "bad".to_string(),
            }],
        }
        .after(vec![LoadNote::Loaded(PathBuf::from("config.toml"))]);

        assert_eq!(loaded.notes.len(), 2);
        assert_eq!(loaded.notes[0], LoadNote::Loaded(PathBuf::from("config.toml")));
        assert!(matches!(loaded.notes[1], LoadNote::IgnoredOverride { .. }));
    }
}
