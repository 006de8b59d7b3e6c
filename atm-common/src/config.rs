//! Configuration loading and root folder resolution
//!
//! Bootstrap settings come from a small TOML file. Everything has a built-in
//! default, so a missing file is never fatal.
//!
//! Root folder priority:
//! 1. Command-line argument (highest priority)
//! 2. `ATM_ROOT_FOLDER` environment variable
//! 3. TOML config file `root_folder`
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "ATM_ROOT_FOLDER";

/// Environment variable pointing at the TOML config file
pub const CONFIG_FILE_ENV: &str = "ATM_CONFIG";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "atm.db";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Root folder holding the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Explicit database path, overrides `<root_folder>/atm.db`
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Lifetime of a login session in hours
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive string
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            root_folder: None,
            database_path: None,
            session_ttl_hours: default_session_ttl_hours(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_port() -> u16 {
    8000
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_session_ttl_hours() -> i64 {
    24 * 14
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration, falling back to defaults when the file is missing or broken
    ///
    /// `explicit` is the path given on the command line; otherwise `ATM_CONFIG`
    /// and then the platform config directory are consulted.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };

        let Some(path) = path else {
            info!("No config file found, using built-in defaults");
            return Self::default();
        };

        if !path.exists() {
            warn!("Config file {} not found, using built-in defaults", path.display());
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to load {}: {}; using built-in defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Database path: explicit setting, else `<root_folder>/atm.db`
    pub fn database_path(&self, root_folder: &Path) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| root_folder.join(DATABASE_FILE_NAME))
    }
}

/// Locate the TOML config file via `ATM_CONFIG` or the platform config directory
fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir()
        .map(|d| d.join("atm").join("config.toml"))
        .filter(|p| p.exists())
}

/// Resolve the root folder following the priority order in the module docs
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("atm"))
        .unwrap_or_else(|| PathBuf::from("./atm_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.session_ttl_hours, 336);
        assert_eq!(config.logging.level, "info");
        assert!(config.root_folder.is_none());
    }

    #[test]
    fn test_database_path_defaults_to_root_folder() {
        let config = TomlConfig::default();
        let path = config.database_path(Path::new("/srv/atm"));
        assert_eq!(path, PathBuf::from("/srv/atm/atm.db"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("port = \"not a number\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
