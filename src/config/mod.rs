//! Configuration management for the steward coordinator

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use crate::commands::DEFAULT_TIMEOUT;
use crate::{Error, Result};

use file::StewardConfigFile;

/// Steward configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Device registry configuration
    pub registry: RegistryConfig,

    /// Command dispatch configuration
    pub commands: CommandsConfig,
}

/// Device registry configuration
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Path to the device snapshot (`STEWARD_DB_PATH`)
    pub path: PathBuf,
}

/// Command dispatch configuration
#[derive(Debug, Clone)]
pub struct CommandsConfig {
    /// How long to wait for a device acknowledgement (`STEWARD_COMMAND_TIMEOUT`, seconds)
    pub timeout: Duration,
}

impl Config {
    /// Load configuration (env > toml > default)
    ///
    /// # Errors
    ///
    /// Returns error if an environment override is malformed
    pub fn load() -> Result<Self> {
        Self::from_sources(file::load_config_file(), |key| std::env::var(key).ok())
    }

    /// Build configuration from a parsed config file and an environment lookup
    ///
    /// # Errors
    ///
    /// Returns error if the timeout is malformed or zero
    pub fn from_sources(
        fc: StewardConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let path = env("STEWARD_DB_PATH")
            .or(fc.registry.path)
            .map_or_else(default_db_path, PathBuf::from);

        let timeout_secs = match env("STEWARD_COMMAND_TIMEOUT") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                Error::Config(format!("STEWARD_COMMAND_TIMEOUT must be whole seconds: {e}"))
            })?),
            None => fc.commands.timeout_secs,
        };
        let timeout = timeout_secs.map_or(DEFAULT_TIMEOUT, Duration::from_secs);
        if timeout.is_zero() {
            return Err(Error::Config("command timeout must be greater than zero".to_string()));
        }

        Ok(Self {
            registry: RegistryConfig { path },
            commands: CommandsConfig { timeout },
        })
    }
}

/// Default device snapshot location
///
/// Returns `~/.local/share/steward/devices.json`
#[must_use]
pub fn default_db_path() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".local/share/steward/devices.json"),
        |d| d.data_dir().join("steward").join("devices.json"),
    )
}
