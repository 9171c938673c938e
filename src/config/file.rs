//! TOML configuration file loading
//!
//! Supports `~/.config/steward/config.toml` as a persistent config source.
//! All fields are optional; the file overlays the defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct StewardConfigFile {
    /// Device registry configuration
    #[serde(default)]
    pub registry: RegistryFileConfig,

    /// Command dispatch configuration
    #[serde(default)]
    pub commands: CommandsFileConfig,
}

/// Device registry configuration
#[derive(Debug, Default, Deserialize)]
pub struct RegistryFileConfig {
    /// Path to the device snapshot
    pub path: Option<String>,
}

/// Command dispatch configuration
#[derive(Debug, Default, Deserialize)]
pub struct CommandsFileConfig {
    /// Seconds to wait for a device to acknowledge a command
    pub timeout_secs: Option<u64>,
}

/// Load the TOML config file from the standard path
///
/// Returns `StewardConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> StewardConfigFile {
    config_file_path().map_or_else(StewardConfigFile::default, |path| load_config_file_from(&path))
}

/// Load the TOML config file at `path`, falling back to defaults
pub fn load_config_file_from(path: &Path) -> StewardConfigFile {
    if !path.exists() {
        return StewardConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                StewardConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            StewardConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/steward/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("steward").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_file() {
        let fc: StewardConfigFile = toml::from_str("[commands]\ntimeout_secs = 5\n").unwrap();
        assert_eq!(fc.commands.timeout_secs, Some(5));
        assert!(fc.registry.path.is_none());
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let fc = load_config_file_from(&dir.path().join("config.toml"));
        assert!(fc.registry.path.is_none());
        assert!(fc.commands.timeout_secs.is_none());
    }

    #[test]
    fn unparsable_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[registry\npath = ").unwrap();

        let fc = load_config_file_from(&path);
        assert!(fc.registry.path.is_none());
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[registry]\npath = \"/var/lib/steward/devices.json\"\n").unwrap();

        let fc = load_config_file_from(&path);
        assert_eq!(fc.registry.path.as_deref(), Some("/var/lib/steward/devices.json"));
    }
}
