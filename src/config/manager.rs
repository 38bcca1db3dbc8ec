use super::defaults::{config_search_paths, default_config, CONFIG_ENV_VAR};
use super::{Config, ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Effective configuration plus the file it was read from, if any.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: Option<PathBuf>,
}

pub struct ConfigManager;

impl ConfigManager {
    /// Search order: `$WTREE_CONFIG_PATH`, user config dir, home dotfile, cwd dotfile.
    /// Finding nothing is not an error.
    pub fn load() -> Result<LoadedConfig> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(explicit);
            if !path.exists() {
                return Err(ConfigError::Validation(format!(
                    "{} points to a missing file: {}",
                    CONFIG_ENV_VAR,
                    path.display()
                )));
            }
            return Self::load_from_search_paths(&[path]);
        }

        Self::load_from_search_paths(&config_search_paths())
    }

    pub fn load_from_search_paths(paths: &[PathBuf]) -> Result<LoadedConfig> {
        for path in paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                let config = Self::load_from_file(path)?;
                return Ok(LoadedConfig {
                    config,
                    source: Some(path.clone()),
                });
            }
        }

        tracing::debug!("no configuration file found, using built-in defaults");
        Ok(LoadedConfig {
            config: default_config(),
            source: None,
        })
    }

    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn search_paths() -> Vec<PathBuf> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(explicit) => vec![PathBuf::from(explicit)],
            Err(_) => config_search_paths(),
        }
    }
}
