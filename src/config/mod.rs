use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod defaults;
pub mod manager;
pub mod validation;

pub use manager::{ConfigManager, LoadedConfig};

/// Process-wide settings, loaded once at startup and never mutated afterwards.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Worktree directory names and branch names that are never removed without `--force`.
    pub protected_names: Vec<String>,
    /// Upstream used when a branch has no tracking configuration, as `<remote>/<branch>`.
    pub default_upstream: String,
    /// Remote used for pull request fetches.
    pub default_remote: String,
    /// Directories that user-supplied paths may never point into.
    pub system_directories: Vec<PathBuf>,
    pub max_path_length: usize,
    pub fetch_timeout_secs: u64,
    /// Where `create` and `pr` put new worktrees. Absolute, or relative to the main
    /// repository root. Defaults to `<repo-parent>/<repo-name>-worktrees`.
    pub worktrees_dir: Option<String>,
    /// Branch globs that `clean-branches` never touches, merged with `--skip`.
    pub skip_patterns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        defaults::default_config()
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "JSON error: {}", e),
            ConfigError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::Io(error)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Json(error)
    }
}

impl From<ConfigError> for crate::utils::WtreeError {
    fn from(error: ConfigError) -> Self {
        crate::utils::WtreeError::config_error(error.to_string())
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    pub fn is_protected(&self, name: &str) -> bool {
        self.protected_names.iter().any(|protected| protected == name)
    }

    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_timeout_secs)
    }
}
