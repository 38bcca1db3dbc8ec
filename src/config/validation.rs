use super::{Config, ConfigError, Result};
use std::path::{Component, Path};

pub fn validate_config(config: &Config) -> Result<()> {
    validate_upstream(&config.default_upstream)?;
    validate_remote(&config.default_remote)?;
    validate_limits(config)?;

    if let Some(ref dir) = config.worktrees_dir {
        validate_worktrees_dir(dir)?;
    }

    for pattern in &config.skip_patterns {
        globset::Glob::new(pattern).map_err(|e| {
            ConfigError::Validation(format!("Invalid skip pattern '{}': {}", pattern, e))
        })?;
    }

    Ok(())
}

pub fn validate_upstream(upstream: &str) -> Result<()> {
    match upstream.split_once('/') {
        Some((remote, branch)) if !remote.is_empty() && !branch.is_empty() => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "Default upstream '{}' must have the form <remote>/<branch>",
            upstream
        ))),
    }
}

fn validate_remote(remote: &str) -> Result<()> {
    if remote.is_empty() || remote.contains(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "Invalid default remote '{}'",
            remote
        )));
    }
    Ok(())
}

fn validate_limits(config: &Config) -> Result<()> {
    if config.max_path_length == 0 {
        return Err(ConfigError::Validation(
            "Max path length must be greater than 0".to_string(),
        ));
    }

    if config.fetch_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "Fetch timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_worktrees_dir(dir: &str) -> Result<()> {
    if dir.is_empty() {
        return Err(ConfigError::Validation(
            "Worktrees directory cannot be empty".to_string(),
        ));
    }

    if Path::new(dir)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(ConfigError::Validation(format!(
            "Invalid worktrees directory '{}'. Must not contain '..' components",
            dir
        )));
    }

    Ok(())
}
