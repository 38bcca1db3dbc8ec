use crate::utils::{Result, WtreeError};
use regex::Regex;
use std::sync::OnceLock;

fn worktree_name_regex() -> std::result::Result<&'static Regex, &'static regex::Error> {
    static VALID_NAME: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    VALID_NAME
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9._-]*$"))
        .as_ref()
}

/// Worktree names become directory names, so they stay a single path segment.
pub fn validate_worktree_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(WtreeError::invalid_args("Worktree name cannot be empty"));
    }

    if name.len() > 100 {
        return Err(WtreeError::invalid_args(
            "Worktree name cannot be longer than 100 characters",
        ));
    }

    let valid_regex = worktree_name_regex()
        .map_err(|e| WtreeError::config_error(format!("Invalid regex: {}", e)))?;

    if !valid_regex.is_match(name) {
        return Err(WtreeError::invalid_args(format!(
            "Invalid worktree name '{}': must start with a letter or digit and contain only letters, digits, '.', '-' and '_'",
            name
        )));
    }

    if name.contains("..") {
        return Err(WtreeError::invalid_args(format!(
            "Invalid worktree name '{}': cannot contain '..'",
            name
        )));
    }

    Ok(())
}

pub fn parse_pr_number(raw: &str) -> Result<u64> {
    let trimmed = raw.trim().trim_start_matches('#');
    match trimmed.parse::<u64>() {
        Ok(0) | Err(_) => Err(WtreeError::invalid_args(format!(
            "Pull request id must be a positive number, got '{}'",
            raw
        ))),
        Ok(number) => Ok(number),
    }
}
