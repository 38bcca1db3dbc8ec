use crate::config::Config;
use crate::utils::error::{Result, WtreeError};
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

// pipe, semicolon, ampersand, backtick, subshell open
const INJECTION_PATTERN: &str = r"[|;&`]|\$\(";

fn injection_regex() -> std::result::Result<&'static Regex, &'static regex::Error> {
    static INJECTION: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    INJECTION.get_or_init(|| Regex::new(INJECTION_PATTERN)).as_ref()
}

/// Input checks for user-supplied directory paths. Any failure aborts the whole
/// operation; it is never a per-item skip.
pub struct PathValidator<'a> {
    config: &'a Config,
}

impl<'a> PathValidator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn validate(&self, path: &Path, label: &str) -> Result<()> {
        let raw = path.to_string_lossy();

        if raw.is_empty() {
            return Err(WtreeError::validation(label, "path is empty"));
        }

        if raw.contains('\0') {
            return Err(WtreeError::validation(label, "path contains a null byte"));
        }

        if raw.len() > self.config.max_path_length {
            return Err(WtreeError::validation(
                label,
                format!(
                    "path is longer than {} characters",
                    self.config.max_path_length
                ),
            ));
        }

        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(WtreeError::validation(
                label,
                format!("'{}' contains a '..' segment", raw),
            ));
        }

        let injection = injection_regex()
            .map_err(|e| WtreeError::validation(label, format!("Regex error: {}", e)))?;
        if injection.is_match(&raw) {
            return Err(WtreeError::validation(
                label,
                format!("'{}' contains shell metacharacters", raw),
            ));
        }

        let absolute = absolutize(path)?;
        let resolved = safe_resolve_path(&absolute);
        for system_dir in &self.config.system_directories {
            if absolute.starts_with(system_dir) || resolved.starts_with(system_dir) {
                return Err(WtreeError::validation(
                    label,
                    format!(
                        "'{}' is inside protected system directory {}",
                        raw,
                        system_dir.display()
                    ),
                ));
            }
        }

        Ok(())
    }
}

/// Makes `path` absolute against the current directory without touching the filesystem.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(normalize_path(&joined))
}

/// Lexical normalization that doesn't follow symlinks.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Canonicalizes existing paths, falling back to the input when that fails.
pub fn safe_resolve_path(path: &Path) -> PathBuf {
    if path.exists() {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    } else {
        path.to_path_buf()
    }
}

/// Compares two paths after resolving both to canonical absolute form.
pub fn same_location(a: &Path, b: &Path) -> bool {
    let a = absolutize(a).map(|p| safe_resolve_path(&p));
    let b = absolutize(b).map(|p| safe_resolve_path(&p));
    matches!((a, b), (Ok(a), Ok(b)) if a == b)
}
