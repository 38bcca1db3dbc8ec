use super::Config;
use std::path::PathBuf;

pub const CONFIG_ENV_VAR: &str = "WTREE_CONFIG_PATH";
pub const DOTFILE_NAME: &str = ".wtree.json";

pub fn default_config() -> Config {
    Config {
        protected_names: default_protected_names(),
        default_upstream: "origin/main".to_string(),
        default_remote: "origin".to_string(),
        system_directories: default_system_directories(),
        max_path_length: 4096,
        fetch_timeout_secs: 30,
        worktrees_dir: None,
        skip_patterns: Vec::new(),
    }
}

pub fn default_protected_names() -> Vec<String> {
    ["main", "master", "develop", "trunk"]
        .iter()
        .map(|name| name.to_string())
        .collect()
}

pub fn default_system_directories() -> Vec<PathBuf> {
    ["/etc", "/bin", "/usr/bin", "/sbin", "/usr/sbin"]
        .iter()
        .map(PathBuf::from)
        .collect()
}

pub fn get_default_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "wtree").map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn get_home_dotfile() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(DOTFILE_NAME))
}

/// Candidate config files in lookup order. The first one that exists wins.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(dir) = get_default_config_dir() {
        paths.push(dir.join("config.json"));
    }
    if let Some(dotfile) = get_home_dotfile() {
        paths.push(dotfile);
    }
    paths.push(PathBuf::from(".").join(DOTFILE_NAME));

    paths
}
