use crate::cli::parser::{ConfigArgs, ConfigCommands};
use crate::config::{ConfigManager, LoadedConfig};
use crate::utils::Result;
use std::path::PathBuf;

pub fn execute(args: ConfigArgs) -> Result<()> {
    match args.command.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => execute_show(),
        ConfigCommands::Path => execute_path(),
    }
}

fn execute_show() -> Result<()> {
    let loaded = ConfigManager::load()?;
    eprintln!("{}", describe_source(&loaded));
    println!("{}", serde_json::to_string_pretty(&loaded.config)?);
    Ok(())
}

fn execute_path() -> Result<()> {
    for line in describe_search_paths(&ConfigManager::search_paths()) {
        println!("{}", line);
    }
    Ok(())
}

fn describe_source(loaded: &LoadedConfig) -> String {
    match &loaded.source {
        Some(path) => format!("📄 Loaded from {}", path.display()),
        None => "📄 No configuration file found, using built-in defaults".to_string(),
    }
}

fn describe_search_paths(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let marker = if path.exists() { "  (found)" } else { "" };
            format!("{}. {}{}", i + 1, path.display(), marker)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_describe_source() {
        let loaded = LoadedConfig {
            config: Config::default(),
            source: None,
        };
        assert!(describe_source(&loaded).contains("built-in defaults"));

        let loaded = LoadedConfig {
            config: Config::default(),
            source: Some(PathBuf::from("/home/me/.wtree.json")),
        };
        assert!(describe_source(&loaded).ends_with("/home/me/.wtree.json"));
    }

    #[test]
    fn test_search_paths_mark_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let present = temp_dir.path().join("present.json");
        fs::write(&present, "{}").unwrap();
        let absent = temp_dir.path().join("absent.json");

        let lines = describe_search_paths(&[absent, present]);
        assert!(lines[0].starts_with("1. "));
        assert!(!lines[0].contains("(found)"));
        assert!(lines[1].starts_with("2. "));
        assert!(lines[1].ends_with("(found)"));
    }
}
