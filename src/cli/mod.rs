pub mod commands;
pub mod parser;


pub use parser::{Cli, Commands};

use crate::config::{Config, ConfigManager};
use crate::utils::Result;

/// Runs the parsed command and returns the process exit code.
pub fn execute_command(cli: Cli) -> Result<i32> {
    execute_command_with_config(cli, None)
}

pub fn execute_command_with_config(cli: Cli, test_config: Option<Config>) -> Result<i32> {
    let load = || -> Result<Config> {
        match test_config {
            Some(config) => Ok(config),
            None => Ok(ConfigManager::load()?.config),
        }
    };

    match cli.command {
        Commands::Create(args) => commands::create::execute(&load()?, args).map(|()| 0),
        Commands::Pr(args) => commands::pr::execute(&load()?, args).map(|()| 0),
        Commands::Remove(args) => commands::remove::execute(&load()?, args).map(|()| 0),
        Commands::Clean(args) => commands::clean::execute(&load()?, args).map(|()| 0),
        Commands::CleanBranches(args) => {
            commands::clean_branches::execute(&load()?, args).map(|()| 0)
        }
        Commands::Jump(args) => commands::jump::execute(args).map(|()| 0),
        Commands::Diff(args) => commands::passthrough::execute("diff", args),
        Commands::Show(args) => commands::passthrough::execute("show", args),
        Commands::Branch => commands::current_branch::execute().map(|()| 0),
        Commands::Config(args) => commands::config::execute(args).map(|()| 0),
        Commands::Completion(args) => commands::completion::execute(args).map(|()| 0),
    }
}
