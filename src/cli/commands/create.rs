use super::common::{open_repository, print_path, worktrees_root};
use crate::cli::parser::CreateArgs;
use crate::config::Config;
use crate::core::git::{branch, worktree};
use crate::utils::{interrupt, PathValidator, Result};
use std::path::{Path, PathBuf};

pub fn execute(config: &Config, args: CreateArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let path = create_worktree(config, &args, &cwd)?;
    print_path(&path);
    Ok(())
}

pub fn create_worktree(config: &Config, args: &CreateArgs, cwd: &Path) -> Result<PathBuf> {
    create_worktree_with(config, args, cwd, interrupt::is_interrupted)
}

pub fn create_worktree_with(
    config: &Config,
    args: &CreateArgs,
    cwd: &Path,
    interrupted: fn() -> bool,
) -> Result<PathBuf> {
    args.validate()?;

    let (repo, main) = open_repository(cwd)?;
    let target = worktrees_root(config, &main)?.join(&args.name);
    PathValidator::new(config).validate(&target, "worktree path")?;

    let branch_name = args.branch.clone().unwrap_or_else(|| args.name.clone());
    let create_branch = !branch::branch_exists(&repo.root, &branch_name);

    if create_branch {
        eprintln!("🌱 Creating worktree '{}' on new branch '{}'", args.name, branch_name);
    } else {
        eprintln!("🌱 Creating worktree '{}' on branch '{}'", args.name, branch_name);
    }
    interrupt::check(interrupted)?;
    worktree::add_worktree(&repo.root, &target, &branch_name, create_branch, &args.git_args)?;
    eprintln!("✅ Worktree ready at {}", target.display());

    Ok(target)
}
