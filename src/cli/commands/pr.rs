use super::common::{open_repository, print_path, worktrees_root};
use crate::cli::parser::PrArgs;
use crate::config::Config;
use crate::core::git::{fetch, worktree, FetchOutcome};
use crate::utils::{interrupt, PathValidator, Result, WtreeError};
use std::path::{Path, PathBuf};

pub fn execute(config: &Config, args: PrArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    if let Some(path) = create_from_pull_request(config, &args, &cwd)? {
        print_path(&path);
    }
    Ok(())
}

/// Fetches `pull/<N>/head` into `pr-<N>` and checks it out in a new worktree.
/// Returns `None` for a dry run.
pub fn create_from_pull_request(
    config: &Config,
    args: &PrArgs,
    cwd: &Path,
) -> Result<Option<PathBuf>> {
    create_from_pull_request_with(config, args, cwd, interrupt::is_interrupted)
}

pub fn create_from_pull_request_with(
    config: &Config,
    args: &PrArgs,
    cwd: &Path,
    interrupted: fn() -> bool,
) -> Result<Option<PathBuf>> {
    let number = args.validate()?;
    let (repo, main) = open_repository(cwd)?;

    let remote = args
        .remote
        .clone()
        .unwrap_or_else(|| config.default_remote.clone());
    let branch = format!("pr-{}", number);
    let name = args.name.clone().unwrap_or_else(|| branch.clone());

    let target = worktrees_root(config, &main)?.join(&name);
    PathValidator::new(config).validate(&target, "worktree path")?;
    if target.exists() {
        return Err(WtreeError::invalid_args(format!(
            "Worktree path already exists: {}",
            target.display()
        )));
    }

    if args.dry_run {
        eprintln!(
            "🔍 Would fetch pull request #{} from '{}' into branch '{}'",
            number, remote, branch
        );
        eprintln!("🔍 Would create worktree at {}", target.display());
        return Ok(None);
    }

    if !fetch::has_remote(&repo.root, &remote) {
        return Err(WtreeError::git_operation(format!(
            "Remote '{}' is not configured",
            remote
        )));
    }

    interrupt::check(interrupted)?;
    eprintln!("📥 Fetching pull request #{} from '{}'...", number, remote);
    match fetch::fetch_pull_request(&repo.root, &remote, number, &branch, config.fetch_timeout())? {
        FetchOutcome::Updated => {}
        FetchOutcome::TimedOut => {
            return Err(WtreeError::git_operation(format!(
                "Fetching pull request #{} timed out after {}s",
                number, config.fetch_timeout_secs
            )))
        }
        FetchOutcome::Failed(reason) => {
            return Err(WtreeError::git_operation(format!(
                "Failed to fetch pull request #{}: {}",
                number, reason
            )))
        }
    }

    interrupt::check(interrupted)?;
    worktree::add_worktree(&repo.root, &target, &branch, false, &[])?;
    eprintln!("✅ Pull request #{} checked out at {}", number, target.display());

    Ok(Some(target))
}
