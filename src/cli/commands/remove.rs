use super::common::removal_options;
use crate::cli::parser::RemoveArgs;
use crate::config::Config;
use crate::core::cleanup::{CleanupPolicy, ItemOutcome, ItemReport, SkipReason, SummaryReporter};
use crate::core::git::{GitService, VersionControl};
use crate::utils::interrupt;
use crate::utils::path::absolutize;
use crate::utils::{PathValidator, Result, WtreeError};

pub fn execute(config: &Config, args: RemoveArgs) -> Result<()> {
    let vcs = GitService::new();
    let report = remove_worktree(&vcs, config, &args)?;

    let mut reporter = SummaryReporter::new(args.flags.dry_run);
    reporter.record(&report);
    Ok(())
}

/// Runs the cleanup decision for a single path. Anything short of removal is an error.
pub fn remove_worktree<V: VersionControl + ?Sized>(
    vcs: &V,
    config: &Config,
    args: &RemoveArgs,
) -> Result<ItemReport> {
    remove_worktree_with(vcs, config, args, interrupt::is_interrupted)
}

pub fn remove_worktree_with<V: VersionControl + ?Sized>(
    vcs: &V,
    config: &Config,
    args: &RemoveArgs,
    interrupted: fn() -> bool,
) -> Result<ItemReport> {
    PathValidator::new(config).validate(&args.path, "worktree path")?;
    let path = absolutize(&args.path)?;

    if !path.exists() {
        return Err(WtreeError::not_found(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(WtreeError::not_a_repository(path.display().to_string()));
    }

    let options = removal_options(&args.flags);
    let mut policy = CleanupPolicy::new(vcs, config, &options).with_interrupt_check(interrupted);
    let report = policy.evaluate_worktree(&path)?;

    // the worktree may already be gone; say so before exiting as interrupted
    if policy.is_interrupted() {
        for warning in &report.warnings {
            eprintln!("⚠️  {}", warning);
        }
        if matches!(report.outcome, ItemOutcome::Removed { .. }) {
            eprintln!("🛑 {} was removed before the interrupt", report.name);
        }
        return Err(WtreeError::Interrupted);
    }

    match report.outcome {
        ItemOutcome::Removed { .. } | ItemOutcome::WouldRemove { .. } => Ok(report),
        ItemOutcome::Skipped(ref reason) => {
            for warning in &report.warnings {
                eprintln!("⚠️  {}", warning);
            }
            Err(refusal(&report.name, &path.display().to_string(), reason))
        }
    }
}

fn refusal(name: &str, path: &str, reason: &SkipReason) -> WtreeError {
    match reason {
        SkipReason::NotARepository => WtreeError::not_a_repository(path),
        SkipReason::MainWorkingCopy => WtreeError::invalid_args(format!(
            "Refusing to remove the main working copy: {}",
            path
        )),
        SkipReason::RemovalFailed { reason } => {
            WtreeError::git_operation(format!("Failed to remove {}: {}", name, reason))
        }
        SkipReason::Unreadable { reason } => {
            WtreeError::repo_state(format!("Cannot inspect {}: {}", name, reason))
        }
        SkipReason::NotMerged { .. } | SkipReason::Protected { .. } => WtreeError::policy_refusal(
            format!("{} is {}; use --force to remove it anyway", name, reason_phrase(reason)),
        ),
        other => WtreeError::policy_refusal(format!("{}: {}", name, other)),
    }
}

fn reason_phrase(reason: &SkipReason) -> String {
    match reason {
        SkipReason::Protected { name } => format!("protected ('{}')", name),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::RemovalFlags;
    use crate::test_utils::test_helpers::*;
    use std::path::{Path, PathBuf};

    fn args(path: &Path, force: bool, dry_run: bool) -> RemoveArgs {
        RemoveArgs {
            path: path.to_path_buf(),
            flags: RemovalFlags {
                dry_run,
                force,
                no_delete_branch: false,
            },
        }
    }

    fn add_worktree(repo: &Path, dir: &Path, branch: &str) -> PathBuf {
        let path = dir.join(branch);
        git(repo, &["worktree", "add", "--quiet", "-b", branch, &path.to_string_lossy()]);
        path
    }

    #[test]
    fn test_merged_worktree_removed_with_branch() {
        let (temp_dir, repo_path) = setup_test_repo();
        let path = add_worktree(&repo_path, temp_dir.path(), "done");

        let report =
            remove_worktree(&GitService::new(), &Config::default(), &args(&path, false, false))
                .unwrap();

        assert!(report.outcome.is_removal());
        assert!(!path.exists());
        assert!(git(&repo_path, &["branch", "--list", "done"]).is_empty());
    }

    #[test]
    fn test_unmerged_worktree_is_policy_refusal() {
        let (temp_dir, repo_path) = setup_test_repo();
        let path = add_worktree(&repo_path, temp_dir.path(), "wip");
        commit_file(&path, "wip.txt", "wip", "unfinished");

        let err =
            remove_worktree(&GitService::new(), &Config::default(), &args(&path, false, false))
                .unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert!(path.exists());
    }

    #[test]
    fn test_dry_run_refusal_still_exits_three() {
        let (temp_dir, repo_path) = setup_test_repo();
        let path = add_worktree(&repo_path, temp_dir.path(), "wip");
        commit_file(&path, "wip.txt", "wip", "unfinished");

        let err = remove_worktree(&GitService::new(), &Config::default(), &args(&path, false, true))
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_main_working_copy_refused_even_forced() {
        let (_temp_dir, repo_path) = setup_test_repo();
        let config = Config {
            protected_names: Vec::new(),
            ..Config::default()
        };

        let err = remove_worktree(&GitService::new(), &config, &args(&repo_path, true, false))
            .unwrap_err();

        assert_eq!(err.exit_code(), 1);
        assert!(repo_path.join(".git").exists());
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let err = remove_worktree(
            &GitService::new(),
            &Config::default(),
            &args(&temp_dir.path().join("gone"), false, false),
        )
        .unwrap_err();
        assert!(matches!(err, WtreeError::NotFound { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_plain_directory_is_not_a_repository() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let err = remove_worktree(
            &GitService::new(),
            &Config::default(),
            &args(temp_dir.path(), false, false),
        )
        .unwrap_err();
        assert!(matches!(err, WtreeError::NotARepository { .. }));
    }

    fn always() -> bool {
        true
    }

    #[test]
    fn test_interrupt_leaves_merged_worktree_in_place() {
        let (temp_dir, repo_path) = setup_test_repo();
        let path = add_worktree(&repo_path, temp_dir.path(), "done");

        let err = remove_worktree_with(
            &GitService::new(),
            &Config::default(),
            &args(&path, false, false),
            always,
        )
        .unwrap_err();

        assert!(matches!(err, WtreeError::Interrupted));
        assert_eq!(err.exit_code(), 130);
        assert!(path.exists());
        assert!(!git(&repo_path, &["branch", "--list", "done"]).is_empty());
    }

    #[test]
    fn test_traversal_rejected_before_anything_else() {
        let err = remove_worktree(
            &GitService::new(),
            &Config::default(),
            &args(Path::new("../somewhere"), false, false),
        )
        .unwrap_err();
        assert!(matches!(err, WtreeError::Validation { .. }));
    }
}
