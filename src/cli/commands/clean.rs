use super::common::removal_options;
use crate::cli::parser::CleanArgs;
use crate::config::Config;
use crate::core::cleanup::{CleanupOutcome, CleanupPolicy, SummaryReporter};
use crate::core::git::{GitService, VersionControl};
use crate::utils::path::absolutize;
use crate::utils::{PathValidator, Result, WtreeError};

pub fn execute(config: &Config, args: CleanArgs) -> Result<()> {
    let vcs = GitService::new();
    let mut reporter = SummaryReporter::new(args.flags.dry_run);
    clean_worktrees(&vcs, config, &args, &mut reporter).map(|_| ())
}

/// Bulk cleanup always finishes with a summary, even when interrupted part way.
pub fn clean_worktrees<V: VersionControl + ?Sized>(
    vcs: &V,
    config: &Config,
    args: &CleanArgs,
    reporter: &mut SummaryReporter,
) -> Result<CleanupOutcome> {
    PathValidator::new(config).validate(&args.root, "worktrees directory")?;
    let root = absolutize(&args.root)?;
    if !root.is_dir() {
        return Err(WtreeError::not_found(root.display().to_string()));
    }

    let options = removal_options(&args.flags);
    let mode = if options.dry_run { " (dry run)" } else { "" };
    println!("🧹 Cleaning worktrees under {}{}", root.display(), mode);

    let result = CleanupPolicy::new(vcs, config, &options).clean_worktrees(&root, reporter);
    let outcome = reporter.finish();
    result.map(|()| outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::RemovalFlags;
    use crate::test_utils::FakeVcs;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn args(root: &Path, dry_run: bool) -> CleanArgs {
        CleanArgs {
            root: root.to_path_buf(),
            flags: RemovalFlags {
                dry_run,
                force: false,
                no_delete_branch: false,
            },
        }
    }

    #[test]
    fn test_missing_root_is_usage_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut reporter = SummaryReporter::captured(false);
        let err = clean_worktrees(
            &FakeVcs::new(),
            &Config::default(),
            &args(&temp_dir.path().join("missing"), false),
            &mut reporter,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(reporter.lines().is_empty());
    }

    #[test]
    fn test_empty_root_completes_with_summary() {
        let temp_dir = TempDir::new().unwrap();
        let mut reporter = SummaryReporter::captured(true);
        let outcome = clean_worktrees(
            &FakeVcs::new(),
            &Config::default(),
            &args(temp_dir.path(), true),
            &mut reporter,
        )
        .unwrap();

        assert_eq!(outcome, CleanupOutcome::default());
        assert_eq!(
            reporter.lines().last().map(String::as_str),
            Some("Processed: 0, Would remove: 0, Skipped: 0")
        );
    }

    #[test]
    fn test_every_candidate_failing_still_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let main = temp_dir.path().join("repo");
        fs::create_dir_all(main.join(".git")).unwrap();
        let root = temp_dir.path().join("trees");
        let broken = root.join("broken");
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join(".git"), "gitdir: x").unwrap();

        let vcs = FakeVcs::new()
            .with_main(&main)
            .with_ref("origin/main")
            .with_broken_worktree(&broken, "broken");
        let mut reporter = SummaryReporter::captured(false);
        let outcome =
            clean_worktrees(&vcs, &Config::default(), &args(&root, false), &mut reporter).unwrap();

        assert_eq!(outcome.processed, 1);
        assert_eq!(outcome.removed, 0);
        assert_eq!(outcome.skipped, 1);
    }
}
