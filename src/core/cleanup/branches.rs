use super::policy::CleanupPolicy;
use super::{BranchOutcome, ItemOutcome, ItemReport, SkipReason, SummaryReporter};
use crate::core::git::merge::check_against_upstream;
use crate::core::git::{upstream, BranchInfo, MergeDecision, UpstreamContext, VersionControl};
use crate::utils::error::{Result, WtreeError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::Path;

/// Compiled `--skip` patterns, remembering the source text for reports.
#[derive(Debug)]
pub struct SkipPatterns {
    patterns: Vec<String>,
    set: GlobSet,
}

impl SkipPatterns {
    /// Accepts repeated values as well as comma-separated lists.
    pub fn compile(raw: &[String]) -> Result<Self> {
        let patterns: Vec<String> = raw
            .iter()
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|pattern| !pattern.is_empty())
            .map(str::to_string)
            .collect();

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                WtreeError::invalid_args(format!("invalid skip pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| WtreeError::invalid_args(format!("failed to compile skip patterns: {}", e)))?;

        Ok(Self { patterns, set })
    }

    pub fn first_match(&self, branch: &str) -> Option<&str> {
        self.set
            .matches(branch)
            .into_iter()
            .min()
            .map(|index| self.patterns[index].as_str())
    }
}

struct BranchContext {
    upstream: UpstreamContext,
    skip: SkipPatterns,
    checked_out: HashSet<String>,
}

impl<'a, V: VersionControl + ?Sized> CleanupPolicy<'a, V> {
    /// Deletes local branches of `repo` whose commits are all reachable from the upstream.
    pub fn clean_branches(&mut self, repo: &Path, reporter: &mut SummaryReporter) -> Result<()> {
        let skip = SkipPatterns::compile(&self.options.skip_patterns)?;
        let main = self.vcs.main_worktree(repo)?;

        let mut checked_out: HashSet<String> = self
            .vcs
            .list_worktrees(repo)?
            .into_iter()
            .filter_map(|w| w.branch)
            .collect();
        if let Some(current) = self.vcs.current_branch(repo)? {
            checked_out.insert(current);
        }

        let upstream = upstream::resolve(self.vcs, repo, &self.config.default_upstream);
        tracing::debug!(upstream = %upstream.branch_ref, fallback = upstream.is_fallback, "cleaning branches");

        let mut warnings = Vec::new();
        self.fetch_once(&main, &upstream, &mut warnings);
        for warning in &warnings {
            reporter.warn(warning);
        }

        let context = BranchContext {
            upstream,
            skip,
            checked_out,
        };

        for branch in self.vcs.list_branches(repo)? {
            if (self.interrupted)() {
                return Err(WtreeError::Interrupted);
            }
            let report = self.evaluate_branch(repo, &branch, &context);
            reporter.record(&report);
        }

        Ok(())
    }

    fn evaluate_branch(&self, repo: &Path, branch: &BranchInfo, context: &BranchContext) -> ItemReport {
        let name = branch.name.clone();
        let mut warnings = Vec::new();

        // Deleting a protected branch is never worth the risk, forced or not.
        if self.config.is_protected(&name) {
            let reason = SkipReason::Protected { name: name.clone() };
            return ItemReport::skipped(name, reason, warnings);
        }
        if let Some(pattern) = context.skip.first_match(&name) {
            let reason = SkipReason::MatchesSkipPattern {
                pattern: pattern.to_string(),
            };
            return ItemReport::skipped(name, reason, warnings);
        }
        if name == context.upstream.branch_name {
            return ItemReport::skipped(name, SkipReason::UpstreamBranch, warnings);
        }
        if context.checked_out.contains(&name) {
            return ItemReport::skipped(name, SkipReason::CheckedOut, warnings);
        }

        let merged = match check_against_upstream(self.vcs, repo, &branch.commit, &context.upstream) {
            MergeDecision::Merged => true,
            MergeDecision::NotMerged { ahead } if self.options.force => {
                warnings.push(format!(
                    "deleting unmerged branch: {} commit{} not in {}",
                    ahead,
                    if ahead == 1 { "" } else { "s" },
                    context.upstream.branch_ref
                ));
                false
            }
            MergeDecision::NotMerged { ahead } => {
                let reason = SkipReason::NotMerged {
                    upstream: context.upstream.branch_ref.clone(),
                    ahead,
                };
                return ItemReport::skipped(name, reason, warnings);
            }
            MergeDecision::CheckFailed { reason } => {
                return ItemReport::skipped(name, SkipReason::CheckFailed { reason }, warnings);
            }
        };

        if self.options.dry_run {
            let outcome = ItemOutcome::WouldRemove {
                branch: BranchOutcome::WouldDelete { name: name.clone() },
            };
            return ItemReport {
                name,
                outcome,
                warnings,
            };
        }

        match self.try_delete_branch(repo, &name, merged) {
            Ok(forced) => {
                let outcome = ItemOutcome::Removed {
                    branch: BranchOutcome::Deleted {
                        name: name.clone(),
                        forced,
                    },
                };
                ItemReport {
                    name,
                    outcome,
                    warnings,
                }
            }
            Err(e) => ItemReport::skipped(
                name,
                SkipReason::RemovalFailed {
                    reason: e.to_string(),
                },
                warnings,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::cleanup::CleanupOptions;
    use crate::core::git::FetchOutcome;
    use crate::test_utils::{FakeVcs, VcsEvent};
    use std::fs;
    use tempfile::TempDir;

    fn never() -> bool {
        false
    }

    fn options(force: bool, dry_run: bool, skip: &[&str]) -> CleanupOptions {
        CleanupOptions {
            dry_run,
            force,
            delete_branch: true,
            skip_patterns: skip.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn repo() -> (TempDir, std::path::PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let main = temp_dir.path().join("repo");
        fs::create_dir_all(main.join(".git")).unwrap();
        (temp_dir, main)
    }

    fn run(vcs: &FakeVcs, main: &Path, opts: &CleanupOptions) -> SummaryReporter {
        let config = Config::default();
        let mut reporter = SummaryReporter::captured(opts.dry_run);
        CleanupPolicy::new(vcs, &config, opts)
            .with_interrupt_check(never)
            .clean_branches(main, &mut reporter)
            .unwrap();
        reporter
    }

    #[test]
    fn test_skip_patterns_split_on_commas() {
        let skip = SkipPatterns::compile(&["release/*, keep-*".to_string(), "wip".to_string()])
            .unwrap();
        assert_eq!(skip.first_match("release/1.0"), Some("release/*"));
        assert_eq!(skip.first_match("keep-me"), Some("keep-*"));
        assert_eq!(skip.first_match("wip"), Some("wip"));
        assert_eq!(skip.first_match("feature"), None);
    }

    #[test]
    fn test_invalid_skip_pattern_is_usage_error() {
        let err = SkipPatterns::compile(&["feature/[".to_string()]).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_merged_branches_deleted_others_kept() {
        let (_temp_dir, main) = repo();
        let vcs = FakeVcs::new()
            .with_main(&main)
            .with_ref("origin/main")
            .with_branch("done", "c1", 0)
            .with_branch("wip", "c2", 4)
            .with_branch("release/1.0", "c3", 0);
        let opts = options(false, false, &["release/*"]);

        let outcome = run(&vcs, &main, &opts).finish();

        assert_eq!(vcs.branch_names(), vec!["wip", "release/1.0"]);
        assert_eq!(outcome.processed, 3);
        assert_eq!(outcome.removed, 1);
        assert_eq!(outcome.skipped, 2);
    }

    #[test]
    fn test_protected_and_checked_out_never_deleted() {
        let (temp_dir, main) = repo();
        let linked = temp_dir.path().join("linked");
        fs::create_dir_all(&linked).unwrap();
        let vcs = FakeVcs::new()
            .with_main(&main)
            .with_ref("origin/main")
            .with_branch("main", "m", 0)
            .with_branch("develop", "d", 0)
            .with_worktree(&linked, "linked", "l", 0);
        let opts = options(true, false, &[]);

        let reporter = run(&vcs, &main, &opts);
        let lines = reporter.lines().join("\n");

        assert!(lines.contains("Skipped develop: protected name 'develop'"));
        assert!(lines.contains("Skipped linked: checked out in a worktree"));
        assert_eq!(vcs.branch_names(), vec!["main", "develop", "linked"]);
    }

    #[test]
    fn test_upstream_branch_name_skipped_when_not_protected() {
        let (_temp_dir, main) = repo();
        let vcs = FakeVcs::new()
            .with_main(&main)
            .with_upstream(&main, "origin/stable")
            .with_ref("origin/stable")
            .with_branch("stable", "s", 0);
        let opts = options(false, false, &[]);

        let reporter = run(&vcs, &main, &opts);
        assert!(reporter
            .lines()
            .iter()
            .any(|l| l.contains("Skipped stable: is the upstream branch")));
        assert_eq!(vcs.branch_names(), vec!["stable"]);
    }

    #[test]
    fn test_force_deletes_unmerged_with_warning() {
        let (_temp_dir, main) = repo();
        let vcs = FakeVcs::new()
            .with_main(&main)
            .with_ref("origin/main")
            .with_branch("wip", "c2", 1)
            .with_git_refusing_safe_delete("wip");
        let opts = options(true, false, &[]);

        let reporter = run(&vcs, &main, &opts);

        assert!(vcs.branch_names().is_empty());
        assert!(reporter
            .lines()
            .iter()
            .any(|l| l.contains("deleting unmerged branch: 1 commit not in origin/main")));
        assert_eq!(
            vcs.events(),
            vec![
                VcsEvent::DeleteBranch {
                    name: "wip".to_string(),
                    force: false
                },
                VcsEvent::DeleteBranch {
                    name: "wip".to_string(),
                    force: true
                },
            ]
        );
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let (_temp_dir, main) = repo();
        let vcs = FakeVcs::new()
            .with_main(&main)
            .with_ref("origin/main")
            .with_remote("origin", FetchOutcome::Updated)
            .with_branch("done", "c1", 0);
        let opts = options(false, true, &[]);

        let first = run(&vcs, &main, &opts).finish();
        let second = run(&vcs, &main, &opts).finish();

        assert_eq!(first, second);
        assert_eq!(first.removed, 1);
        assert_eq!(vcs.branch_names(), vec!["done"]);
        assert!(vcs.events().is_empty());
    }

    #[test]
    fn test_fetch_failure_is_reported_once() {
        let (_temp_dir, main) = repo();
        let vcs = FakeVcs::new()
            .with_main(&main)
            .with_ref("origin/main")
            .with_remote("origin", FetchOutcome::Failed("network down".to_string()))
            .with_branch("a", "c1", 0)
            .with_branch("b", "c2", 0);
        let opts = options(false, false, &[]);

        let reporter = run(&vcs, &main, &opts);
        let warnings = reporter
            .lines()
            .iter()
            .filter(|l| l.contains("network down"))
            .count();
        assert_eq!(warnings, 1);
        assert!(vcs.branch_names().is_empty());
    }
}
