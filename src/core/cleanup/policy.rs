use super::inventory::{display_name, has_repository_marker, scan_directory};
use super::{
    BranchOutcome, CleanupOptions, ItemOutcome, ItemReport, SkipReason, SummaryReporter,
    WorktreeRecord,
};
use crate::config::Config;
use crate::core::git::merge::check_against_upstream;
use crate::core::git::{upstream, FetchOutcome, MergeDecision, UpstreamContext, VersionControl};
use crate::utils::error::{Result, WtreeError};
use crate::utils::interrupt;
use crate::utils::path::same_location;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Runs the per-candidate decision procedure against a [`VersionControl`] client.
///
/// One policy serves one invocation: it remembers which remotes it has already
/// fetched for each repository so that a bulk run contacts each at most once.
pub struct CleanupPolicy<'a, V: VersionControl + ?Sized> {
    pub(super) vcs: &'a V,
    pub(super) config: &'a Config,
    pub(super) options: &'a CleanupOptions,
    pub(super) interrupted: fn() -> bool,
    fetched: HashSet<(PathBuf, String)>,
}

impl<'a, V: VersionControl + ?Sized> CleanupPolicy<'a, V> {
    pub fn new(vcs: &'a V, config: &'a Config, options: &'a CleanupOptions) -> Self {
        Self {
            vcs,
            config,
            options,
            interrupted: interrupt::is_interrupted,
            fetched: HashSet::new(),
        }
    }

    pub fn with_interrupt_check(mut self, check: fn() -> bool) -> Self {
        self.interrupted = check;
        self
    }

    /// Evaluates every candidate under `root` in name order.
    ///
    /// Per-candidate failures become skips; only an interrupt ends the run early.
    pub fn clean_worktrees(&mut self, root: &Path, reporter: &mut SummaryReporter) -> Result<()> {
        let candidates = scan_directory(root)?;
        tracing::debug!(root = %root.display(), count = candidates.len(), "scanned worktree root");

        for candidate in candidates {
            self.check_interrupt()?;
            let report = self.evaluate_worktree(&candidate)?;
            reporter.record(&report);
        }

        self.check_interrupt()
    }

    /// Whether an interrupt has been requested since the run started.
    pub fn is_interrupted(&self) -> bool {
        (self.interrupted)()
    }

    fn check_interrupt(&self) -> Result<()> {
        interrupt::check(self.interrupted)
    }

    /// Decides one candidate and acts on it.
    ///
    /// The only error is an interrupt seen before the worktree is touched. An
    /// interrupt after removal keeps the branch and is left for the caller to notice.
    pub fn evaluate_worktree(&mut self, path: &Path) -> Result<ItemReport> {
        let name = display_name(path);
        let mut warnings = Vec::new();

        if !has_repository_marker(path) {
            return Ok(ItemReport::skipped(name, SkipReason::NotARepository, warnings));
        }

        let main = match self.vcs.main_worktree(path) {
            Ok(main) => main,
            Err(e) => return Ok(ItemReport::skipped(name, unreadable(e), warnings)),
        };
        if same_location(path, &main) {
            return Ok(ItemReport::skipped(name, SkipReason::MainWorkingCopy, warnings));
        }

        let current_branch = match self.vcs.current_branch(path) {
            Ok(branch) => branch,
            Err(e) => return Ok(ItemReport::skipped(name, unreadable(e), warnings)),
        };

        if !self.options.force {
            if let Some(protected) = self.protected_name(&name, current_branch.as_deref()) {
                let reason = SkipReason::Protected { name: protected };
                return Ok(ItemReport::skipped(name, reason, warnings));
            }
        }

        let head_commit = match self.vcs.head_commit(path) {
            Ok(commit) => commit,
            Err(e) => return Ok(ItemReport::skipped(name, unreadable(e), warnings)),
        };

        let record = WorktreeRecord {
            path: path.to_path_buf(),
            head_commit,
            current_branch,
            upstream: upstream::resolve(self.vcs, path, &self.config.default_upstream),
        };
        tracing::debug!(
            worktree = %record.path.display(),
            head = %record.head_commit,
            branch = ?record.current_branch,
            upstream = %record.upstream.branch_ref,
            "evaluating worktree"
        );

        self.fetch_once(&main, &record.upstream, &mut warnings);

        let merged = match check_against_upstream(
            self.vcs,
            path,
            &record.head_commit,
            &record.upstream,
        ) {
            MergeDecision::Merged => true,
            MergeDecision::NotMerged { ahead } if self.options.force => {
                warnings.push(format!(
                    "removing unmerged work: {} commit{} not in {}",
                    ahead,
                    if ahead == 1 { "" } else { "s" },
                    record.upstream.branch_ref
                ));
                false
            }
            MergeDecision::NotMerged { ahead } => {
                let reason = SkipReason::NotMerged {
                    upstream: record.upstream.branch_ref.clone(),
                    ahead,
                };
                return Ok(ItemReport::skipped(name, reason, warnings));
            }
            MergeDecision::CheckFailed { reason } => {
                let reason = SkipReason::CheckFailed { reason };
                return Ok(ItemReport::skipped(name, reason, warnings));
            }
        };

        if self.options.dry_run {
            let branch = match self.branch_to_delete(&record) {
                Ok(branch) => BranchOutcome::WouldDelete { name: branch },
                Err(outcome) => outcome,
            };
            return Ok(ItemReport {
                name,
                outcome: ItemOutcome::WouldRemove { branch },
                warnings,
            });
        }

        self.check_interrupt()?;
        if let Err(e) = self
            .vcs
            .remove_worktree(&main, &record.path, self.options.force)
        {
            let reason = SkipReason::RemovalFailed {
                reason: e.to_string(),
            };
            return Ok(ItemReport::skipped(name, reason, warnings));
        }
        tracing::debug!(worktree = %record.path.display(), "worktree removed");

        let branch = match self.branch_to_delete(&record) {
            Ok(branch) if self.is_interrupted() => {
                warnings.push(format!("interrupted, branch '{}' kept", branch));
                BranchOutcome::Kept {
                    name: branch,
                    reason: "interrupted".to_string(),
                }
            }
            Ok(branch) => self.delete_branch(&main, &branch, merged, &mut warnings),
            Err(outcome) => outcome,
        };

        Ok(ItemReport {
            name,
            outcome: ItemOutcome::Removed { branch },
            warnings,
        })
    }

    fn protected_name(&self, name: &str, branch: Option<&str>) -> Option<String> {
        if self.config.is_protected(name) {
            return Some(name.to_string());
        }
        branch
            .filter(|branch| self.config.is_protected(branch))
            .map(str::to_string)
    }

    /// The branch that should follow the worktree, or the outcome explaining why none will.
    fn branch_to_delete(&self, record: &WorktreeRecord) -> std::result::Result<String, BranchOutcome> {
        if !self.options.delete_branch {
            return Err(BranchOutcome::NotRequested);
        }
        let branch = match &record.current_branch {
            Some(branch) => branch.clone(),
            None => return Err(BranchOutcome::NoBranch),
        };
        if self.config.is_protected(&branch) {
            return Err(BranchOutcome::Kept {
                name: branch,
                reason: "protected".to_string(),
            });
        }
        if branch == record.upstream.branch_name {
            return Err(BranchOutcome::Kept {
                name: branch,
                reason: "upstream branch".to_string(),
            });
        }
        Ok(branch)
    }

    fn delete_branch(
        &self,
        repo: &Path,
        branch: &str,
        merged: bool,
        warnings: &mut Vec<String>,
    ) -> BranchOutcome {
        match self.try_delete_branch(repo, branch, merged) {
            Ok(forced) => BranchOutcome::Deleted {
                name: branch.to_string(),
                forced,
            },
            Err(e) => {
                warnings.push(format!("branch '{}' kept: {}", branch, e));
                BranchOutcome::Kept {
                    name: branch.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Tries `git branch -d`, escalating to `-D` only when forced or when the
    /// merge check already proved the branch redundant. Returns whether `-D` was used.
    pub(super) fn try_delete_branch(&self, repo: &Path, branch: &str, merged: bool) -> Result<bool> {
        let refusal = match self.vcs.delete_branch(repo, branch, false) {
            Ok(()) => return Ok(false),
            Err(e) => e,
        };

        if !(self.options.force || merged) {
            return Err(refusal);
        }

        tracing::debug!(branch, error = %refusal, "safe delete refused, forcing");
        self.vcs.delete_branch(repo, branch, true)?;
        Ok(true)
    }

    /// Refreshes remote-tracking refs once per repository and remote. Never fails.
    pub(super) fn fetch_once(
        &mut self,
        repo: &Path,
        upstream: &UpstreamContext,
        warnings: &mut Vec<String>,
    ) {
        if self.options.dry_run || upstream.remote_name.is_empty() {
            return;
        }
        let remote = &upstream.remote_name;
        if !self.fetched.insert((repo.to_path_buf(), remote.clone())) {
            return;
        }

        if !self.vcs.has_remote(repo, remote) {
            if upstream.is_fallback {
                tracing::debug!(remote = %remote, "default remote not configured, using local refs");
            } else {
                warnings.push(format!("remote '{}' not found, using local refs", remote));
            }
            return;
        }

        match self.vcs.fetch(repo, remote, self.config.fetch_timeout()) {
            Ok(FetchOutcome::Updated) => tracing::debug!(remote = %remote, "fetched"),
            Ok(FetchOutcome::TimedOut) => warnings.push(format!(
                "fetch from '{}' timed out after {}s, using local refs",
                remote, self.config.fetch_timeout_secs
            )),
            Ok(FetchOutcome::Failed(reason)) => warnings.push(format!(
                "fetch from '{}' failed, using local refs: {}",
                remote, reason
            )),
            Err(e) => warnings.push(format!(
                "fetch from '{}' failed, using local refs: {}",
                remote, e
            )),
        }
    }
}

fn unreadable(error: WtreeError) -> SkipReason {
    SkipReason::Unreadable {
        reason: error.to_string(),
    }
}
