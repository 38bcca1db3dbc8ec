//! Keep/remove decisions for worktrees and branches.
//!
//! Every candidate walks the same linear path: marker check, main-copy check,
//! protected names, skip patterns, upstream resolution, merge check, removal,
//! and finally optional branch deletion. Each candidate ends either removed or
//! skipped, and each one is counted exactly once.

use crate::core::git::UpstreamContext;
use std::fmt;
use std::path::PathBuf;

pub mod branches;
pub mod inventory;
pub mod policy;
pub mod reporter;

pub use policy::CleanupPolicy;
pub use reporter::SummaryReporter;

#[derive(Debug, Clone, Default)]
pub struct CleanupOptions {
    pub dry_run: bool,
    pub force: bool,
    pub delete_branch: bool,
    pub skip_patterns: Vec<String>,
}

/// One candidate worktree as seen at decision time.
#[derive(Debug, Clone)]
pub struct WorktreeRecord {
    pub path: PathBuf,
    pub head_commit: String,
    pub current_branch: Option<String>,
    pub upstream: UpstreamContext,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NotARepository,
    MainWorkingCopy,
    Protected { name: String },
    MatchesSkipPattern { pattern: String },
    UpstreamBranch,
    CheckedOut,
    Unreadable { reason: String },
    NotMerged { upstream: String, ahead: u64 },
    CheckFailed { reason: String },
    RemovalFailed { reason: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotARepository => write!(f, "not a repository"),
            SkipReason::MainWorkingCopy => write!(f, "main working copy"),
            SkipReason::Protected { name } => write!(f, "protected name '{}'", name),
            SkipReason::MatchesSkipPattern { pattern } => {
                write!(f, "matches skip pattern '{}'", pattern)
            }
            SkipReason::UpstreamBranch => write!(f, "is the upstream branch"),
            SkipReason::CheckedOut => write!(f, "checked out in a worktree"),
            SkipReason::Unreadable { reason } => write!(f, "cannot inspect: {}", reason),
            SkipReason::NotMerged { upstream, ahead } => write!(
                f,
                "not merged into {} ({} commit{} ahead)",
                upstream,
                ahead,
                if *ahead == 1 { "" } else { "s" }
            ),
            SkipReason::CheckFailed { reason } => write!(f, "merge check failed: {}", reason),
            SkipReason::RemovalFailed { reason } => write!(f, "removal failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BranchOutcome {
    NotRequested,
    NoBranch,
    Deleted { name: String, forced: bool },
    WouldDelete { name: String },
    Kept { name: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Removed { branch: BranchOutcome },
    WouldRemove { branch: BranchOutcome },
    Skipped(SkipReason),
}

impl ItemOutcome {
    pub fn is_removal(&self) -> bool {
        matches!(
            self,
            ItemOutcome::Removed { .. } | ItemOutcome::WouldRemove { .. }
        )
    }
}

/// Decision for a single candidate plus any warnings raised on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemReport {
    pub name: String,
    pub outcome: ItemOutcome,
    pub warnings: Vec<String>,
}

impl ItemReport {
    pub fn skipped(name: impl Into<String>, reason: SkipReason, warnings: Vec<String>) -> Self {
        Self {
            name: name.into(),
            outcome: ItemOutcome::Skipped(reason),
            warnings,
        }
    }
}

/// Running totals for one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupOutcome {
    pub processed: usize,
    pub removed: usize,
    pub skipped: usize,
}

impl CleanupOutcome {
    pub fn record(&mut self, outcome: &ItemOutcome) {
        self.processed += 1;
        if outcome.is_removal() {
            self.removed += 1;
        } else {
            self.skipped += 1;
        }
    }
}
