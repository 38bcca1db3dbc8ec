use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod branch;
pub mod fetch;
pub mod merge;
pub mod repository;
pub mod upstream;
pub mod validation;
pub mod worktree;

pub use branch::BranchInfo;
pub use fetch::FetchOutcome;
pub use merge::MergeDecision;
pub use repository::GitRepository;
pub use upstream::UpstreamContext;
pub use validation::GitValidator;
pub use worktree::WorktreeInfo;

/// Everything the cleanup engine needs from version control. Every call names the
/// directory it runs in, so one client serves candidates from several repositories.
pub trait VersionControl {
    /// Tracking ref of the HEAD checked out at `repo`, e.g. `origin/main`.
    fn upstream_of(&self, repo: &Path) -> Result<String>;
    fn resolves_to_commit(&self, repo: &Path, rev: &str) -> bool;
    /// Number of commits reachable from `commit` but not from `upstream`.
    fn count_commits_not_in(&self, repo: &Path, commit: &str, upstream: &str) -> Result<u64>;
    fn head_commit(&self, repo: &Path) -> Result<String>;
    fn current_branch(&self, repo: &Path) -> Result<Option<String>>;
    fn list_worktrees(&self, repo: &Path) -> Result<Vec<WorktreeInfo>>;
    fn remove_worktree(&self, repo: &Path, worktree: &Path, force: bool) -> Result<()>;
    fn list_branches(&self, repo: &Path) -> Result<Vec<BranchInfo>>;
    fn delete_branch(&self, repo: &Path, branch: &str, force: bool) -> Result<()>;
    fn has_remote(&self, repo: &Path, remote: &str) -> bool;
    fn fetch(&self, repo: &Path, remote: &str, timeout: Duration) -> Result<FetchOutcome>;

    /// Primary working copy of the repository `repo` belongs to.
    fn main_worktree(&self, repo: &Path) -> Result<PathBuf> {
        let worktrees = self.list_worktrees(repo)?;
        worktrees
            .into_iter()
            .find(|w| w.is_main)
            .map(|w| w.path)
            .ok_or_else(|| {
                crate::utils::WtreeError::repo_state(format!(
                    "No main working copy listed for {}",
                    repo.display()
                ))
            })
    }
}

/// [`VersionControl`] backed by the `git` executable.
#[derive(Debug, Clone, Default)]
pub struct GitService;

impl GitService {
    pub fn new() -> Self {
        Self
    }
}

impl VersionControl for GitService {
    fn upstream_of(&self, repo: &Path) -> Result<String> {
        branch::upstream_of(repo)
    }

    fn resolves_to_commit(&self, repo: &Path, rev: &str) -> bool {
        branch::resolves_to_commit(repo, rev)
    }

    fn count_commits_not_in(&self, repo: &Path, commit: &str, upstream: &str) -> Result<u64> {
        merge::count_commits_not_in(repo, commit, upstream)
    }

    fn head_commit(&self, repo: &Path) -> Result<String> {
        branch::head_commit(repo)
    }

    fn current_branch(&self, repo: &Path) -> Result<Option<String>> {
        repository::current_branch_at(repo)
    }

    fn list_worktrees(&self, repo: &Path) -> Result<Vec<WorktreeInfo>> {
        worktree::list_worktrees(repo)
    }

    fn remove_worktree(&self, repo: &Path, worktree_path: &Path, force: bool) -> Result<()> {
        worktree::remove_worktree(repo, worktree_path, force)
    }

    fn list_branches(&self, repo: &Path) -> Result<Vec<BranchInfo>> {
        branch::list_branches(repo)
    }

    fn delete_branch(&self, repo: &Path, name: &str, force: bool) -> Result<()> {
        branch::delete_branch(repo, name, force)
    }

    fn has_remote(&self, repo: &Path, remote: &str) -> bool {
        fetch::has_remote(repo, remote)
    }

    fn fetch(&self, repo: &Path, remote: &str, timeout: Duration) -> Result<FetchOutcome> {
        fetch::fetch_remote(repo, remote, timeout)
    }
}
