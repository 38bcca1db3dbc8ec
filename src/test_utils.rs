pub mod test_helpers {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::process::Command;
    use tempfile::TempDir;

    pub fn git(dir: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .current_dir(dir)
            .args(args)
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
        fs::write(dir.join(name), content).expect("Failed to write file");
        git(dir, &["add", name]);
        git(dir, &["commit", "--quiet", "-m", message]);
    }

    /// Creates `<tmp>/repo` with one commit on `main`. Worktrees can live next to it.
    pub fn setup_test_repo() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo_path = temp_dir.path().join("repo");
        fs::create_dir(&repo_path).expect("Failed to create repo dir");

        git(&repo_path, &["init", "--quiet", "--initial-branch=main"]);
        git(&repo_path, &["config", "user.name", "Test User"]);
        git(&repo_path, &["config", "user.email", "test@example.com"]);
        git(&repo_path, &["config", "commit.gpgsign", "false"]);
        commit_file(&repo_path, "README.md", "# Test Repository", "Initial commit");

        (temp_dir, repo_path)
    }
}

use crate::core::git::{BranchInfo, FetchOutcome, VersionControl, WorktreeInfo};
use crate::utils::{Result, WtreeError};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum VcsEvent {
    Fetch { remote: String },
    RemoveWorktree { path: PathBuf, force: bool },
    DeleteBranch { name: String, force: bool },
}

/// In-memory [`VersionControl`] for exercising the cleanup engine without git.
///
/// Worktree paths are real directories (the engine checks for `.git` on disk);
/// everything git would answer comes from the maps below.
#[derive(Default)]
pub struct FakeVcs {
    main_path: PathBuf,
    upstreams: HashMap<PathBuf, String>,
    refs: HashSet<String>,
    ahead: HashMap<String, u64>,
    heads: HashMap<PathBuf, String>,
    checked_out: HashMap<PathBuf, String>,
    worktrees: Vec<WorktreeInfo>,
    branches: RefCell<Vec<BranchInfo>>,
    unmerged_for_git: HashSet<String>,
    undeletable: HashSet<String>,
    failing_removals: HashSet<PathBuf>,
    remotes: HashSet<String>,
    fetch_result: Option<FetchOutcome>,
    events: RefCell<Vec<VcsEvent>>,
}

impl FakeVcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_main(mut self, path: &Path) -> Self {
        self.main_path = path.to_path_buf();
        self.worktrees.insert(
            0,
            WorktreeInfo {
                path: path.to_path_buf(),
                commit: "main-head".to_string(),
                branch: Some("main".to_string()),
                is_bare: false,
                is_main: true,
            },
        );
        self.checked_out
            .insert(path.to_path_buf(), "main".to_string());
        self
    }

    pub fn with_upstream(mut self, repo: &Path, upstream: &str) -> Self {
        self.upstreams.insert(repo.to_path_buf(), upstream.to_string());
        self
    }

    pub fn with_ref(mut self, name: &str) -> Self {
        self.refs.insert(name.to_string());
        self
    }

    /// Registers a linked worktree whose head is `commit`, `ahead` commits past upstream.
    pub fn with_worktree(mut self, path: &Path, branch: &str, commit: &str, ahead: u64) -> Self {
        self.heads.insert(path.to_path_buf(), commit.to_string());
        self.checked_out
            .insert(path.to_path_buf(), branch.to_string());
        self.ahead.insert(commit.to_string(), ahead);
        self.worktrees.push(WorktreeInfo {
            path: path.to_path_buf(),
            commit: commit.to_string(),
            branch: Some(branch.to_string()),
            is_bare: false,
            is_main: false,
        });
        self.branches.borrow_mut().push(BranchInfo {
            name: branch.to_string(),
            commit: commit.to_string(),
        });
        self
    }

    /// Registers a worktree whose ancestry query errors.
    pub fn with_broken_worktree(mut self, path: &Path, branch: &str) -> Self {
        self.heads.insert(path.to_path_buf(), "broken".to_string());
        self.checked_out
            .insert(path.to_path_buf(), branch.to_string());
        self.worktrees.push(WorktreeInfo {
            path: path.to_path_buf(),
            commit: "broken".to_string(),
            branch: Some(branch.to_string()),
            is_bare: false,
            is_main: false,
        });
        self
    }

    pub fn with_branch(mut self, name: &str, commit: &str, ahead: u64) -> Self {
        self.branches.borrow_mut().push(BranchInfo {
            name: name.to_string(),
            commit: commit.to_string(),
        });
        self.ahead.insert(commit.to_string(), ahead);
        self
    }

    /// `git branch -d` refuses this branch; `-D` still works.
    pub fn with_git_refusing_safe_delete(mut self, name: &str) -> Self {
        self.unmerged_for_git.insert(name.to_string());
        self
    }

    pub fn with_undeletable_branch(mut self, name: &str) -> Self {
        self.undeletable.insert(name.to_string());
        self
    }

    pub fn with_failing_removal(mut self, path: &Path) -> Self {
        self.failing_removals.insert(path.to_path_buf());
        self
    }

    pub fn with_remote(mut self, remote: &str, result: FetchOutcome) -> Self {
        self.remotes.insert(remote.to_string());
        self.fetch_result = Some(result);
        self
    }

    pub fn events(&self) -> Vec<VcsEvent> {
        self.events.borrow().clone()
    }

    pub fn branch_names(&self) -> Vec<String> {
        self.branches
            .borrow()
            .iter()
            .map(|b| b.name.clone())
            .collect()
    }
}

impl VersionControl for FakeVcs {
    fn upstream_of(&self, repo: &Path) -> Result<String> {
        self.upstreams
            .get(repo)
            .cloned()
            .ok_or_else(|| WtreeError::git_operation("no upstream configured"))
    }

    fn resolves_to_commit(&self, _repo: &Path, rev: &str) -> bool {
        self.refs.contains(rev) || self.ahead.contains_key(rev)
    }

    fn count_commits_not_in(&self, _repo: &Path, commit: &str, upstream: &str) -> Result<u64> {
        if !self.refs.contains(upstream) {
            return Err(WtreeError::git_operation(format!(
                "bad revision '{}'",
                upstream
            )));
        }
        self.ahead
            .get(commit)
            .copied()
            .ok_or_else(|| WtreeError::git_operation(format!("bad revision '{}'", commit)))
    }

    fn head_commit(&self, repo: &Path) -> Result<String> {
        self.heads
            .get(repo)
            .cloned()
            .ok_or_else(|| WtreeError::git_operation("no HEAD"))
    }

    fn current_branch(&self, repo: &Path) -> Result<Option<String>> {
        Ok(self.checked_out.get(repo).cloned())
    }

    fn list_worktrees(&self, _repo: &Path) -> Result<Vec<WorktreeInfo>> {
        Ok(self
            .worktrees
            .iter()
            .filter(|w| w.is_main || w.path.exists())
            .cloned()
            .collect())
    }

    fn remove_worktree(&self, _repo: &Path, worktree: &Path, force: bool) -> Result<()> {
        self.events.borrow_mut().push(VcsEvent::RemoveWorktree {
            path: worktree.to_path_buf(),
            force,
        });
        if self.failing_removals.contains(worktree) {
            return Err(WtreeError::git_operation("worktree contains modifications"));
        }
        std::fs::remove_dir_all(worktree)?;
        Ok(())
    }

    fn list_branches(&self, _repo: &Path) -> Result<Vec<BranchInfo>> {
        let mut branches = self.branches.borrow().clone();
        branches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(branches)
    }

    fn delete_branch(&self, _repo: &Path, name: &str, force: bool) -> Result<()> {
        self.events.borrow_mut().push(VcsEvent::DeleteBranch {
            name: name.to_string(),
            force,
        });

        let checked_out = self
            .worktrees
            .iter()
            .any(|w| w.branch.as_deref() == Some(name) && (w.is_main || w.path.exists()));
        if checked_out {
            return Err(WtreeError::git_operation(format!(
                "branch '{}' is checked out",
                name
            )));
        }
        if self.undeletable.contains(name) || (!force && self.unmerged_for_git.contains(name)) {
            return Err(WtreeError::git_operation(format!(
                "branch '{}' is not fully merged",
                name
            )));
        }

        self.branches.borrow_mut().retain(|b| b.name != name);
        Ok(())
    }

    fn has_remote(&self, _repo: &Path, remote: &str) -> bool {
        self.remotes.contains(remote)
    }

    fn fetch(&self, _repo: &Path, remote: &str, _timeout: Duration) -> Result<FetchOutcome> {
        self.events.borrow_mut().push(VcsEvent::Fetch {
            remote: remote.to_string(),
        });
        Ok(self.fetch_result.clone().unwrap_or(FetchOutcome::Updated))
    }

    fn main_worktree(&self, _repo: &Path) -> Result<PathBuf> {
        Ok(self.main_path.clone())
    }
}
