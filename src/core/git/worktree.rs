use super::repository::{run_git, run_git_with_status};
use crate::utils::error::{Result, WtreeError};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct WorktreeInfo {
    pub path: PathBuf,
    pub commit: String,
    /// `None` for a detached HEAD or a bare entry.
    pub branch: Option<String>,
    pub is_bare: bool,
    /// The primary working copy is always listed first by git.
    pub is_main: bool,
}

pub fn list_worktrees(repo: &Path) -> Result<Vec<WorktreeInfo>> {
    let output = run_git(repo, &["worktree", "list", "--porcelain"])?;
    Ok(parse_worktree_output(&output))
}

/// Creates a worktree at `path`. Extra args go straight to `git worktree add`.
pub fn add_worktree(
    repo: &Path,
    path: &Path,
    branch: &str,
    create_branch: bool,
    extra_args: &[String],
) -> Result<()> {
    if path.exists() {
        return Err(WtreeError::invalid_args(format!(
            "Worktree path already exists: {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|_| WtreeError::directory_access(parent.display().to_string()))?;
    }

    let path_str = path.to_string_lossy().to_string();
    let mut args: Vec<&str> = vec!["worktree", "add"];
    args.extend(extra_args.iter().map(String::as_str));
    if create_branch {
        args.extend(["-b", branch, path_str.as_str()]);
    } else {
        args.extend([path_str.as_str(), branch]);
    }

    run_git_with_status(repo, &args)
}

pub fn remove_worktree(repo: &Path, worktree: &Path, force: bool) -> Result<()> {
    let path_str = worktree.to_string_lossy();
    let mut args = vec!["worktree", "remove"];
    if force {
        args.push("--force");
    }
    args.push(&path_str);

    run_git_with_status(repo, &args)
}

fn parse_worktree_output(output: &str) -> Vec<WorktreeInfo> {
    let mut worktrees = Vec::new();

    for block in output.split("\n\n") {
        let lines: Vec<&str> = block
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.is_empty() {
            continue;
        }

        match parse_worktree_block(&lines) {
            Ok(mut worktree) => {
                worktree.is_main = worktrees.is_empty();
                worktrees.push(worktree);
            }
            Err(e) => tracing::debug!(error = %e, "skipping unparsable worktree block"),
        }
    }

    worktrees
}

fn parse_worktree_block(lines: &[&str]) -> Result<WorktreeInfo> {
    let first_line = lines[0];
    let path_str = first_line.strip_prefix("worktree ").ok_or_else(|| {
        WtreeError::git_operation(format!("Invalid worktree block: {}", first_line))
    })?;

    let mut worktree = WorktreeInfo {
        path: PathBuf::from(path_str),
        commit: String::new(),
        branch: None,
        is_bare: false,
        is_main: false,
    };

    for &line in &lines[1..] {
        if let Some(commit) = line.strip_prefix("HEAD ") {
            worktree.commit = commit.to_string();
        } else if let Some(branch) = line.strip_prefix("branch ") {
            let branch_name = branch.strip_prefix("refs/heads/").unwrap_or(branch);
            worktree.branch = Some(branch_name.to_string());
        } else if line == "bare" {
            worktree.is_bare = true;
        }
    }

    Ok(worktree)
}
