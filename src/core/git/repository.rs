use crate::utils::error::{Result, WtreeError};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// A repository located from some directory inside it.
#[derive(Debug, Clone)]
pub struct GitRepository {
    /// Top level of the working copy the lookup started from (may be a linked worktree).
    pub root: PathBuf,
    pub git_dir: PathBuf,
}

impl GitRepository {
    pub fn discover_from(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(WtreeError::not_found(path.display().to_string()));
        }

        let root = run_git(path, &["rev-parse", "--show-toplevel"])
            .map_err(|_| WtreeError::not_a_repository(path.display().to_string()))?;
        let root = PathBuf::from(root);

        let git_dir = run_git(&root, &["rev-parse", "--absolute-git-dir"])?;

        Ok(Self {
            root,
            git_dir: PathBuf::from(git_dir),
        })
    }

    pub fn get_current_branch(&self) -> Result<Option<String>> {
        current_branch_at(&self.root)
    }
}

/// Branch checked out at `dir`, or `None` on a detached HEAD.
pub fn current_branch_at(dir: &Path) -> Result<Option<String>> {
    if let Ok(branch) = run_git(dir, &["symbolic-ref", "--quiet", "--short", "HEAD"]) {
        return Ok(Some(branch));
    }

    // symbolic-ref fails both on detached HEAD and outside a repository
    run_git(dir, &["rev-parse", "--git-dir"])
        .map_err(|_| WtreeError::not_a_repository(dir.display().to_string()))?;
    Ok(None)
}

/// Runs git in `dir` and returns trimmed stdout. Non-zero exit is an error carrying stderr.
pub fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    tracing::debug!(dir = %dir.display(), args = ?args, "git");

    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| WtreeError::git_operation(format!("Failed to execute git: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!(status = ?output.status.code(), stderr = %stderr.trim(), "git failed");
        return Err(WtreeError::git_operation(format!(
            "git {} failed: {}",
            args.join(" "),
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.trim().to_string())
}

/// Like [`run_git`] but only reports success.
pub fn run_git_with_status(dir: &Path, args: &[&str]) -> Result<()> {
    run_git(dir, args).map(|_| ())
}

/// Runs git with inherited stdio and hands back its exit status untouched.
pub fn run_git_passthrough(dir: &Path, args: &[String]) -> Result<ExitStatus> {
    tracing::debug!(dir = %dir.display(), args = ?args, "git (passthrough)");

    Command::new("git")
        .current_dir(dir)
        .args(args)
        .status()
        .map_err(|e| WtreeError::git_operation(format!("Failed to execute git: {}", e)))
}
