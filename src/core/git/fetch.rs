use crate::utils::error::{Result, WtreeError};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Updated,
    TimedOut,
    Failed(String),
}

/// Runs `git <args>` with a deadline. The child is killed when the deadline passes.
///
/// Only spawning problems are errors; a git failure or a timeout is reported
/// through [`FetchOutcome`] so callers can decide whether it matters.
pub fn run_with_timeout(dir: &Path, args: &[&str], timeout: Duration) -> Result<FetchOutcome> {
    tracing::debug!(dir = %dir.display(), args = ?args, timeout_secs = timeout.as_secs(), "git (bounded)");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let child = tokio::process::Command::new("git")
            .current_dir(dir)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| WtreeError::git_operation(format!("Failed to execute git: {}", e)))?;

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) if output.status.success() => Ok(FetchOutcome::Updated),
            Ok(Ok(output)) => Ok(FetchOutcome::Failed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            )),
            Ok(Err(e)) => Err(WtreeError::Io(e)),
            Err(_) => Ok(FetchOutcome::TimedOut),
        }
    })
}

pub fn fetch_remote(repo: &Path, remote: &str, timeout: Duration) -> Result<FetchOutcome> {
    run_with_timeout(repo, &["fetch", "--prune", "--quiet", remote], timeout)
}

/// Fetches `pull/<number>/head` from `remote` into local branch `branch`.
pub fn fetch_pull_request(
    repo: &Path,
    remote: &str,
    number: u64,
    branch: &str,
    timeout: Duration,
) -> Result<FetchOutcome> {
    let refspec = format!("pull/{}/head:{}", number, branch);
    run_with_timeout(repo, &["fetch", "--quiet", remote, &refspec], timeout)
}

pub fn has_remote(repo: &Path, remote: &str) -> bool {
    super::repository::run_git(repo, &["remote"])
        .map(|output| output.lines().any(|line| line.trim() == remote))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::*;

    #[test]
    fn test_fetch_from_local_remote() {
        let (temp_dir, repo_path) = setup_test_repo();
        let clone_path = temp_dir.path().join("clone");
        git(
            temp_dir.path(),
            &["clone", "--quiet", &repo_path.to_string_lossy(), "clone"],
        );

        assert!(has_remote(&clone_path, "origin"));
        assert!(!has_remote(&clone_path, "upstream"));

        let outcome = fetch_remote(&clone_path, "origin", Duration::from_secs(30)).unwrap();
        assert_eq!(outcome, FetchOutcome::Updated);
    }

    #[test]
    fn test_fetch_unknown_remote_fails_softly() {
        let (_temp_dir, repo_path) = setup_test_repo();
        let outcome = fetch_remote(&repo_path, "nowhere", Duration::from_secs(30)).unwrap();
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
    }
}
