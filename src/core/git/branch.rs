use super::repository::{run_git, run_git_with_status};
use crate::utils::error::Result;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct BranchInfo {
    pub name: String,
    pub commit: String,
}

pub fn list_branches(repo: &Path) -> Result<Vec<BranchInfo>> {
    let output = run_git(
        repo,
        &[
            "for-each-ref",
            "--format=%(objectname) %(refname:short)",
            "refs/heads",
        ],
    )?;

    Ok(output.lines().filter_map(parse_branch_line).collect())
}

fn parse_branch_line(line: &str) -> Option<BranchInfo> {
    let (commit, name) = line.trim().split_once(' ')?;
    if commit.is_empty() || name.is_empty() {
        return None;
    }
    Some(BranchInfo {
        name: name.to_string(),
        commit: commit.to_string(),
    })
}

pub fn branch_exists(repo: &Path, name: &str) -> bool {
    run_git(
        repo,
        &["rev-parse", "--verify", "--quiet", &format!("refs/heads/{}", name)],
    )
    .is_ok()
}

/// `-d` lets git refuse unmerged branches; `-D` deletes regardless.
pub fn delete_branch(repo: &Path, name: &str, force: bool) -> Result<()> {
    let flag = if force { "-D" } else { "-d" };
    run_git_with_status(repo, &["branch", flag, name])
}

/// Tracking branch of the current HEAD, e.g. `origin/main`.
pub fn upstream_of(repo: &Path) -> Result<String> {
    run_git(
        repo,
        &[
            "rev-parse",
            "--abbrev-ref",
            "--symbolic-full-name",
            "@{upstream}",
        ],
    )
}

pub fn resolves_to_commit(repo: &Path, rev: &str) -> bool {
    run_git(
        repo,
        &["rev-parse", "--verify", "--quiet", &format!("{}^{{commit}}", rev)],
    )
    .is_ok()
}

pub fn head_commit(repo: &Path) -> Result<String> {
    run_git(repo, &["rev-parse", "HEAD"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::*;

    #[test]
    fn test_parse_branch_line() {
        let info = parse_branch_line("abc123 feature/login").unwrap();
        assert_eq!(info.name, "feature/login");
        assert_eq!(info.commit, "abc123");
        assert!(parse_branch_line("").is_none());
        assert!(parse_branch_line("abc123").is_none());
    }

    #[test]
    fn test_list_and_delete_branches() {
        let (_temp_dir, repo_path) = setup_test_repo();
        git(&repo_path, &["branch", "topic"]);

        let branches = list_branches(&repo_path).unwrap();
        let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
        assert!(names.contains(&"main"));
        assert!(names.contains(&"topic"));
        assert!(branch_exists(&repo_path, "topic"));

        delete_branch(&repo_path, "topic", false).unwrap();
        assert!(!branch_exists(&repo_path, "topic"));
    }

    #[test]
    fn test_safe_delete_refuses_unmerged_branch() {
        let (_temp_dir, repo_path) = setup_test_repo();
        git(&repo_path, &["checkout", "-b", "wip"]);
        commit_file(&repo_path, "wip.txt", "wip", "wip work");
        git(&repo_path, &["checkout", "main"]);

        assert!(delete_branch(&repo_path, "wip", false).is_err());
        assert!(branch_exists(&repo_path, "wip"));

        delete_branch(&repo_path, "wip", true).unwrap();
        assert!(!branch_exists(&repo_path, "wip"));
    }

    #[test]
    fn test_upstream_of_without_tracking_fails() {
        let (_temp_dir, repo_path) = setup_test_repo();
        assert!(upstream_of(&repo_path).is_err());
    }

    #[test]
    fn test_resolves_to_commit() {
        let (_temp_dir, repo_path) = setup_test_repo();
        assert!(resolves_to_commit(&repo_path, "main"));
        assert!(resolves_to_commit(&repo_path, &head_commit(&repo_path).unwrap()));
        assert!(!resolves_to_commit(&repo_path, "origin/main"));
    }
}
