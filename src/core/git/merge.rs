use super::repository::run_git;
use super::{UpstreamContext, VersionControl};
use crate::utils::error::{Result, WtreeError};
use std::path::Path;

/// Outcome of the reachability check. `CheckFailed` must always be treated as
/// "keep"; it is never escalated by `--force`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeDecision {
    Merged,
    NotMerged { ahead: u64 },
    CheckFailed { reason: String },
}

impl MergeDecision {
    pub fn is_merged(&self) -> bool {
        matches!(self, MergeDecision::Merged)
    }
}

pub fn count_commits_not_in(repo: &Path, commit: &str, upstream: &str) -> Result<u64> {
    let range = format!("{}..{}", upstream, commit);
    let output = run_git(repo, &["rev-list", "--count", &range, "--"])?;
    output.trim().parse::<u64>().map_err(|e| {
        WtreeError::git_operation(format!("Unexpected rev-list output '{}': {}", output, e))
    })
}

/// Is every commit reachable from `head_commit` also reachable from `upstream_ref`?
pub fn is_merged<V: VersionControl + ?Sized>(
    vcs: &V,
    repo: &Path,
    head_commit: &str,
    upstream_ref: &str,
) -> MergeDecision {
    match vcs.count_commits_not_in(repo, head_commit, upstream_ref) {
        Ok(0) => MergeDecision::Merged,
        Ok(ahead) => MergeDecision::NotMerged { ahead },
        Err(e) => MergeDecision::CheckFailed {
            reason: e.to_string(),
        },
    }
}

/// Picks the ref to compare against: the remote-tracking ref when it exists,
/// otherwise the local branch of the same name.
pub fn comparison_ref<V: VersionControl + ?Sized>(
    vcs: &V,
    repo: &Path,
    upstream: &UpstreamContext,
) -> Option<String> {
    if vcs.resolves_to_commit(repo, &upstream.branch_ref) {
        return Some(upstream.branch_ref.clone());
    }

    if !upstream.remote_name.is_empty() && vcs.resolves_to_commit(repo, &upstream.branch_name) {
        tracing::debug!(
            missing = %upstream.branch_ref,
            using = %upstream.branch_name,
            "remote-tracking ref missing, comparing against local branch"
        );
        return Some(upstream.branch_name.clone());
    }

    None
}

pub fn check_against_upstream<V: VersionControl + ?Sized>(
    vcs: &V,
    repo: &Path,
    head_commit: &str,
    upstream: &UpstreamContext,
) -> MergeDecision {
    match comparison_ref(vcs, repo, upstream) {
        Some(reference) => is_merged(vcs, repo, head_commit, &reference),
        None => MergeDecision::CheckFailed {
            reason: format!(
                "neither '{}' nor '{}' resolves to a commit",
                upstream.branch_ref, upstream.branch_name
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::git::GitService;
    use crate::test_utils::test_helpers::*;
    use crate::test_utils::FakeVcs;
    use std::path::PathBuf;

    #[test]
    fn test_tip_of_upstream_is_merged() {
        let (_temp_dir, repo_path) = setup_test_repo();
        let service = GitService::new();
        let head = service.head_commit(&repo_path).unwrap();

        assert_eq!(
            is_merged(&service, &repo_path, &head, "main"),
            MergeDecision::Merged
        );
    }

    #[test]
    fn test_commit_ahead_is_not_merged() {
        let (_temp_dir, repo_path) = setup_test_repo();
        git(&repo_path, &["checkout", "-b", "wip"]);
        commit_file(&repo_path, "wip.txt", "wip", "wip work");
        let service = GitService::new();
        let head = service.head_commit(&repo_path).unwrap();

        assert_eq!(
            is_merged(&service, &repo_path, &head, "main"),
            MergeDecision::NotMerged { ahead: 1 }
        );
    }

    #[test]
    fn test_ancestor_of_upstream_is_merged() {
        let (_temp_dir, repo_path) = setup_test_repo();
        let service = GitService::new();
        let old_head = service.head_commit(&repo_path).unwrap();
        commit_file(&repo_path, "more.txt", "more", "advance main");

        assert!(is_merged(&service, &repo_path, &old_head, "main").is_merged());
    }

    #[test]
    fn test_invalid_ref_fails_closed() {
        let (_temp_dir, repo_path) = setup_test_repo();
        let service = GitService::new();
        let head = service.head_commit(&repo_path).unwrap();

        let decision = is_merged(&service, &repo_path, &head, "origin/does-not-exist");
        assert!(matches!(decision, MergeDecision::CheckFailed { .. }));

        let decision = is_merged(&service, &repo_path, "0000000000", "main");
        assert!(matches!(decision, MergeDecision::CheckFailed { .. }));
    }

    #[test]
    fn test_comparison_ref_prefers_remote_tracking_ref() {
        let repo = PathBuf::from("/repo");
        let fake = FakeVcs::new()
            .with_ref("origin/main")
            .with_ref("main");
        let upstream = UpstreamContext::parse("origin/main", true);

        assert_eq!(
            comparison_ref(&fake, &repo, &upstream).as_deref(),
            Some("origin/main")
        );
    }

    #[test]
    fn test_comparison_ref_falls_back_to_local_branch() {
        let repo = PathBuf::from("/repo");
        let fake = FakeVcs::new().with_ref("main");
        let upstream = UpstreamContext::parse("origin/main", true);

        assert_eq!(
            comparison_ref(&fake, &repo, &upstream).as_deref(),
            Some("main")
        );
    }

    #[test]
    fn test_check_against_missing_upstream_fails_closed() {
        let repo = PathBuf::from("/repo");
        let fake = FakeVcs::new();
        let upstream = UpstreamContext::parse("origin/main", true);

        let decision = check_against_upstream(&fake, &repo, "abc", &upstream);
        assert!(matches!(decision, MergeDecision::CheckFailed { .. }));
    }
}
