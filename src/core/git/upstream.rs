use super::VersionControl;
use std::path::Path;

/// Branch a line of work is compared against, split into its remote and branch parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamContext {
    /// Full `<remote>/<branch>` form.
    pub branch_ref: String,
    pub remote_name: String,
    /// May itself contain `/`, e.g. `release/1.0`.
    pub branch_name: String,
    /// True when the repository had no tracking branch and the default was used.
    pub is_fallback: bool,
}

impl UpstreamContext {
    /// Splits on the first `/` only. A ref without `/` is treated as a local branch
    /// with an empty remote name.
    pub fn parse(branch_ref: &str, is_fallback: bool) -> Self {
        let (remote_name, branch_name) = match branch_ref.split_once('/') {
            Some((remote, branch)) => (remote.to_string(), branch.to_string()),
            None => (String::new(), branch_ref.to_string()),
        };

        Self {
            branch_ref: branch_ref.to_string(),
            remote_name,
            branch_name,
            is_fallback,
        }
    }
}

/// Resolves the upstream of whatever is checked out at `repo`, falling back to
/// `default_upstream` when nothing is configured. Never fails.
pub fn resolve<V: VersionControl + ?Sized>(
    vcs: &V,
    repo: &Path,
    default_upstream: &str,
) -> UpstreamContext {
    match vcs.upstream_of(repo) {
        Ok(branch_ref) if !branch_ref.is_empty() => UpstreamContext::parse(&branch_ref, false),
        Ok(_) | Err(_) => {
            tracing::debug!(
                repo = %repo.display(),
                fallback = default_upstream,
                "no tracking branch configured, using default upstream"
            );
            UpstreamContext::parse(default_upstream, true)
        }
    }
}
