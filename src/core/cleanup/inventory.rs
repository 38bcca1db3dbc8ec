use crate::core::git::{VersionControl, WorktreeInfo};
use crate::utils::error::{Result, WtreeError};
use std::path::{Path, PathBuf};

/// A `.git` entry is a file in a linked worktree and a directory in a normal
/// clone; both count, so this is an existence check only.
pub fn has_repository_marker(path: &Path) -> bool {
    path.join(".git").exists()
}

/// Immediate subdirectories of `root` that carry a repository marker, sorted by name.
pub fn scan_directory(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(root)
        .map_err(|_| WtreeError::directory_access(root.display().to_string()))?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && has_repository_marker(path))
        .collect();

    candidates.sort();
    Ok(candidates)
}

/// Linked worktrees from git's own registry, without the main or bare entry.
pub fn registry_worktrees<V: VersionControl + ?Sized>(
    vcs: &V,
    repo: &Path,
) -> Result<Vec<WorktreeInfo>> {
    Ok(vcs
        .list_worktrees(repo)?
        .into_iter()
        .filter(|w| !w.is_main && !w.is_bare)
        .collect())
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::git::GitService;
    use crate::test_utils::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_accepts_marker_file_and_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        let linked = root.join("linked");
        fs::create_dir(&linked).unwrap();
        fs::write(linked.join(".git"), "gitdir: /elsewhere").unwrap();

        let clone = root.join("clone");
        fs::create_dir_all(clone.join(".git")).unwrap();

        let plain = root.join("plain");
        fs::create_dir(&plain).unwrap();

        fs::write(root.join("stray-file"), "x").unwrap();

        let candidates = scan_directory(root).unwrap();
        assert_eq!(candidates, vec![clone, linked]);
    }

    #[test]
    fn test_scan_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let err = scan_directory(&temp_dir.path().join("missing")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_registry_excludes_main_working_copy() {
        let (temp_dir, repo_path) = setup_test_repo();
        let linked = temp_dir.path().join("linked");
        git(&repo_path, &["worktree", "add", "-b", "linked", &linked.to_string_lossy()]);

        let worktrees = registry_worktrees(&GitService::new(), &repo_path).unwrap();
        assert_eq!(worktrees.len(), 1);
        assert_eq!(worktrees[0].branch.as_deref(), Some("linked"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/a/b/feature")), "feature");
        assert_eq!(display_name(Path::new("/")), "/");
    }
}
