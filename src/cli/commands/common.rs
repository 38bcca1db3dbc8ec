use crate::cli::parser::RemovalFlags;
use crate::config::Config;
use crate::core::cleanup::CleanupOptions;
use crate::core::git::{GitRepository, GitService, VersionControl};
use crate::utils::{Result, WtreeError};
use std::path::{Path, PathBuf};

/// Repository that `cwd` belongs to, plus the root of its main working copy.
pub fn open_repository(cwd: &Path) -> Result<(GitRepository, PathBuf)> {
    let repo = GitRepository::discover_from(cwd)?;
    let main = GitService::new().main_worktree(&repo.root)?;
    Ok((repo, main))
}

/// Directory new worktrees go into: `worktrees_dir` from the configuration, or
/// `<repo-name>-worktrees` next to the main working copy.
pub fn worktrees_root(config: &Config, main_root: &Path) -> Result<PathBuf> {
    if let Some(ref dir) = config.worktrees_dir {
        let dir = Path::new(dir);
        return Ok(if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            main_root.join(dir)
        });
    }

    let parent = main_root.parent().ok_or_else(|| {
        WtreeError::repo_state(format!(
            "Repository at {} has no parent directory for worktrees",
            main_root.display()
        ))
    })?;
    let name = main_root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "repo".to_string());

    Ok(parent.join(format!("{}-worktrees", name)))
}

pub fn removal_options(flags: &RemovalFlags) -> CleanupOptions {
    CleanupOptions {
        dry_run: flags.dry_run,
        force: flags.force,
        delete_branch: !flags.no_delete_branch,
        skip_patterns: Vec::new(),
    }
}

/// The only line a directory-switching command writes to stdout.
pub fn print_path(path: &Path) {
    println!("{}", path.display());
}
