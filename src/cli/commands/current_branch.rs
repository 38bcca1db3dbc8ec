use crate::core::git::repository::current_branch_at;
use crate::utils::{Result, WtreeError};
use std::path::Path;

pub fn execute() -> Result<()> {
    let cwd = std::env::current_dir()?;
    println!("{}", branch_name(&cwd)?);
    Ok(())
}

/// Checked-out branch, or `HEAD` when detached.
pub fn branch_name(dir: &Path) -> Result<String> {
    match current_branch_at(dir) {
        Ok(Some(branch)) => Ok(branch),
        Ok(None) => Ok("HEAD".to_string()),
        Err(_) => Err(WtreeError::repo_state(format!(
            "Not a git repository: {}",
            dir.display()
        ))),
    }
}
