use super::common::print_path;
use crate::cli::parser::JumpArgs;
use crate::core::cleanup::inventory::registry_worktrees;
use crate::core::git::{GitRepository, GitService, WorktreeInfo};
use crate::utils::{interrupt, Result, WtreeError};
use dialoguer::{theme::ColorfulTheme, FuzzySelect};
use std::io::IsTerminal;

pub fn execute(args: JumpArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let repo = GitRepository::discover_from(&cwd)?;
    let worktrees = registry_worktrees(&GitService::new(), &repo.root)?;

    if worktrees.is_empty() {
        return Err(WtreeError::nothing_selected("No linked worktrees to jump to"));
    }

    if !std::io::stdin().is_terminal() || !std::io::stderr().is_terminal() {
        return Err(WtreeError::selector_unavailable(
            "jump needs an interactive terminal",
        ));
    }

    let items: Vec<String> = worktrees.iter().map(selector_label).collect();
    let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Jump to worktree")
        .with_initial_text(args.query.unwrap_or_default())
        .items(&items)
        .default(0)
        .interact_opt();
    // Ctrl-C inside the picker surfaces as a prompt error; report it as the interrupt
    interrupt::check(interrupt::is_interrupted)?;
    let selection = selection.map_err(|e| WtreeError::selector_unavailable(e.to_string()))?;

    let index = selection.ok_or_else(|| WtreeError::nothing_selected("No worktree selected"))?;
    let chosen = worktrees
        .get(index)
        .ok_or_else(|| WtreeError::nothing_selected(format!("Invalid selection: {}", index)))?;

    print_path(&chosen.path);
    Ok(())
}

fn selector_label(worktree: &WorktreeInfo) -> String {
    let branch = worktree.branch.as_deref().unwrap_or("(detached)");
    format!("{:<30} {}", branch, worktree.path.display())
}
