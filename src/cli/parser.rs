use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wtree")]
#[command(about = "Git worktree and branch housekeeping")]
#[command(
    version,
    long_about = "Creates, jumps between and safely cleans up git worktrees and local branches.\n\n\
Commands that switch directory print the target path as the only line on stdout, \
so they are meant to be wrapped: cd \"$(wtree jump foo)\""
)]
pub struct Cli {
    /// Enable debug logging (same as WTREE_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a worktree and print its path
    #[command(alias = "wadd")]
    Create(CreateArgs),
    /// Create a worktree from a pull request and print its path
    #[command(alias = "wpr")]
    Pr(PrArgs),
    /// Remove one worktree if its commits are merged upstream
    #[command(alias = "wrm")]
    Remove(RemoveArgs),
    /// Remove every merged worktree under a directory
    #[command(alias = "wclean")]
    Clean(CleanArgs),
    /// Delete local branches whose commits are merged upstream
    #[command(alias = "bclean")]
    CleanBranches(CleanBranchesArgs),
    /// Pick a worktree interactively and print its path
    #[command(alias = "wj")]
    Jump(JumpArgs),
    /// git diff without a pager
    Diff(PassthroughArgs),
    /// git show without a pager
    Show(PassthroughArgs),
    /// Print the current branch name
    Branch,
    /// Inspect configuration
    Config(ConfigArgs),
    /// Generate shell completion script
    Completion(CompletionArgs),
}

#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    wtree create feature-x
    wtree create spike experiment -- --lock
    cd \"$(wtree create feature-x)\"")]
pub struct CreateArgs {
    /// Worktree directory name
    pub name: String,

    /// Branch to check out (defaults to the worktree name, created if missing)
    pub branch: Option<String>,

    /// Extra arguments passed to `git worktree add`
    #[arg(last = true)]
    pub git_args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct PrArgs {
    /// Pull request number (a leading '#' is accepted)
    pub number: String,

    /// Worktree directory name (defaults to pr-<number>)
    pub name: Option<String>,

    /// Remote to fetch the pull request from
    #[arg(long)]
    pub remote: Option<String>,

    /// Only show what would be created
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RemovalFlags {
    /// Only show what would be removed
    #[arg(long)]
    pub dry_run: bool,

    /// Remove even when commits are not merged (never overrides a failed check)
    #[arg(long, short)]
    pub force: bool,

    /// Keep the local branch of removed worktrees
    #[arg(long)]
    pub no_delete_branch: bool,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Path of the worktree to remove
    pub path: PathBuf,

    #[command(flatten)]
    pub flags: RemovalFlags,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Directory whose immediate subdirectories are the candidate worktrees
    pub root: PathBuf,

    #[command(flatten)]
    pub flags: RemovalFlags,
}

#[derive(Args, Debug)]
pub struct CleanBranchesArgs {
    /// Only show what would be deleted
    #[arg(long)]
    pub dry_run: bool,

    /// Delete even when commits are not merged (never overrides a failed check)
    #[arg(long, short)]
    pub force: bool,

    /// Branch glob to leave alone (repeatable, comma-separated lists accepted)
    #[arg(long, value_name = "PATTERN")]
    pub skip: Vec<String>,
}

#[derive(Args, Debug)]
pub struct JumpArgs {
    /// Initial filter for the selector
    pub query: Option<String>,
}

#[derive(Args, Debug)]
pub struct PassthroughArgs {
    /// Arguments passed to git unchanged
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ConfigCommands {
    /// Show the effective configuration and where it came from
    Show,
    /// List configuration file locations in search order
    Path,
}

#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// Shell to generate completion for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CreateArgs {
    pub fn validate(&self) -> crate::utils::Result<()> {
        crate::utils::validate_worktree_name(&self.name)?;
        if let Some(ref branch) = self.branch {
            crate::core::git::GitValidator::validate_branch_name(branch)?;
        }
        Ok(())
    }
}

impl PrArgs {
    /// Parses the number and checks the optional name.
    pub fn validate(&self) -> crate::utils::Result<u64> {
        let number = crate::utils::parse_pr_number(&self.number)?;
        if let Some(ref name) = self.name {
            crate::utils::validate_worktree_name(name)?;
        }
        Ok(number)
    }
}

impl CleanBranchesArgs {
    /// Command-line patterns plus the configured ones.
    pub fn skip_patterns(&self, configured: &[String]) -> Vec<String> {
        configured.iter().chain(self.skip.iter()).cloned().collect()
    }
}
