use crate::cli::parser::CleanBranchesArgs;
use crate::config::Config;
use crate::core::cleanup::branches::SkipPatterns;
use crate::core::cleanup::{CleanupOptions, CleanupOutcome, CleanupPolicy, SummaryReporter};
use crate::core::git::{GitRepository, GitService, VersionControl};
use crate::utils::Result;
use std::path::Path;

pub fn execute(config: &Config, args: CleanBranchesArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let vcs = GitService::new();
    let mut reporter = SummaryReporter::new(args.dry_run);
    clean_branches(&vcs, config, &args, &cwd, &mut reporter).map(|_| ())
}

pub fn clean_branches<V: VersionControl + ?Sized>(
    vcs: &V,
    config: &Config,
    args: &CleanBranchesArgs,
    cwd: &Path,
    reporter: &mut SummaryReporter,
) -> Result<CleanupOutcome> {
    let repo = GitRepository::discover_from(cwd)?;

    let options = CleanupOptions {
        dry_run: args.dry_run,
        force: args.force,
        delete_branch: true,
        skip_patterns: args.skip_patterns(&config.skip_patterns),
    };
    // bad patterns are a usage error, reported before any output
    SkipPatterns::compile(&options.skip_patterns)?;

    let mode = if options.dry_run { " (dry run)" } else { "" };
    println!("🧹 Cleaning merged branches in {}{}", repo.root.display(), mode);

    let result = CleanupPolicy::new(vcs, config, &options).clean_branches(&repo.root, reporter);
    let outcome = reporter.finish();
    result.map(|()| outcome)
}
