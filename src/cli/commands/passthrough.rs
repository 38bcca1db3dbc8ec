use crate::cli::parser::PassthroughArgs;
use crate::core::git::repository::run_git_passthrough;
use crate::utils::Result;
use std::process::ExitStatus;

/// Runs `git --no-pager <subcommand> <args...>` and returns git's own exit code.
pub fn execute(subcommand: &str, args: PassthroughArgs) -> Result<i32> {
    let cwd = std::env::current_dir()?;
    let status = run_git_passthrough(&cwd, &git_args(subcommand, args.args))?;
    Ok(exit_code(status))
}

fn git_args(subcommand: &str, args: Vec<String>) -> Vec<String> {
    let mut git_args = vec!["--no-pager".to_string(), subcommand.to_string()];
    git_args.extend(args);
    git_args
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::*;

    #[test]
    fn test_git_args_disable_pager() {
        let args = git_args("diff", vec!["--stat".to_string(), "HEAD~1".to_string()]);
        assert_eq!(args, vec!["--no-pager", "diff", "--stat", "HEAD~1"]);
    }

    #[test]
    fn test_exit_code_propagates() {
        let (_temp_dir, repo_path) = setup_test_repo();

        let ok = run_git_passthrough(&repo_path, &git_args("show", vec!["--quiet".to_string()]))
            .unwrap();
        assert_eq!(exit_code(ok), 0);

        let bad = run_git_passthrough(
            &repo_path,
            &git_args("show", vec!["no-such-revision".to_string()]),
        )
        .unwrap();
        assert_eq!(exit_code(bad), 128);
    }
}
