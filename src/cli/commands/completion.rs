use crate::cli::parser::{Cli, CompletionArgs};
use crate::utils::{Result, WtreeError};
use clap::CommandFactory;
use clap_complete::Shell;

pub fn execute(args: CompletionArgs) -> Result<()> {
    print!("{}", generate_completion(args.shell)?);
    Ok(())
}

pub fn generate_completion(shell: Shell) -> Result<String> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "wtree", &mut buf);

    String::from_utf8(buf).map_err(|e| {
        WtreeError::invalid_args(format!("UTF-8 error generating completion: {}", e))
    })
}
