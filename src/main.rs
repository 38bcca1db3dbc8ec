use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wtree::cli::{execute_command, Cli};
use wtree::utils::interrupt;

const LOG_ENV_VAR: &str = "WTREE_LOG";

fn main() {
    // help and version print and exit 0; every other parse error is a usage error
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_logging(cli.verbose);

    if let Err(e) = interrupt::install_handler() {
        tracing::warn!(error = %e, "continuing without interrupt handling");
    }

    match execute_command(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("wtree: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
