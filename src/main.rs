//! pycheck CLI entry point.

use clap::error::ErrorKind;
use clap::Parser;
use pycheck::cli::{self, Cli, EXIT_USAGE};

fn main() {
    // Usage errors, including a missing path argument, exit 1.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            std::process::exit(cli::EXIT_SUCCESS);
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(EXIT_USAGE);
        }
    };

    let exit_code = match cli::run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("pycheck: {}", e);
            EXIT_USAGE
        }
    };

    std::process::exit(exit_code);
}
