// Command-line entry point for the Python syntax validator.

use clap::Parser;
use pyhygiene::application::{ValidateSyntaxUsecase, EXIT_FAILURE, EXIT_USAGE};
use pyhygiene::infrastructure::{init_logging, TreeSitterPythonParser};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "pyhygiene-syntax",
    author,
    version,
    about = "Check that a file is syntactically valid Python 3"
)]
struct Cli {
    /// Python source file to validate
    filename: PathBuf,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    // Usage errors go to stdout with status 2, before any parse attempt.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            print!("{}", err.render());
            return ExitCode::from(EXIT_USAGE);
        }
        Err(err) => err.exit(),
    };

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("[WARN] Cannot initialise logging: {}", e);
    }

    let usecase = ValidateSyntaxUsecase {
        parser: &TreeSitterPythonParser,
    };
    let mut out = io::stdout().lock();

    match usecase.run(&cli.filename, &mut out) {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
