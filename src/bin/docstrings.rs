// Command-line entry point for the long-function docstring check.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use pyhygiene::application::{CheckDocstringsUsecase, EXIT_FAILURE};
use pyhygiene::infrastructure::{init_logging, JsonReporter, TextReporter, TreeSitterPythonParser};
use pyhygiene::ports::DiagnosticReporter;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "pyhygiene-docstrings",
    author,
    version,
    about = "Report long Python functions that lack a docstring"
)]
struct Cli {
    /// Functions spanning more lines than this need a docstring
    #[arg(allow_negative_numbers = true)]
    max_loc: i64,

    /// Python source file to check
    filename: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Exit with status 1 when any function is reported
    #[arg(long)]
    strict: bool,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("[WARN] Cannot initialise logging: {}", e);
    }

    let reporter: &dyn DiagnosticReporter = match cli.format {
        Format::Text => &TextReporter,
        Format::Json => &JsonReporter,
    };
    let usecase = CheckDocstringsUsecase {
        parser: &TreeSitterPythonParser,
        reporter,
    };

    let mut out = io::stdout().lock();
    let diagnostics = usecase.run(cli.max_loc, &cli.filename, &mut out)?;

    if cli.strict && !diagnostics.is_empty() {
        return Ok(ExitCode::from(EXIT_FAILURE));
    }
    Ok(ExitCode::SUCCESS)
}
