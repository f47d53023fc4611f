//! Use cases behind the two command-line tools.

use crate::domain::ast::AstNode;
use crate::domain::diagnostic::Diagnostic;
use crate::domain::error::{ParseError, SyntaxError};
use crate::domain::function_length::FunctionLengthChecker;
use crate::infrastructure::SourceLoader;
use crate::ports::{AstParser, DiagnosticReporter};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Process exit statuses shared by the binaries.
pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

// ═══════════════════════════════════════════════════════════════════════════
// Long functions without docstrings
// ═══════════════════════════════════════════════════════════════════════════

pub struct CheckDocstringsUsecase<'a> {
    pub parser: &'a dyn AstParser,
    pub reporter: &'a dyn DiagnosticReporter,
}

impl<'a> CheckDocstringsUsecase<'a> {
    /// Parse `source` and return one diagnostic per offending function.
    pub fn check_source(&self, source: &str, filename: &str, max_loc: i64) -> Result<Vec<Diagnostic>> {
        let root = self
            .parser
            .parse(source, filename)
            .with_context(|| format!("Failed to parse {}", filename))?;
        Ok(FunctionLengthChecker::new(max_loc).check(filename, &root))
    }

    /// Check the file at `path`, write the report to `out` and return the diagnostics.
    pub fn run(&self, max_loc: i64, path: &Path, out: &mut dyn Write) -> Result<Vec<Diagnostic>> {
        let source = SourceLoader::load(path)?;
        let filename = path.to_string_lossy();
        let diagnostics = self.check_source(&source, &filename, max_loc)?;
        log::info!("{}: {} function(s) reported", filename, diagnostics.len());

        self.reporter
            .report(&diagnostics, out)
            .context("Failed to write report")?;
        Ok(diagnostics)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Syntax validation
// ═══════════════════════════════════════════════════════════════════════════

/// Outcome of a parse attempt.
#[derive(Debug)]
pub enum Validation {
    Valid(AstNode),
    Invalid(SyntaxError),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }
}

pub struct ValidateSyntaxUsecase<'a> {
    pub parser: &'a dyn AstParser,
}

impl<'a> ValidateSyntaxUsecase<'a> {
    /// Try to parse `source`. Only grammar violations become [`Validation::Invalid`];
    /// a parser that cannot run at all is an error.
    pub fn test_source_code(&self, source: &str, filename: &str) -> Result<Validation> {
        match self.parser.parse(source, filename) {
            Ok(tree) => Ok(Validation::Valid(tree)),
            Err(ParseError::Syntax(err)) => Ok(Validation::Invalid(err)),
            Err(other) => Err(other.into()),
        }
    }

    /// Print the runtime line and the verdict for `path`, returning the exit status.
    pub fn run(&self, path: &Path, out: &mut dyn Write) -> Result<u8> {
        writeln!(out, "Running on top of {}", self.parser.runtime())?;

        let source = SourceLoader::load(path)?;
        let validation = self.test_source_code(&source, &path.to_string_lossy())?;
        match validation {
            Validation::Valid(_) => {
                writeln!(out, "File looks good.")?;
                Ok(EXIT_OK)
            }
            Validation::Invalid(err) => {
                writeln!(out, "Failure:\n{}", err)?;
                Ok(EXIT_FAILURE)
            }
        }
    }
}
