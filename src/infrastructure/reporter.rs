//! Diagnostic reporters.
//!
//! Writes diagnostics either as contract lines or as a JSON array.

use crate::domain::diagnostic::Diagnostic;
use crate::ports::DiagnosticReporter;
use std::io::{Result, Write};

/// One `path:line:col CODE message` line per diagnostic.
pub struct TextReporter;

impl DiagnosticReporter for TextReporter {
    fn report(&self, diagnostics: &[Diagnostic], out: &mut dyn Write) -> Result<()> {
        for diagnostic in diagnostics {
            writeln!(out, "{}", diagnostic)?;
        }
        Ok(())
    }
}

/// A pretty-printed JSON array, `[]` when nothing was found.
pub struct JsonReporter;

impl DiagnosticReporter for JsonReporter {
    fn report(&self, diagnostics: &[Diagnostic], out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, diagnostics)?;
        writeln!(out)
    }
}
