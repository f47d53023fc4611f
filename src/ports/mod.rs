use crate::domain::ast::AstNode;
use crate::domain::diagnostic::Diagnostic;
use crate::domain::error::ParseError;
use std::io::Write;

pub trait AstParser {
    /// Parse `source` into a tree rooted at the module node.
    /// `filename` is only used to label syntax errors.
    fn parse(&self, source: &str, filename: &str) -> Result<AstNode, ParseError>;

    /// Human-readable name and version of the parsing backend.
    fn runtime(&self) -> String;
}

pub trait DiagnosticReporter {
    fn report(&self, diagnostics: &[Diagnostic], out: &mut dyn Write) -> std::io::Result<()>;
}
