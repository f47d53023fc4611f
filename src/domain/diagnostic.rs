// Diagnostic values produced by the hygiene checks.

use crate::domain::ast::Position;
use serde::Serialize;
use std::fmt;

/// Code reported for a long function without a docstring.
pub const LONG_FUNCTION_WITHOUT_DOCSTRING: &str = "L001";

/// One finding, printed as `path:line:col CODE message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub path: String,
    pub line: usize,
    pub column: usize,
    pub code: &'static str,
    pub message: String,
}

impl Diagnostic {
    pub fn new(path: &str, position: Position, code: &'static str, message: String) -> Self {
        Self {
            path: path.to_string(),
            line: position.line,
            column: position.column,
            code,
            message,
        }
    }

    /// L001 for a function measuring `loc` lines.
    pub fn long_function_without_docstring(path: &str, position: Position, loc: i64) -> Self {
        Self::new(
            path,
            position,
            LONG_FUNCTION_WITHOUT_DOCSTRING,
            format!("function with {} LoC lacks docstring", loc),
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} {} {}",
            self.path, self.line, self.column, self.code, self.message
        )
    }
}
