//! Error types for parsing Python sources.

use thiserror::Error;

/// A grammar violation, located at the first offending token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} ({filename}, line {line}, offset {offset})")]
pub struct SyntaxError {
    pub filename: String,
    pub message: String,
    /// 1-based line number.
    pub line: usize,
    /// 1-based byte offset within the line.
    pub offset: usize,
    /// The source line the error points into, if any.
    pub text: Option<String>,
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to load the Python grammar: {0}")]
    Grammar(String),

    #[error("parser produced no syntax tree for {0}")]
    NoTree(String),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}
