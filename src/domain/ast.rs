// AST data structures for pyhygiene.
// These types represent parsed Python code in a form suitable for the hygiene checks.

use std::fmt;

/// Start position of a node. Lines are 1-based, columns are 0-based byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A node in the abstract syntax tree.
///
/// `body` is `Some` for container nodes (module, definitions, compound
/// statements) and `None` for leaves. Only the primary block of a compound
/// statement is its body: `elif`/`else` branches, exception handlers and
/// `finally` blocks are not part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: AstNodeKind,
    pub name: Option<String>,
    pub position: Position,
    /// Leading documentation string, already decoded and trimmed.
    pub docstring: Option<String>,
    pub body: Option<Vec<AstNode>>,
}

/// Supported AST node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstNodeKind {
    Module,
    Function,
    AsyncFunction,
    Class,
    If,
    For,
    While,
    With,
    Try,
    Match,
    Expression,
    Statement,
}

impl AstNodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            AstNodeKind::Module => "module",
            AstNodeKind::Function => "function",
            AstNodeKind::AsyncFunction => "async function",
            AstNodeKind::Class => "class",
            AstNodeKind::If => "if",
            AstNodeKind::For => "for",
            AstNodeKind::While => "while",
            AstNodeKind::With => "with",
            AstNodeKind::Try => "try",
            AstNodeKind::Match => "match",
            AstNodeKind::Expression => "expression",
            AstNodeKind::Statement => "statement",
        }
    }
}

impl AstNode {
    pub fn leaf(kind: AstNodeKind, position: Position) -> Self {
        Self {
            kind,
            name: None,
            position,
            docstring: None,
            body: None,
        }
    }

    pub fn container(kind: AstNodeKind, position: Position, body: Vec<AstNode>) -> Self {
        Self {
            kind,
            name: None,
            position,
            docstring: None,
            body: Some(body),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_docstring(mut self, docstring: Option<String>) -> Self {
        self.docstring = docstring;
        self
    }

    /// Children of a container node, `None` for leaves.
    pub fn body(&self) -> Option<&[AstNode]> {
        self.body.as_deref()
    }

    pub fn is_function(&self) -> bool {
        self.kind == AstNodeKind::Function
    }

    /// True when a non-blank docstring is present.
    pub fn has_docstring(&self) -> bool {
        self.docstring.as_deref().is_some_and(|doc| !doc.trim().is_empty())
    }
}
