//! Python parser adapter backed by tree-sitter.
//!
//! Lowers the concrete syntax tree into [`AstNode`]s with the same body
//! relation as Python's `ast` module. Recovery nodes and the Python 2 forms
//! the grammar still accepts become a [`SyntaxError`].

use crate::domain::ast::{AstNode, AstNodeKind, Position};
use crate::domain::error::{ParseError, SyntaxError};
use crate::infrastructure::syntax_rules::first_violation;
use crate::ports::AstParser;
use std::iter::Peekable;
use std::str::Chars;
use tree_sitter::{Node, Parser};

pub struct TreeSitterPythonParser;

impl AstParser for TreeSitterPythonParser {
    fn parse(&self, source: &str, filename: &str) -> Result<AstNode, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| ParseError::Grammar(e.to_string()))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::NoTree(filename.to_string()))?;
        let root = tree.root_node();

        if let Some(err) = first_syntax_error(root, source, filename) {
            log::debug!("{}: syntax error at {}:{}", filename, err.line, err.offset);
            return Err(err.into());
        }

        let module = Lowering::new(source).module(root);
        log::debug!(
            "{}: parsed {} top-level statements",
            filename,
            module.body().map_or(0, |body| body.len())
        );
        Ok(module)
    }

    fn runtime(&self) -> String {
        format!(
            "pyhygiene {} (tree-sitter ABI {}, Python 3 grammar)",
            env!("CARGO_PKG_VERSION"),
            tree_sitter::LANGUAGE_VERSION
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Syntax errors
// ═══════════════════════════════════════════════════════════════════════════

/// Maps the earliest rejected construct to a located [`SyntaxError`].
fn first_syntax_error(root: Node, source: &str, filename: &str) -> Option<SyntaxError> {
    let violation = first_violation(root, source)?;
    Some(SyntaxError {
        filename: filename.to_string(),
        message: violation.message,
        line: violation.row + 1,
        offset: violation.column + 1,
        text: source.lines().nth(violation.row).map(str::to_string),
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Lowering
// ═══════════════════════════════════════════════════════════════════════════

struct Lowering<'s> {
    source: &'s [u8],
}

impl<'s> Lowering<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source: source.as_bytes(),
        }
    }

    fn module(&self, root: Node) -> AstNode {
        let (body, docstring) = self.block(root);
        AstNode::container(AstNodeKind::Module, Position::new(1, 0), body).with_docstring(docstring)
    }

    /// Lowers the statements of a block (or the module) and extracts its docstring.
    fn block(&self, block: Node) -> (Vec<AstNode>, Option<String>) {
        let statements = named_statements(block);
        let docstring = statements.first().and_then(|first| self.docstring(*first));
        let body = statements.into_iter().map(|stmt| self.statement(stmt)).collect();
        (body, docstring)
    }

    fn statement(&self, node: Node) -> AstNode {
        match node.kind() {
            "decorated_definition" => match node.child_by_field_name("definition") {
                Some(definition) => self.statement(definition),
                None => AstNode::leaf(AstNodeKind::Statement, position(node)),
            },
            "function_definition" => {
                let kind = if is_async(node) {
                    AstNodeKind::AsyncFunction
                } else {
                    AstNodeKind::Function
                };
                self.definition(node, kind)
            }
            "class_definition" => self.definition(node, AstNodeKind::Class),
            "if_statement" => self.compound(node, AstNodeKind::If, "consequence"),
            "for_statement" => self.compound(node, AstNodeKind::For, "body"),
            "while_statement" => self.compound(node, AstNodeKind::While, "body"),
            "with_statement" => self.compound(node, AstNodeKind::With, "body"),
            "try_statement" => self.compound(node, AstNodeKind::Try, "body"),
            // `ast.Match` keeps its blocks under `cases`, so it has no body.
            "match_statement" => AstNode::leaf(AstNodeKind::Match, position(node)),
            "expression_statement" => AstNode::leaf(AstNodeKind::Expression, position(node)),
            _ => AstNode::leaf(AstNodeKind::Statement, position(node)),
        }
    }

    fn definition(&self, node: Node, kind: AstNodeKind) -> AstNode {
        let (body, docstring) = match node.child_by_field_name("body") {
            Some(block) => self.block(block),
            None => (Vec::new(), None),
        };
        let lowered = AstNode::container(kind, position(node), body).with_docstring(docstring);
        match node.child_by_field_name("name") {
            Some(name) => lowered.with_name(self.text(name)),
            None => lowered,
        }
    }

    fn compound(&self, node: Node, kind: AstNodeKind, field: &str) -> AstNode {
        let body = match node.child_by_field_name(field) {
            Some(block) => self.block(block).0,
            None => Vec::new(),
        };
        AstNode::container(kind, position(node), body)
    }

    /// The decoded docstring if `stmt` is a bare plain-string expression.
    fn docstring(&self, stmt: Node) -> Option<String> {
        if stmt.kind() != "expression_statement" {
            return None;
        }
        let mut expr = sole_named_child(stmt)?;
        while expr.kind() == "parenthesized_expression" {
            expr = sole_named_child(expr)?;
        }
        let text = match expr.kind() {
            "string" => decode_string_literal(self.text(expr))?,
            "concatenated_string" => {
                let mut joined = String::new();
                for part in named_statements(expr) {
                    joined.push_str(&decode_string_literal(self.text(part))?);
                }
                joined
            }
            _ => return None,
        };
        Some(text.trim_matches(is_python_space).to_string())
    }

    fn text(&self, node: Node) -> &'s str {
        node.utf8_text(self.source).unwrap_or("")
    }
}

fn position(node: Node) -> Position {
    let point = node.start_position();
    Position::new(point.row + 1, point.column)
}

fn is_async(node: Node) -> bool {
    let mut cursor = node.walk();
    let first = node.children(&mut cursor).next();
    first.is_some_and(|child| child.kind() == "async")
}

/// Named children without comments and other extras.
fn named_statements(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

fn sole_named_child(node: Node) -> Option<Node> {
    match named_statements(node).as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// String literals
// ═══════════════════════════════════════════════════════════════════════════

/// Decodes a plain string literal. Bytes, f-strings and t-strings yield `None`.
fn decode_string_literal(literal: &str) -> Option<String> {
    let quote_at = literal.find(['"', '\''])?;
    let (prefix, quoted) = literal.split_at(quote_at);
    let prefix = prefix.to_ascii_lowercase();
    if prefix.contains(['b', 'f', 't']) {
        return None;
    }

    let delimiter = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
        &quoted[..3]
    } else {
        &quoted[..1]
    };
    let inner = quoted
        .strip_prefix(delimiter)
        .and_then(|rest| rest.strip_suffix(delimiter))
        .unwrap_or("");

    if prefix.contains('r') {
        Some(inner.to_string())
    } else {
        Some(unescape(inner))
    }
}

/// Whitespace as `str.strip()` sees it.
fn is_python_space(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            out.push('\\');
            break;
        };
        let decoded = match escape {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            'f' => Some('\x0c'),
            'v' => Some('\x0b'),
            'a' => Some('\x07'),
            'b' => Some('\x08'),
            '\\' | '\'' | '"' => Some(escape),
            '\n' => continue,
            '\r' => {
                chars.next_if_eq(&'\n');
                continue;
            }
            'x' => hex_escape(&mut chars, 2),
            'u' => hex_escape(&mut chars, 4),
            'U' => hex_escape(&mut chars, 8),
            'N' => named_escape(&mut chars),
            '0'..='7' => {
                let mut value = escape.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|next| next.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                char::from_u32(value)
            }
            _ => None,
        };
        match decoded {
            Some(ch) => out.push(ch),
            // Unknown escapes are kept verbatim.
            None => {
                out.push('\\');
                out.push(escape);
            }
        }
    }
    out
}

/// Decodes exactly `digits` hex digits. Consumes nothing on a short or bad run.
fn hex_escape(chars: &mut Peekable<Chars>, digits: usize) -> Option<char> {
    let lookahead: String = chars.clone().take(digits).collect();
    if lookahead.len() != digits || !lookahead.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let ch = char::from_u32(u32::from_str_radix(&lookahead, 16).ok()?)?;
    for _ in 0..digits {
        chars.next();
    }
    Some(ch)
}

/// `\N{NAME}` for the whitespace characters a docstring could consist of.
fn named_escape(chars: &mut Peekable<Chars>) -> Option<char> {
    let mut ahead = chars.clone();
    if ahead.next() != Some('{') {
        return None;
    }
    let name: String = ahead.by_ref().take_while(|c| *c != '}').collect();
    let ch = match name.to_ascii_uppercase().as_str() {
        "SPACE" => ' ',
        "NO-BREAK SPACE" | "NBSP" => '\u{a0}',
        "CHARACTER TABULATION" | "HORIZONTAL TABULATION" | "TAB" => '\t',
        "LINE FEED" | "LF" | "NEW LINE" => '\n',
        "CARRIAGE RETURN" | "CR" => '\r',
        "FORM FEED" | "FF" => '\x0c',
        "LINE TABULATION" | "VERTICAL TABULATION" => '\x0b',
        "NEXT LINE" | "NEL" => '\u{85}',
        "EN SPACE" => '\u{2002}',
        "EM SPACE" => '\u{2003}',
        "THIN SPACE" => '\u{2009}',
        "IDEOGRAPHIC SPACE" => '\u{3000}',
        "LINE SEPARATOR" => '\u{2028}',
        "PARAGRAPH SEPARATOR" => '\u{2029}',
        _ => return None,
    };
    *chars = ahead;
    Some(ch)
}
