//! Python 3 rules the tree-sitter grammar does not enforce.
//!
//! The grammar accepts a superset of Python 3. It keeps Python 2 forms around
//! for error recovery, leaves argument and parameter order unchecked, and
//! compares indentation with tabs expanded to eight columns only. This module
//! walks the concrete tree and the raw source and reports the earliest
//! construct CPython would reject.

use tree_sitter::Node;

/// A rejected construct at a 0-based row and byte column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub row: usize,
    pub column: usize,
    pub message: String,
}

const INVALID_SYNTAX: &str = "invalid syntax";
const TAB_ERROR: &str = "inconsistent use of tabs and spaces in indentation";
const LEADING_ZEROS: &str =
    "leading zeros in decimal integer literals are not permitted; use an 0o prefix for octal integers";

/// String prefixes accepted by Python 3, lowercased.
const STRING_PREFIXES: [&str; 12] = ["", "r", "u", "f", "b", "t", "fr", "rf", "br", "rb", "tr", "rt"];

/// Nodes whose text is scanned as one token, including hidden sub-tokens.
const OPAQUE_TOKENS: [&str; 3] = ["string_content", "format_specifier", "comment"];

/// The earliest violation in document order, if any.
pub fn first_violation(root: Node, source: &str) -> Option<Violation> {
    let mut rules = SyntaxRules::new(source);
    rules.visit(root);
    rules.check_token_gaps(root);
    rules.check_block(root, None);
    if rules.violations.is_empty() && root.has_error() {
        rules.push(root, INVALID_SYNTAX);
    }
    rules.violations.into_iter().min_by_key(|v| (v.row, v.column))
}

struct SyntaxRules<'s> {
    source: &'s str,
    lines: Vec<&'s str>,
    violations: Vec<Violation>,
}

impl<'s> SyntaxRules<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            lines: source.split('\n').collect(),
            violations: Vec::new(),
        }
    }

    fn push(&mut self, node: Node, message: impl Into<String>) {
        let point = node.start_position();
        self.violations.push(Violation {
            row: point.row,
            column: point.column,
            message: message.into(),
        });
    }

    fn text(&self, node: Node) -> &'s str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    // ───────────────────────────────────────────────────────────────────────
    // Node rules
    // ───────────────────────────────────────────────────────────────────────

    fn visit(&mut self, node: Node) {
        if node.is_error() {
            self.push(node, INVALID_SYNTAX);
            return;
        }
        if node.is_missing() {
            self.push(node, format!("expected '{}'", node.kind()));
            return;
        }

        match node.kind() {
            "print_statement" => self.push(node, missing_parentheses("print")),
            "exec_statement" => self.push(node, missing_parentheses("exec")),
            "comparison_operator" => self.check_comparison(node),
            "except_clause" => self.check_except_clause(node),
            "integer" => self.check_integer(node),
            "string" => self.check_string_delimiters(node),
            "raise_statement" => self.check_raise(node),
            "parameters" | "lambda_parameters" => self.check_parameters(node),
            "argument_list" => self.check_arguments(node),
            "augmented_assignment" => self.check_augmented_target(node),
            "delete_statement" => {
                for target in named_children(node) {
                    self.check_delete_target(target);
                }
            }
            _ => {}
        }

        for child in children(node) {
            self.visit(child);
        }
    }

    /// `<>` is Python 2 only.
    fn check_comparison(&mut self, node: Node) {
        for operator in children(node).into_iter().filter(|c| c.kind() == "<>") {
            self.push(operator, INVALID_SYNTAX);
        }
    }

    /// `except A, e:` is Python 2 only.
    fn check_except_clause(&mut self, node: Node) {
        if children(node).iter().any(|c| c.kind() == ",") {
            let at = node.child_by_field_name("value").unwrap_or(node);
            self.push(at, "multiple exception types must be parenthesized");
        }
    }

    fn check_integer(&mut self, node: Node) {
        let literal = self.text(node).to_ascii_lowercase();
        if literal.ends_with('l') {
            let base = if literal.starts_with("0x") {
                "hexadecimal"
            } else if literal.starts_with("0o") {
                "octal"
            } else if literal.starts_with("0b") {
                "binary"
            } else {
                "decimal"
            };
            self.push(node, format!("invalid {} literal", base));
            return;
        }

        // Imaginary literals may keep leading zeros.
        if literal.starts_with('0') && !literal.ends_with('j') {
            let digits: Vec<u8> = literal.bytes().filter(|b| *b != b'_').collect();
            if digits.len() > 1
                && digits.iter().all(u8::is_ascii_digit)
                && digits.iter().any(|b| *b != b'0')
            {
                self.push(node, LEADING_ZEROS);
            }
        }
    }

    /// Backtick "strings" and prefixes such as `ur` are Python 2 only.
    fn check_string_delimiters(&mut self, node: Node) {
        let literal = self.text(node);
        let Some(quote_at) = literal.find(['"', '\'', '`']) else {
            return;
        };
        let (prefix, quoted) = literal.split_at(quote_at);
        if quoted.starts_with('`') {
            self.push(node, INVALID_SYNTAX);
            return;
        }
        if !STRING_PREFIXES.contains(&prefix.to_ascii_lowercase().as_str()) {
            self.push(node, INVALID_SYNTAX);
        }
    }

    /// `raise E, value` is Python 2 only.
    fn check_raise(&mut self, node: Node) {
        let listed = named_children(node)
            .into_iter()
            .find(|c| c.kind() == "expression_list");
        if let Some(list) = listed {
            let comma = children(list).into_iter().find(|c| c.kind() == ",");
            self.push(comma.unwrap_or(list), INVALID_SYNTAX);
        }
    }

    fn check_parameters(&mut self, node: Node) {
        let mut seen_default = false;
        let mut keyword_only = false;
        for param in named_children(node) {
            match param.kind() {
                "tuple_pattern" => self.push(param, INVALID_SYNTAX),
                "default_parameter" => {
                    if let Some(name) = param
                        .child_by_field_name("name")
                        .filter(|name| name.kind() == "tuple_pattern")
                    {
                        self.push(name, INVALID_SYNTAX);
                    }
                    seen_default = true;
                }
                "typed_default_parameter" => seen_default = true,
                "list_splat_pattern" | "keyword_separator" => keyword_only = true,
                "typed_parameter" => match param.named_child(0).map(|first| first.kind()) {
                    Some("list_splat_pattern") => keyword_only = true,
                    Some("dictionary_splat_pattern") => {}
                    _ => self.check_non_default(param, seen_default, keyword_only),
                },
                "identifier" => self.check_non_default(param, seen_default, keyword_only),
                _ => {}
            }
        }
    }

    fn check_non_default(&mut self, param: Node, seen_default: bool, keyword_only: bool) {
        if seen_default && !keyword_only {
            self.push(param, "non-default argument follows default argument");
        }
    }

    fn check_arguments(&mut self, node: Node) {
        let mut seen_keyword = false;
        let mut seen_mapping = false;
        for arg in named_children(node) {
            match arg.kind() {
                "keyword_argument" => seen_keyword = true,
                "dictionary_splat" => seen_mapping = true,
                "list_splat" if seen_mapping => {
                    self.push(arg, "iterable argument unpacking follows keyword argument unpacking")
                }
                "list_splat" => {}
                _ if seen_mapping => {
                    self.push(arg, "positional argument follows keyword argument unpacking")
                }
                _ if seen_keyword => self.push(arg, "positional argument follows keyword argument"),
                _ => {}
            }
        }
    }

    fn check_augmented_target(&mut self, node: Node) {
        let Some(left) = node.child_by_field_name("left") else {
            return;
        };
        let shape = match left.kind() {
            "pattern_list" | "tuple_pattern" => "tuple",
            "list_pattern" => "list",
            "list_splat_pattern" => "starred",
            _ => return,
        };
        self.push(
            left,
            format!("'{}' is an illegal expression for augmented assignment", shape),
        );
    }

    fn check_delete_target(&mut self, target: Node) {
        if target.is_error() || target.is_missing() {
            return;
        }
        let message = match target.kind() {
            "identifier" | "attribute" | "subscript" => return,
            "expression_list" | "tuple" | "list" | "parenthesized_expression" => {
                for inner in named_children(target) {
                    self.check_delete_target(inner);
                }
                return;
            }
            "call" => "cannot delete function call",
            "list_splat" => "cannot delete starred",
            "string" | "concatenated_string" | "integer" | "float" | "true" | "false" | "none"
            | "ellipsis" => "cannot delete literal",
            _ => "cannot delete expression",
        };
        self.push(target, message);
    }

    // ───────────────────────────────────────────────────────────────────────
    // Characters between tokens
    // ───────────────────────────────────────────────────────────────────────

    /// Reports the first character outside every token that is not layout.
    fn check_token_gaps(&mut self, root: Node) {
        let mut scanned = 0;
        if !self.scan_tokens(root, &mut scanned) {
            self.check_gap(scanned, self.source.len());
        }
    }

    fn scan_tokens(&mut self, node: Node, scanned: &mut usize) -> bool {
        if node.child_count() == 0 || OPAQUE_TOKENS.contains(&node.kind()) {
            if self.check_gap(*scanned, node.start_byte()) {
                return true;
            }
            *scanned = (*scanned).max(node.end_byte());
            return false;
        }
        children(node)
            .into_iter()
            .any(|child| self.scan_tokens(child, scanned))
    }

    fn check_gap(&mut self, from: usize, to: usize) -> bool {
        let Some(gap) = self.source.get(from..to) else {
            return false;
        };
        let stray = gap
            .char_indices()
            .find(|&(at, c)| !is_layout(c, from + at));
        let Some((at, c)) = stray else {
            return false;
        };

        let byte = from + at;
        let before = &self.source[..byte];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        self.violations.push(Violation {
            row: before.matches('\n').count(),
            column: byte - line_start,
            message: stray_character_message(c),
        });
        true
    }

    // ───────────────────────────────────────────────────────────────────────
    // Indentation
    // ───────────────────────────────────────────────────────────────────────

    /// Checks the statements of `block`. `outer` is the indentation of the
    /// clause header owning the block, or `None` for the module.
    fn check_block(&mut self, block: Node, outer: Option<Indent>) {
        let mut expected = match outer {
            None => Some(Indent::default()),
            Some(_) => None,
        };

        for stmt in named_children(block) {
            if let Some(indent) = self.statement_indent(stmt) {
                match (expected, outer) {
                    (Some(level), _) => self.compare_indent(stmt, indent, level),
                    (None, Some(header)) => {
                        if indent.columns <= header.columns {
                            self.push(stmt, "expected an indented block");
                        } else if indent.raw <= header.raw {
                            self.push(stmt, TAB_ERROR);
                        }
                        expected = Some(indent);
                    }
                    (None, None) => {}
                }
            }
            self.check_nested_blocks(stmt);
        }
    }

    fn compare_indent(&mut self, stmt: Node, indent: Indent, level: Indent) {
        if indent.columns == level.columns {
            if indent.raw != level.raw {
                self.push(stmt, TAB_ERROR);
            }
        } else if indent.columns > level.columns {
            self.push(stmt, "unexpected indent");
        } else {
            self.push(stmt, "unindent does not match any outer indentation level");
        }
    }

    fn check_nested_blocks(&mut self, node: Node) {
        for child in children(node) {
            if child.kind() == "block" {
                let header = self.line_indent(node.start_position().row);
                self.check_block(child, Some(header));
            } else {
                self.check_nested_blocks(child);
            }
        }
    }

    /// Indentation of `stmt` when it is the first token on its line.
    fn statement_indent(&self, stmt: Node) -> Option<Indent> {
        let point = stmt.start_position();
        let prefix = self.lines.get(point.row)?.get(..point.column)?;
        prefix
            .chars()
            .all(is_indent_char)
            .then(|| Indent::measure(prefix))
    }

    fn line_indent(&self, row: usize) -> Indent {
        self.lines
            .get(row)
            .map(|line| Indent::measure(line))
            .unwrap_or_default()
    }
}

/// Leading whitespace measured twice, with tabs to the next multiple of
/// eight and with tabs as one column. Both must agree on the ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Indent {
    columns: usize,
    raw: usize,
}

impl Indent {
    fn measure(line: &str) -> Self {
        let mut indent = Indent::default();
        for c in line.chars() {
            match c {
                ' ' => {
                    indent.columns += 1;
                    indent.raw += 1;
                }
                '\t' => {
                    indent.columns = (indent.columns / 8 + 1) * 8;
                    indent.raw += 1;
                }
                '\x0c' => indent = Indent::default(),
                _ => break,
            }
        }
        indent
    }
}

fn is_indent_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn is_layout(c: char, byte: usize) -> bool {
    is_indent_char(c) || c == '\r' || c == '\n' || (c == '\u{feff}' && byte == 0)
}

fn stray_character_message(c: char) -> String {
    if c == '\\' {
        "unexpected character after line continuation character".to_string()
    } else if c.is_ascii() && !c.is_ascii_control() {
        INVALID_SYNTAX.to_string()
    } else if c.is_whitespace() || c.is_control() {
        format!("invalid non-printable character U+{:04X}", c as u32)
    } else {
        format!("invalid character '{}' (U+{:04X})", c, c as u32)
    }
}

fn missing_parentheses(name: &str) -> String {
    format!(
        "Missing parentheses in call to '{}'. Did you mean {}(...)?",
        name, name
    )
}

fn children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn violation(source: &str) -> Option<Violation> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse(source, None).unwrap();
        first_violation(tree.root_node(), source)
    }

    fn message(source: &str) -> String {
        violation(source)
            .unwrap_or_else(|| panic!("expected a violation in {:?}", source))
            .message
    }

    #[test]
    fn test_python3_module_has_no_violation() {
        let source = "\
import os


def f(a, b=1, *args, c, d=2, **kwargs):
    \"\"\"Doc.\"\"\"
    return g(a, *args, key=b, **kwargs)


def h(a, /, b=1, *, c):
    del a, b
    del (c), [kwargs]
    x = 0 + 00 + 0o777 + 0x1F + 1_000 + 0j + 07j
    y = rb'a' + Rb'b' + u'c' + F'{x:>10}' + f'{x!r}'
    x += 1
    if x != 0:
        pass
    try:
        pass
    except (ValueError, TypeError) as e:
        raise ValueError('x') from e
    return lambda p, q=1: p
";
        assert_eq!(violation(source), None);
    }

    #[test]
    fn test_python2_operators_and_clauses() {
        assert_eq!(message("if 1 <> 2:\n    pass\n"), "invalid syntax");
        assert_eq!(
            message("try:\n    pass\nexcept ValueError, e:\n    pass\n"),
            "multiple exception types must be parenthesized"
        );
        assert_eq!(message("raise ValueError, 'x'\n"), "invalid syntax");
    }

    #[test]
    fn test_python2_literals() {
        assert_eq!(message("x = `1`\n"), "invalid syntax");
        assert_eq!(message("x = 0777\n"), LEADING_ZEROS);
        assert_eq!(message("x = 10L\n"), "invalid decimal literal");
        assert_eq!(message("x = 0xffL\n"), "invalid hexadecimal literal");
        assert_eq!(message("x = ur'abc'\n"), "invalid syntax");
    }

    #[test]
    fn test_parameter_order() {
        assert_eq!(message("def f((a, b)):\n    pass\n"), "invalid syntax");
        assert_eq!(
            message("def f(a=1, b):\n    pass\n"),
            "non-default argument follows default argument"
        );
        assert_eq!(
            message("g = lambda a=1, b: a\n"),
            "non-default argument follows default argument"
        );
    }

    #[test]
    fn test_argument_order() {
        assert_eq!(
            message("f(a=1, 2)\n"),
            "positional argument follows keyword argument"
        );
        assert_eq!(
            message("f(**a, *b)\n"),
            "iterable argument unpacking follows keyword argument unpacking"
        );
        assert_eq!(
            message("f(**a, b)\n"),
            "positional argument follows keyword argument unpacking"
        );
    }

    #[test]
    fn test_assignment_and_delete_targets() {
        assert_eq!(
            message("a, b += 1\n"),
            "'tuple' is an illegal expression for augmented assignment"
        );
        assert_eq!(message("del f()\n"), "cannot delete function call");
        assert_eq!(message("del a, (b, 1)\n"), "cannot delete literal");
    }

    #[test]
    fn test_indentation() {
        let top = violation("\tx = 1\n").unwrap();
        assert_eq!(top.message, "unexpected indent");
        assert_eq!((top.row, top.column), (0, 1));

        let mixed = violation("if x:\n\tpass\n        pass\n").unwrap();
        assert_eq!(mixed.message, TAB_ERROR);
        assert_eq!(mixed.row, 2);

        assert_eq!(violation("if x:\n\tpass\n\tpass\n"), None);
        assert_eq!(violation("if x: pass\nelse:\n    y = 1\n    z = 2\n"), None);
    }

    #[test]
    fn test_earliest_violation_wins() {
        let found = violation("x = 10L\ny = 0777\n").unwrap();
        assert_eq!(found.row, 0);
        assert_eq!(found.column, 4);
    }

    #[test]
    fn test_indent_measure() {
        assert_eq!(Indent::measure("\t x"), Indent { columns: 9, raw: 2 });
        assert_eq!(Indent::measure("    \tx"), Indent { columns: 8, raw: 5 });
        assert_eq!(Indent::measure("  \x0c  x"), Indent { columns: 2, raw: 2 });
    }
}
