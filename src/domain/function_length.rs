//! Function length measurement and the L001 check.
//!
//! A function's length is the distance from its `def` line to the start line
//! of its deepest last child, reached by following the last statement of each
//! nested body. A multi-line statement ending after the last statement starts
//! is not counted, so the figure can under-count the real span.

use crate::domain::ast::AstNode;
use crate::domain::diagnostic::Diagnostic;

/// All function nodes below `root`, outer before inner, in source order.
pub fn find_all_function_nodes(root: &AstNode) -> Vec<&AstNode> {
    let mut found = Vec::new();
    collect_functions(root, &mut found);
    found
}

fn collect_functions<'a>(node: &'a AstNode, out: &mut Vec<&'a AstNode>) {
    let Some(body) = node.body() else {
        return;
    };
    for child in body {
        if child.is_function() {
            out.push(child);
        }
        collect_functions(child, out);
    }
}

/// Follows the last element of each body until a leaf is reached.
/// A container with an empty body is returned as is.
pub fn last_deep_child(node: &AstNode) -> &AstNode {
    let mut current = node;
    while let Some(last) = current.body().and_then(|body| body.last()) {
        current = last;
    }
    current
}

/// Lines of code spanned by `node` and its sub-nodes.
pub fn node_loc(node: &AstNode) -> i64 {
    let end_line = last_deep_child(node).position.line;
    end_line as i64 - node.position.line as i64
}

/// Flags functions longer than `max_loc` that lack a docstring.
#[derive(Debug, Clone, Copy)]
pub struct FunctionLengthChecker {
    pub max_loc: i64,
}

impl FunctionLengthChecker {
    pub fn new(max_loc: i64) -> Self {
        Self { max_loc }
    }

    pub fn check(&self, path: &str, root: &AstNode) -> Vec<Diagnostic> {
        let functions = find_all_function_nodes(root);
        log::debug!("{}: found {} function definitions", path, functions.len());

        functions
            .into_iter()
            .filter_map(|func| {
                let loc = node_loc(func);
                let last = last_deep_child(func);
                log::debug!(
                    "{}:{} {} {} ends at {} {} ({} LoC)",
                    path,
                    func.position,
                    func.kind.name(),
                    func.name.as_deref().unwrap_or("<anonymous>"),
                    last.kind.name(),
                    last.position,
                    loc
                );
                if loc > self.max_loc && !func.has_docstring() {
                    Some(Diagnostic::long_function_without_docstring(
                        path,
                        func.position,
                        loc,
                    ))
                } else {
                    None
                }
            })
            .collect()
    }
}
