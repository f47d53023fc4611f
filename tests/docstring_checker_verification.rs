//! Long-function docstring check verification.
//!
//! Drives the parser and checker on real Python sources, then the
//! `pyhygiene-docstrings` binary end to end.

use pyhygiene::application::CheckDocstringsUsecase;
use pyhygiene::domain::diagnostic::Diagnostic;
use pyhygiene::infrastructure::{TextReporter, TreeSitterPythonParser};
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn check(source: &str, max_loc: i64) -> Vec<Diagnostic> {
    let usecase = CheckDocstringsUsecase {
        parser: &TreeSitterPythonParser,
        reporter: &TextReporter,
    };
    usecase.check_source(source, "x.py", max_loc).unwrap()
}

fn lines(source: &str, max_loc: i64) -> Vec<String> {
    check(source, max_loc).iter().map(|d| d.to_string()).collect()
}

fn python_file(source: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".py").tempfile().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file
}

fn checker() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pyhygiene-docstrings"))
}

#[test]
fn test_file_without_functions_is_clean() {
    let source = "import os\n\nx = 1\n\nclass A:\n    y = 2\n    z = 3\n";
    for max_loc in [-5, 0, 10] {
        assert!(check(source, max_loc).is_empty());
    }
}

#[test]
fn test_short_functions_are_never_reported() {
    let source = "def f():\n    return 1\n\ndef g():\n    \"\"\"Doc.\"\"\"\n    return 2\n";
    assert!(check(source, 1).is_empty());
    assert!(check(source, 5).is_empty());
}

#[test]
fn test_long_documented_function_is_not_reported() {
    let source = "def f(a):\n    \"\"\"Sum things.\"\"\"\n    b = a\n    c = b\n    return c\n";
    assert!(check(source, 1).is_empty());
}

#[test]
fn test_long_undocumented_function_is_reported_once() {
    let source = "def long_one(a):\n    b = a\n    c = b\n    d = c\n    return d\n";
    assert_eq!(
        lines(source, 3),
        vec!["x.py:1:0 L001 function with 4 LoC lacks docstring"]
    );
    assert!(check(source, 4).is_empty());
}

#[test]
fn test_docstring_with_one_statement() {
    // Measured to the last statement start: line 3 - line 1.
    let source = "def f():\n    \"\"\"doc\"\"\"\n    x = 1\n";
    assert!(check(source, 0).is_empty());
}

#[test]
fn test_two_statements_without_docstring() {
    let source = "def f():\n    x = 1\n    y = 2\n";
    assert_eq!(
        lines(source, 0),
        vec!["x.py:1:0 L001 function with 2 LoC lacks docstring"]
    );
}

#[test]
fn test_nested_functions_are_checked_independently() {
    let source = "\
def outer():
    \"\"\"Outer.\"\"\"
    def inner():
        a = 1
        b = 2
        c = 3
        return a
    return inner
";
    assert_eq!(
        lines(source, 3),
        vec!["x.py:3:4 L001 function with 4 LoC lacks docstring"]
    );
}

#[test]
fn test_nested_functions_reported_outer_first() {
    let source = "\
def outer():
    def inner():
        a = 1
        return a
    return inner
";
    assert_eq!(
        lines(source, 0),
        vec![
            "x.py:1:0 L001 function with 4 LoC lacks docstring",
            "x.py:2:4 L001 function with 2 LoC lacks docstring",
        ]
    );
}

#[test]
fn test_trailing_multiline_statement_is_undercounted() {
    let ends_with_return = "\
def f():
    call(
        1,
        2,
    )
    return 0
";
    assert_eq!(
        lines(ends_with_return, 2),
        vec!["x.py:1:0 L001 function with 5 LoC lacks docstring"]
    );

    let ends_with_call = "\
def g():
    x = 1
    call(
        1,
        2,
    )
";
    assert!(check(ends_with_call, 2).is_empty());
    assert_eq!(
        lines(ends_with_call, 1),
        vec!["x.py:1:0 L001 function with 2 LoC lacks docstring"]
    );
}

#[test]
fn test_else_branch_does_not_extend_length() {
    let source = "\
def f(x):
    if x:
        a = 1
    else:
        b = 2
        c = 3
";
    assert_eq!(
        lines(source, 0),
        vec!["x.py:1:0 L001 function with 2 LoC lacks docstring"]
    );
}

#[test]
fn test_functions_under_else_are_not_visited() {
    let source = "\
if cond:
    pass
else:
    def hidden():
        a = 1
        b = 2
";
    assert!(check(source, 0).is_empty());
}

#[test]
fn test_decorated_method_reports_def_position() {
    let source = "\
class Service:
    @property
    def value(self):
        a = 1
        return a
";
    assert_eq!(
        lines(source, 0),
        vec!["x.py:3:4 L001 function with 2 LoC lacks docstring"]
    );
}

#[test]
fn test_async_functions_are_not_reported() {
    let source = "async def f():\n    a = 1\n    b = 2\n";
    assert!(check(source, 0).is_empty());
}

#[test]
fn test_blank_docstring_counts_as_missing() {
    let source = "def f():\n    \"\"\"   \"\"\"\n    x = 1\n";
    assert_eq!(
        lines(source, 0),
        vec!["x.py:1:0 L001 function with 2 LoC lacks docstring"]
    );
}

#[test]
fn test_binary_reports_and_exits_zero() {
    let file = python_file("def f():\n    x = 1\n    y = 2\n");
    let output = checker().arg("0").arg(file.path()).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        format!(
            "{}:1:0 L001 function with 2 LoC lacks docstring\n",
            file.path().display()
        )
    );
}

#[test]
fn test_binary_strict_mode_fails_on_findings() {
    let file = python_file("def f():\n    x = 1\n    y = 2\n");
    let output = checker()
        .args(["--strict", "0"])
        .arg(file.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let clean = python_file("def f():\n    return 1\n");
    let output = checker()
        .args(["--strict", "5"])
        .arg(clean.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_binary_json_output() {
    let file = python_file("def f():\n    x = 1\n    y = 2\n");
    let output = checker()
        .args(["--format", "json", "0"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["line"], 1);
    assert_eq!(items[0]["code"], "L001");
}

#[test]
fn test_binary_accepts_negative_threshold() {
    let file = python_file("def f(): return 1\n");
    let output = checker().arg("-1").arg(file.path()).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.ends_with(":1:0 L001 function with 0 LoC lacks docstring\n"));
}

#[test]
fn test_binary_usage_errors_exit_two() {
    let missing = checker().arg("10").output().unwrap();
    assert_eq!(missing.status.code(), Some(2));

    let file = python_file("x = 1\n");
    let not_a_number = checker().arg("ten").arg(file.path()).output().unwrap();
    assert_eq!(not_a_number.status.code(), Some(2));
}

#[test]
fn test_binary_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = checker()
        .arg("10")
        .arg(dir.path().join("absent.py"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.py"));
}

#[test]
fn test_binary_rejects_invalid_syntax() {
    let file = python_file("def f(:\n    pass\n");
    let output = checker().arg("0").arg(file.path()).output().unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to parse"));
}

#[test]
fn test_parenthesized_docstring_counts() {
    let source = "def f():\n    (\"doc\")\n    x = 1\n";
    assert!(check(source, 0).is_empty());
}

#[test]
fn test_escaped_whitespace_docstring_counts_as_missing() {
    let source = "def f():\n    \"\\x20\"\n    x = 1\n";
    assert_eq!(
        lines(source, 0),
        vec!["x.py:1:0 L001 function with 2 LoC lacks docstring"]
    );

    let unicode_space = "def f():\n    \"\\u2003\\N{SPACE}\\040\"\n    x = 1\n";
    assert_eq!(check(unicode_space, 0).len(), 1);

    let escaped_text = "def f():\n    \"\\x41\\u00e9\"\n    x = 1\n";
    assert!(check(escaped_text, 0).is_empty());
}
